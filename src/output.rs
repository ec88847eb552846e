//! Output types returned by the top-level `redesign*` functions.

use crate::model::RedesignResult;
use crate::pipeline::render::RedesignedDocument;
use serde::{Deserialize, Serialize};

/// Everything one successful redesign produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedesignOutput {
    /// The typed redesign as the model returned it. Immutable; held for the
    /// lifetime of this session and discarded on the next upload.
    pub result: RedesignResult,
    /// The projected visual document, including any block-scoped issues.
    pub document: RedesignedDocument,
    /// Timing and token accounting for the exchange.
    pub stats: RedesignStats,
}

/// Accounting for one redesign exchange.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedesignStats {
    /// Model id that served the request.
    pub model: String,
    /// Prompt tokens, as reported by the endpoint (0 if unreported).
    pub input_tokens: u64,
    /// Generated tokens, as reported by the endpoint (0 if unreported).
    pub output_tokens: u64,
    /// Wall-clock duration of the whole pipeline in milliseconds.
    pub total_duration_ms: u64,
    /// Wall-clock duration of the model exchange in milliseconds.
    pub model_duration_ms: u64,
    /// Size of the uploaded source in bytes.
    pub source_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ThemeColors;
    use crate::pipeline::render;

    #[test]
    fn output_serialises_to_json() {
        let result = RedesignResult {
            title: "T".into(),
            subject_code: None,
            theme_colors: ThemeColors {
                primary: "#000".into(),
                secondary: "#fff".into(),
            },
            sections: vec![],
        };
        let output = RedesignOutput {
            document: render::render(&result),
            result,
            stats: RedesignStats {
                model: "gemini-3-pro-preview".into(),
                ..Default::default()
            },
        };

        let json = serde_json::to_string_pretty(&output).unwrap();
        let back: RedesignOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.result, output.result);
        assert_eq!(back.stats.model, "gemini-3-pro-preview");
    }
}
