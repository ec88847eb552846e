//! Response parsing: model text → validated [`RedesignResult`].
//!
//! ## Why clean before parsing?
//!
//! Even with structured output declared on the request, models occasionally
//! wrap the JSON body in ` ```json … ``` ` fences despite the instruction
//! saying not to. Stripping an outer fence is a cheap, deterministic rule
//! that rescues an otherwise valid response; everything beyond that is a
//! hard failure — a response that is not the declared shape fails the whole
//! request, with no partial acceptance.

use crate::error::RedesignError;
use crate::model::RedesignResult;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\n(.*)\n```\s*$").unwrap());

/// Strip a single outer code fence, if present.
fn strip_fences(input: &str) -> &str {
    match RE_OUTER_FENCES.captures(input.trim()) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(input),
        None => input.trim(),
    }
}

/// Parse and validate the response text.
///
/// Fails with [`RedesignError::MalformedResponse`] when the text is not
/// valid JSON of the declared shape, or when a required value is unusable
/// (empty title, empty theme color). Section and block order are taken
/// exactly as received.
pub fn parse_redesign(text: &str) -> Result<RedesignResult, RedesignError> {
    let body = strip_fences(text);

    let result: RedesignResult =
        serde_json::from_str(body).map_err(|e| RedesignError::MalformedResponse {
            detail: e.to_string(),
        })?;

    validate(&result)?;
    Ok(result)
}

/// Checks serde cannot express: non-empty display strings.
fn validate(result: &RedesignResult) -> Result<(), RedesignError> {
    if result.title.trim().is_empty() {
        return Err(RedesignError::MalformedResponse {
            detail: "documentTitle is empty".to_string(),
        });
    }
    if result.theme_colors.primary.trim().is_empty()
        || result.theme_colors.secondary.trim().is_empty()
    {
        return Err(RedesignError::MalformedResponse {
            detail: "themeColors must be non-empty strings".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    const VALID: &str = r##"{
        "documentTitle": "Data Structures Unit 3",
        "subjectCode": "BCS304",
        "themeColors": {"primary": "#111827", "secondary": "#f59e0b"},
        "sections": [
            {"title": "Stacks", "blocks": [
                {"type": "callout", "label": "KEY DEFINITION", "content": "A stack is a LIFO structure."},
                {"type": "table", "content": "|Op|Complexity|\n|Push|O(1)|"}
            ]}
        ]
    }"##;

    #[test]
    fn parses_valid_response() {
        let result = parse_redesign(VALID).unwrap();
        assert_eq!(result.title, "Data Structures Unit 3");
        assert_eq!(result.subject_code.as_deref(), Some("BCS304"));
        assert_eq!(result.sections.len(), 1);
        assert_eq!(result.sections[0].blocks.len(), 2);
        assert!(matches!(result.sections[0].blocks[0], Block::Callout { .. }));
    }

    #[test]
    fn strips_json_fence() {
        let fenced = format!("```json\n{VALID}\n```");
        let result = parse_redesign(&fenced).unwrap();
        assert_eq!(result.title, "Data Structures Unit 3");
    }

    #[test]
    fn strips_anonymous_fence() {
        let fenced = format!("```\n{VALID}\n```  ");
        assert!(parse_redesign(&fenced).is_ok());
    }

    #[test]
    fn missing_sections_is_malformed() {
        let err = parse_redesign(
            r##"{"documentTitle": "T", "themeColors": {"primary": "#000", "secondary": "#fff"}}"##,
        );
        match err {
            Err(RedesignError::MalformedResponse { detail }) => {
                assert!(detail.contains("sections"), "got: {detail}");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn not_json_is_malformed() {
        let err = parse_redesign("I could not read the document, sorry.");
        assert!(matches!(err, Err(RedesignError::MalformedResponse { .. })));
    }

    #[test]
    fn empty_title_is_malformed() {
        let err = parse_redesign(
            r##"{"documentTitle": "  ", "themeColors": {"primary": "#000", "secondary": "#fff"}, "sections": []}"##,
        );
        assert!(matches!(err, Err(RedesignError::MalformedResponse { .. })));
    }

    #[test]
    fn empty_theme_color_is_malformed() {
        let err = parse_redesign(
            r##"{"documentTitle": "T", "themeColors": {"primary": "", "secondary": "#fff"}, "sections": []}"##,
        );
        assert!(matches!(err, Err(RedesignError::MalformedResponse { .. })));
    }

    #[test]
    fn zero_sections_is_legal() {
        let result = parse_redesign(
            r##"{"documentTitle": "T", "themeColors": {"primary": "#000", "secondary": "#fff"}, "sections": []}"##,
        )
        .unwrap();
        assert!(result.sections.is_empty());
    }

    #[test]
    fn unknown_block_type_does_not_fail_parse() {
        let result = parse_redesign(
            r##"{
                "documentTitle": "T",
                "themeColors": {"primary": "#000", "secondary": "#fff"},
                "sections": [{"title": "S", "blocks": [{"type": "diagram", "content": "x"}]}]
            }"##,
        )
        .unwrap();
        assert!(matches!(
            result.sections[0].blocks[0],
            Block::Unknown { ref kind, .. } if kind == "diagram"
        ));
    }
}
