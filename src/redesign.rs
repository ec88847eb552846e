//! Top-level redesign entry points.
//!
//! One user action is one logical operation: one file read, one model round
//! trip, one render pass. The model exchange is the only suspension point
//! and is awaited to completion before rendering begins. Export is a
//! second, independent step ([`redesign_to_pdf`]) sequenced strictly after
//! rendering; its failure never discards the rendered result.

use crate::config::RedesignConfig;
use crate::error::RedesignError;
use crate::model::SourceFile;
use crate::output::{RedesignOutput, RedesignStats};
use crate::pipeline::client::{DesignModel, DesignRequest, GeminiStudio};
use crate::pipeline::{encode, export, input, parse, render};
use crate::prompts;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Redesign a document from a local path or HTTP(S) URL.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Fails entirely — no partial result — for input, configuration, service,
/// and malformed-response errors. Unknown block types are *not* errors at
/// this level; they are recorded on `output.document.issues`.
pub async fn redesign(
    input_str: impl AsRef<str>,
    config: &RedesignConfig,
) -> Result<RedesignOutput, RedesignError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting redesign: {}", input_str);

    // ── Step 1: Resolve the model client ─────────────────────────────────
    // A missing credential must surface before any network I/O, including
    // the download of a URL input.
    let client = resolve_client(config)?;

    // ── Step 2: Resolve input ────────────────────────────────────────────
    let source = input::resolve_input(input_str, config.download_timeout_secs).await?;

    redesign_source(source, client, config, total_start).await
}

/// Redesign an already-loaded [`SourceFile`].
///
/// The recommended API when the document bytes come from a buffer rather
/// than a path — no temporary file is involved.
pub async fn redesign_from_source(
    source: SourceFile,
    config: &RedesignConfig,
) -> Result<RedesignOutput, RedesignError> {
    let total_start = Instant::now();
    let client = resolve_client(config)?;
    redesign_source(source, client, config, total_start).await
}

/// Shared tail of the pipeline once input and client are resolved.
async fn redesign_source(
    source: SourceFile,
    client: Arc<dyn DesignModel>,
    config: &RedesignConfig,
    total_start: Instant,
) -> Result<RedesignOutput, RedesignError> {
    let source_bytes = source.bytes.len() as u64;

    // ── Step 3: Build the request ────────────────────────────────────────
    let request = DesignRequest {
        system_instruction: config
            .system_instruction
            .clone()
            .unwrap_or_else(|| prompts::SYSTEM_INSTRUCTION.to_string()),
        user_prompt: prompts::USER_PROMPT.to_string(),
        document: encode::encode_source(&source),
        response_schema: prompts::response_schema(),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
    };
    // The source is owned by this request alone; drop it as soon as the
    // payload is encoded.
    drop(source);

    // ── Step 4: One model exchange, no retry ─────────────────────────────
    let model_start = Instant::now();
    let response = client.generate(&request).await?;
    let model_duration_ms = model_start.elapsed().as_millis() as u64;
    info!(
        "Model responded in {}ms ({} tokens in / {} out)",
        model_duration_ms, response.input_tokens, response.output_tokens
    );

    // ── Step 5: Parse and validate ───────────────────────────────────────
    let result = parse::parse_redesign(&response.text)?;

    // ── Step 6: Project into the visual document ─────────────────────────
    let document = render::render(&result);
    if !document.issues.is_empty() {
        warn!(
            "{} block(s) could not be rendered and were skipped",
            document.issues.len()
        );
    }

    let stats = RedesignStats {
        model: client.model_id().to_string(),
        input_tokens: response.input_tokens,
        output_tokens: response.output_tokens,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        model_duration_ms,
        source_bytes,
    };

    info!(
        "Redesign complete: '{}', {} sections, {}ms total",
        result.title,
        result.sections.len(),
        stats.total_duration_ms
    );

    Ok(RedesignOutput {
        result,
        document,
        stats,
    })
}

/// Redesign and export to a PDF file in one call.
///
/// Export is sequenced strictly after rendering. This convenience wrapper
/// propagates an export failure as its error; callers that need to keep
/// the rendered output across an export failure should use the two-step
/// API ([`redesign`] then [`crate::pipeline::export::export_pdf`]).
pub async fn redesign_to_pdf(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &RedesignConfig,
) -> Result<RedesignOutput, RedesignError> {
    let output = redesign(input_str, config).await?;
    export::export_pdf(&output.document, config, output_path.as_ref())?;
    Ok(output)
}

/// Synchronous wrapper around [`redesign`].
///
/// Creates a temporary tokio runtime internally.
pub fn redesign_sync(
    input_str: impl AsRef<str>,
    config: &RedesignConfig,
) -> Result<RedesignOutput, RedesignError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| RedesignError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(redesign(input_str, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the model client, from most-specific to least-specific.
///
/// The fallback chain lets library users and CLI users each set exactly as
/// much as they need:
///
/// 1. **Pre-built client** (`config.client`) — the caller constructed the
///    client entirely; used as-is. The seam for tests and middleware.
/// 2. **Explicit key** (`config.api_key`) — passed at construction, never
///    read from ambient state once set.
/// 3. **`GEMINI_API_KEY`**, then **`GOOGLE_API_KEY`** — environment
///    fallback for `notes2book scan.pdf` with no other setup.
///
/// With none of the above, this is a configuration error raised before any
/// network call is attempted.
pub(crate) fn resolve_client(
    config: &RedesignConfig,
) -> Result<Arc<dyn DesignModel>, RedesignError> {
    if let Some(client) = &config.client {
        return Ok(Arc::clone(client));
    }

    let key = config
        .api_key
        .clone()
        .or_else(|| non_empty_env("GEMINI_API_KEY"))
        .or_else(|| non_empty_env("GOOGLE_API_KEY"))
        .ok_or_else(|| RedesignError::MissingApiKey {
            hint: "Set GEMINI_API_KEY (or GOOGLE_API_KEY), or pass --api-key.\n\
                   Keys are issued at https://aistudio.google.com/apikey."
                .to_string(),
        })?;

    let client = GeminiStudio::new(key, config.model.clone(), config.api_timeout_secs)?;
    Ok(Arc::new(client))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Env-reading tests live together here; nothing else in the test
    /// suite touches these variables.
    #[test]
    fn missing_key_is_configuration_error() {
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("GOOGLE_API_KEY");

        let config = RedesignConfig::default();
        let err = resolve_client(&config).err().unwrap();
        assert!(err.is_configuration(), "got: {err:?}");
    }

    #[test]
    fn explicit_key_wins() {
        let config = RedesignConfig::builder().api_key("k-123").build().unwrap();
        let client = resolve_client(&config).unwrap();
        assert_eq!(client.model_id(), crate::config::DEFAULT_MODEL);
    }
}
