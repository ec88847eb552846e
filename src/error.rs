//! Error types for the notes2book library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RedesignError`] — **Fatal**: the redesign cannot proceed at all
//!   (bad input file, missing API key, unusable model response). Returned as
//!   `Err(RedesignError)` from the top-level `redesign*` functions. No
//!   partial result is ever exposed on this path.
//!
//! * [`BlockError`] — **Non-fatal**: a single content block failed (the
//!   model emitted a block type this renderer does not know) but the rest of
//!   the document is fine. Stored inside
//!   [`crate::pipeline::render::RedesignedDocument`] so callers can inspect
//!   the degraded spots rather than losing the whole document to one block.
//!
//! The separation matches the request/render split: request-level errors
//! abort the attempt and leave prior state untouched, block-level errors are
//! isolated to their block.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the notes2book library.
///
/// Block-level failures use [`BlockError`] and are stored in the rendered
/// document rather than propagated here.
#[derive(Debug, Error)]
pub enum RedesignError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Source file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a supported document type.
    #[error("Unsupported source type for '{path}'\nExpected a PDF or an image (PNG, JPEG, WebP). First bytes: {magic:?}")]
    UnsupportedSource { path: PathBuf, magic: [u8; 4] },

    // ── Configuration errors ──────────────────────────────────────────────
    /// No API key was supplied and none could be found in the environment.
    ///
    /// Detected before any network call is attempted.
    #[error("No Gemini API key configured.\n{hint}")]
    MissingApiKey { hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Service errors ────────────────────────────────────────────────────
    /// The model endpoint returned a non-success HTTP status.
    #[error("Document model request failed (HTTP {status}): {message}\nTry again with a clearer source document.")]
    ServiceStatus { status: u16, message: String },

    /// The network exchange itself failed (connection, TLS, timeout).
    #[error("Document model request failed: {reason}")]
    ServiceUnreachable { reason: String },

    /// The call succeeded but the response carried no usable text.
    #[error("The document model returned no usable text.\nTry a clearer scan or a smaller document.")]
    EmptyResponse,

    // ── Response errors ───────────────────────────────────────────────────
    /// The response text is not valid structured data, or required fields
    /// are missing. The whole request fails; nothing is partially accepted.
    #[error("Could not parse the model response into a redesign: {detail}")]
    MalformedResponse { detail: String },

    // ── Export errors ─────────────────────────────────────────────────────
    /// The PDF layout facility failed. The rendered document is still valid.
    #[error("PDF export failed: {detail}\nThe redesign itself succeeded — re-run with --json to keep the structured result.")]
    ExportFailed { detail: String },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RedesignError {
    /// True for errors that indicate missing or invalid local configuration
    /// (the user must fix their setup, retrying cannot help).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RedesignError::MissingApiKey { .. } | RedesignError::InvalidConfig(_)
        )
    }
}

/// A non-fatal error scoped to a single content block.
///
/// Stored alongside the rendered document when a block cannot be projected.
/// Rendering of every other block continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum BlockError {
    /// The block's `type` tag is not one of the known variants.
    ///
    /// The producing model is external and not schema-enforced at the
    /// transport layer, so foreign tags must be survivable.
    #[error("Section {section}, block {block}: unknown block type '{kind}' — block skipped")]
    UnknownType {
        /// 0-indexed section position.
        section: usize,
        /// 0-indexed block position within the section.
        block: usize,
        /// The unrecognised tag as received.
        kind: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_display() {
        let e = RedesignError::MissingApiKey {
            hint: "Set GEMINI_API_KEY".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("GEMINI_API_KEY"), "got: {msg}");
        assert!(e.is_configuration());
    }

    #[test]
    fn service_status_display() {
        let e = RedesignError::ServiceStatus {
            status: 429,
            message: "quota exceeded".into(),
        };
        assert!(e.to_string().contains("429"));
        assert!(e.to_string().contains("quota exceeded"));
        assert!(!e.is_configuration());
    }

    #[test]
    fn malformed_response_display() {
        let e = RedesignError::MalformedResponse {
            detail: "missing field `sections`".into(),
        };
        assert!(e.to_string().contains("missing field `sections`"));
    }

    #[test]
    fn export_failed_mentions_json_fallback() {
        let e = RedesignError::ExportFailed {
            detail: "font family not found".into(),
        };
        assert!(e.to_string().contains("--json"));
    }

    #[test]
    fn unknown_block_display() {
        let e = BlockError::UnknownType {
            section: 0,
            block: 2,
            kind: "diagram".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("diagram"), "got: {msg}");
        assert!(msg.contains("block 2"), "got: {msg}");
    }

    #[test]
    fn block_error_serialises() {
        let e = BlockError::UnknownType {
            section: 1,
            block: 0,
            kind: "chart".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: BlockError = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
