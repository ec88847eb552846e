//! Payload encoding: [`SourceFile`] → base64 [`InlineDocument`].
//!
//! The redesign endpoint accepts the source document as base64 data embedded
//! in the JSON request body, tagged with its media type. The whole file goes
//! up in one part — no page splitting, no recompression — so the model sees
//! exactly what the user uploaded.

use crate::model::SourceFile;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use tracing::debug;

/// The inline payload part of the request body.
#[derive(Debug, Clone, Serialize)]
pub struct InlineDocument {
    /// IANA media type, e.g. `application/pdf`.
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded file bytes.
    pub data: String,
}

/// Encode the source file for the request body.
pub fn encode_source(source: &SourceFile) -> InlineDocument {
    let data = STANDARD.encode(&source.bytes);
    debug!("Encoded '{}' → {} bytes base64", source.name, data.len());

    InlineDocument {
        mime_type: source.media_type.clone(),
        data,
    }
}
