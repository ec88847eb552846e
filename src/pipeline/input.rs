//! Input resolution: normalise a user-supplied path or URL to a [`SourceFile`].
//!
//! ## Why sniff magic bytes?
//!
//! The redesign endpoint interprets the payload by its declared media type,
//! so a wrong declaration produces garbage output rather than a clean
//! failure. Sniffing the leading bytes (with an extension fallback for the
//! odd JPEG variant) gives the request a truthful `mimeType` and callers a
//! meaningful error for unsupported content instead of a confusing model
//! reply. URL inputs are downloaded to a `TempDir` so cleanup happens
//! automatically when the download handle drops, even on panic.

use crate::error::RedesignError;
use crate::model::SourceFile;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to an in-memory [`SourceFile`].
///
/// If the input is a URL, download it. If it is a local file, validate it
/// exists and is readable. Either way the media type is detected from the
/// content before the bytes are accepted.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<SourceFile, RedesignError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Resolve a local file path, validating existence and content type.
fn resolve_local(path_str: &str) -> Result<SourceFile, RedesignError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(RedesignError::FileNotFound { path });
    }

    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(RedesignError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(RedesignError::FileNotFound { path });
        }
    };

    let media_type = sniff_media_type(&bytes, Some(&path))
        .ok_or_else(|| unsupported(&path, &bytes))?;

    debug!(
        "Resolved local source: {} ({}, {} bytes)",
        path.display(),
        media_type,
        bytes.len()
    );

    Ok(SourceFile::new(bytes, media_type, display_name(&path)))
}

/// Download a URL into memory and detect its media type.
async fn download_url(url: &str, timeout_secs: u64) -> Result<SourceFile, RedesignError> {
    info!("Downloading source from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| RedesignError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            RedesignError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            RedesignError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(RedesignError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = extract_filename(url);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| RedesignError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_vec();

    let pseudo_path = PathBuf::from(&filename);
    let media_type = sniff_media_type(&bytes, Some(&pseudo_path))
        .ok_or_else(|| unsupported(&pseudo_path, &bytes))?;

    info!("Downloaded {} bytes ({})", bytes.len(), media_type);

    Ok(SourceFile::new(bytes, media_type, filename))
}

/// Detect the media type from leading magic bytes, falling back to the
/// file extension for formats with unreliable magics.
///
/// Supported: PDF, PNG, JPEG, WebP — the document types the redesign
/// endpoint accepts inline.
pub fn sniff_media_type(bytes: &[u8], path: Option<&Path>) -> Option<String> {
    if bytes.starts_with(b"%PDF") {
        return Some("application/pdf".to_string());
    }
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some("image/png".to_string());
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg".to_string());
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp".to_string());
    }

    // Extension fallback for content that slipped past the magic checks.
    let ext = path?.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf".to_string()),
        "png" => Some("image/png".to_string()),
        "jpg" | "jpeg" => Some("image/jpeg".to_string()),
        "webp" => Some("image/webp".to_string()),
        _ => None,
    }
}

fn unsupported(path: &Path, bytes: &[u8]) -> RedesignError {
    let mut magic = [0u8; 4];
    for (i, b) in bytes.iter().take(4).enumerate() {
        magic[i] = *b;
    }
    RedesignError::UnsupportedSource {
        path: path.to_path_buf(),
        magic,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string())
}

/// Extract a reasonable filename from the URL path.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}
