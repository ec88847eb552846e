//! Pipeline stages for document redesign.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. point the client at a different endpoint)
//! without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ client ──▶ parse ──▶ render ──▶ export
//! (path/URL) (base64)  (Gemini)  (serde)   (layout)   (genpdf)
//! ```
//!
//! 1. [`input`]  — canonicalise the user-supplied path or URL into an
//!    in-memory source with a truthful media type
//! 2. [`encode`] — base64-wrap the source bytes for the request body
//! 3. [`client`] — the single model exchange; the only stage with network I/O
//! 4. [`parse`]  — strict validation of the response into the typed redesign
//! 5. [`render`] — stateless projection into the print-oriented document
//! 6. [`export`] — hand the projection to the PDF layout facility

pub mod client;
pub mod encode;
pub mod export;
pub mod input;
pub mod parse;
pub mod render;
