//! Configuration types for the redesign pipeline.
//!
//! All behaviour is controlled through [`RedesignConfig`], built via its
//! [`RedesignConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across calls and to diff two runs to understand
//! why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.
//!
//! # Design choice: explicit credential
//! The API key is a field (or a pre-built [`DesignModel`]) rather than
//! ambient global state, so the client can be constructed with fakes in
//! tests and the missing-key failure is raised before any network I/O.

use crate::error::RedesignError;
use crate::pipeline::client::DesignModel;
use std::fmt;
use std::sync::Arc;

/// Default model id for the redesign request.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Configuration for a document redesign.
///
/// Built via [`RedesignConfig::builder()`] or [`RedesignConfig::default()`].
///
/// # Example
/// ```rust
/// use notes2book::RedesignConfig;
///
/// let config = RedesignConfig::builder()
///     .model("gemini-3-pro-preview")
///     .temperature(0.2)
///     .api_timeout_secs(90)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RedesignConfig {
    /// Model id sent to the endpoint. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Explicit API key. If `None`, `GEMINI_API_KEY` then `GOOGLE_API_KEY`
    /// are consulted; if neither is set the redesign fails with a
    /// configuration error before any network call.
    pub api_key: Option<String>,

    /// Pre-constructed model client. Takes precedence over `api_key`.
    ///
    /// The seam for tests and for callers that need custom middleware.
    pub client: Option<Arc<dyn DesignModel>>,

    /// Sampling temperature. Default: 0.2.
    ///
    /// Low temperature keeps the model faithful to the source content —
    /// the design rules demand verbatim preservation, not creativity.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 16384.
    ///
    /// A redesigned document reproduces the full source verbatim plus
    /// structural markup, so the ceiling sits well above a typical page
    /// budget. Too low a value truncates the JSON mid-structure, which
    /// surfaces as a malformed-response error.
    pub max_output_tokens: u32,

    /// Custom system instruction. If `None`, uses the built-in default.
    pub system_instruction: Option<String>,

    /// Per-request timeout for the model call in seconds. Default: 120.
    ///
    /// One document is one call; generous by default because large scans
    /// take the model a while to read end-to-end.
    pub api_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Directory containing the export font family's `.ttf` files.
    /// Default: `fonts`.
    pub font_dir: String,

    /// Font family name for export, e.g. `LiberationSans`. Default:
    /// `LiberationSans`.
    pub font_family: String,
}

impl Default for RedesignConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            client: None,
            temperature: 0.2,
            max_output_tokens: 16384,
            system_instruction: None,
            api_timeout_secs: 120,
            download_timeout_secs: 120,
            font_dir: "fonts".to_string(),
            font_family: "LiberationSans".to_string(),
        }
    }
}

impl fmt::Debug for RedesignConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedesignConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("client", &self.client.as_ref().map(|_| "<dyn DesignModel>"))
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("font_dir", &self.font_dir)
            .field("font_family", &self.font_family)
            .finish()
    }
}

impl RedesignConfig {
    /// Create a new builder for `RedesignConfig`.
    pub fn builder() -> RedesignConfigBuilder {
        RedesignConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RedesignConfig`].
#[derive(Debug)]
pub struct RedesignConfigBuilder {
    config: RedesignConfig,
}

impl RedesignConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn client(mut self, client: Arc<dyn DesignModel>) -> Self {
        self.config.client = Some(client);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = n.max(256);
        self
    }

    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.system_instruction = Some(instruction.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    pub fn font_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.font_dir = dir.into();
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.config.font_family = family.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RedesignConfig, RedesignError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(RedesignError::InvalidConfig(
                "Model id must not be empty".into(),
            ));
        }
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(RedesignError::InvalidConfig(format!(
                "Temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        if let Some(key) = &c.api_key {
            if key.trim().is_empty() {
                return Err(RedesignError::InvalidConfig(
                    "API key must not be empty when set".into(),
                ));
            }
        }
        Ok(self.config)
    }
}
