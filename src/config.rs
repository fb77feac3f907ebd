//! Configuration for a notes-to-flashcards run.
//!
//! Everything the pipeline needs from the outside world (credential, model
//! parameters, endpoint, timeouts) is collected into one [`FlashcardConfig`]
//! at startup and passed by reference from there on. [`FlashcardConfig::load`]
//! is the only place in the crate that reads the process environment.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. the JSON config file (`config.json` unless another path is given)
//! 3. `ANTHROPIC_API_KEY` / `PDFIUM_LIB_PATH` from the environment, after a
//!    `.env` file in the working directory has been loaded

use crate::error::Note2AnkiError;
use crate::pipeline::client::CompletionProvider;
use crate::progress::ProgressCallback;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Environment variable pointing at an existing pdfium shared library.
pub const PDFIUM_LIB_ENV: &str = "PDFIUM_LIB_PATH";

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Configuration for flashcard generation.
///
/// Built via [`FlashcardConfig::builder()`] or loaded with
/// [`FlashcardConfig::load`].
///
/// # Example
/// ```rust
/// use note2anki::FlashcardConfig;
///
/// let config = FlashcardConfig::builder()
///     .api_key("sk-ant-test")
///     .model("claude-3-5-sonnet-20241022")
///     .max_tokens(4000)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tokens, 4000);
/// ```
#[derive(Clone)]
pub struct FlashcardConfig {
    /// Bearer credential for the completion service.
    pub api_key: String,

    /// Model identifier sent with the request. Default: `claude-3-5-haiku-20241022`.
    pub model: String,

    /// Upper bound on generated tokens. Default: 2000.
    ///
    /// Each card costs roughly 30–60 output tokens, so 2000 covers a few dozen
    /// cards. Long documents need more or the JSON array gets cut off mid-way
    /// and fails validation.
    pub max_tokens: u32,

    /// Sampling temperature. Range 0.0–2.0. Default: 0.7.
    pub temperature: f32,

    /// Custom system prompt. If None, uses [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Base URL of an OpenAI-compatible chat-completions API. Default: Anthropic's.
    pub base_url: String,

    /// Wall-clock limit for the completion call in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Explicit pdfium library to bind for PDF input. If None, the system
    /// library search path is used.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Pre-constructed completion provider. Takes precedence over the HTTP
    /// client built from `base_url` / `api_key`.
    pub provider: Option<Arc<dyn CompletionProvider>>,

    /// Stage events sink.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for FlashcardConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            system_prompt: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_timeout_secs: 60,
            pdfium_lib_path: None,
            provider: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for FlashcardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashcardConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("base_url", &self.base_url)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// On-disk shape of the config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    system_prompt: Option<String>,
    base_url: Option<String>,
    api_timeout_secs: Option<u64>,
    pdfium_lib_path: Option<PathBuf>,
}

impl FlashcardConfig {
    /// Create a new builder for `FlashcardConfig`.
    pub fn builder() -> FlashcardConfigBuilder {
        FlashcardConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load from `.env`, the config file and the process environment.
    ///
    /// `path` of `None` means `config.json` in the working directory, which
    /// may be absent. An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, Note2AnkiError> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", env_file.display());
        }
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    /// Same as [`FlashcardConfig::load`] with an injectable environment lookup.
    pub fn load_with_env<F>(path: Option<&Path>, env: F) -> Result<Self, Note2AnkiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = path.is_some();
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let file = match std::fs::read_to_string(path) {
            Ok(raw) => {
                debug!("Reading config from {}", path.display());
                serde_json::from_str::<ConfigFile>(&raw).map_err(|e| {
                    Note2AnkiError::ConfigRead {
                        path: path.to_path_buf(),
                        detail: e.to_string(),
                    }
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                ConfigFile::default()
            }
            Err(e) => {
                return Err(Note2AnkiError::ConfigRead {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                })
            }
        };

        let mut builder = Self::builder();
        if let Some(key) = file.api_key {
            builder = builder.api_key(key);
        }
        if let Some(model) = file.model {
            builder = builder.model(model);
        }
        if let Some(n) = file.max_tokens {
            builder = builder.max_tokens(n);
        }
        if let Some(t) = file.temperature {
            builder = builder.temperature(t);
        }
        if let Some(prompt) = file.system_prompt.filter(|p| !p.trim().is_empty()) {
            builder = builder.system_prompt(prompt);
        }
        if let Some(url) = file.base_url {
            builder = builder.base_url(url);
        }
        if let Some(secs) = file.api_timeout_secs {
            builder = builder.api_timeout_secs(secs);
        }
        if let Some(lib) = file.pdfium_lib_path {
            builder = builder.pdfium_lib_path(lib);
        }

        if let Some(key) = env(API_KEY_ENV).filter(|k| !k.is_empty()) {
            builder = builder.api_key(key);
        }
        if let Some(lib) = env(PDFIUM_LIB_ENV).filter(|p| !p.is_empty()) {
            builder = builder.pdfium_lib_path(lib);
        }

        builder.build()
    }

    /// The system prompt actually sent: the override or the built-in default.
    pub fn effective_system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or(crate::prompts::DEFAULT_SYSTEM_PROMPT)
    }
}

/// Builder for [`FlashcardConfig`].
pub struct FlashcardConfigBuilder {
    config: FlashcardConfig,
}

impl fmt::Debug for FlashcardConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashcardConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl FlashcardConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// A credential is required unless a pre-built provider was supplied.
    pub fn build(self) -> Result<FlashcardConfig, Note2AnkiError> {
        let c = &self.config;
        if c.api_key.trim().is_empty() && c.provider.is_none() {
            return Err(Note2AnkiError::MissingApiKey {
                env_var: API_KEY_ENV,
            });
        }
        if c.model.trim().is_empty() {
            return Err(Note2AnkiError::InvalidConfig(
                "model must not be empty".into(),
            ));
        }
        if !(c.base_url.starts_with("https://") || c.base_url.starts_with("http://")) {
            return Err(Note2AnkiError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{}'",
                c.base_url
            )));
        }
        if !c.temperature.is_finite() {
            return Err(Note2AnkiError::InvalidConfig(
                "temperature must be a finite number".into(),
            ));
        }
        Ok(self.config)
    }
}
