use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AugurError;

/// Top-level configuration loaded from `.augur.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
/// Constructed once at process start and passed by reference into the
/// engine; nothing reads configuration ambiently.
///
/// # Examples
///
/// ```
/// use augur_core::AugurConfig;
///
/// let config = AugurConfig::default();
/// assert_eq!(config.analysis.chunk_budget_bytes, 48_000);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AugurConfig {
    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Size thresholds and chunking behavior.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AugurConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AugurError::Io`] if the file cannot be read,
    /// [`AugurError::Toml`] if the content is not valid TOML, or
    /// [`AugurError::Config`] if the thresholds are inconsistent.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use augur_core::AugurConfig;
    /// use std::path::Path;
    ///
    /// let config = AugurConfig::from_file(Path::new(".augur.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, AugurError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`AugurError::Toml`] if parsing fails, or
    /// [`AugurError::Config`] if the thresholds are inconsistent.
    ///
    /// # Examples
    ///
    /// ```
    /// use augur_core::AugurConfig;
    ///
    /// let toml = r#"
    /// [analysis]
    /// chunk_budget_bytes = 16000
    /// "#;
    /// let config = AugurConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.analysis.chunk_budget_bytes, 16_000);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, AugurError> {
        let config: Self = toml::from_str(content)?;
        config.analysis.validate()?;
        Ok(config)
    }
}

/// LLM provider configuration.
///
/// # Examples
///
/// ```
/// use augur_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.model, "gpt-4o");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (e.g. `"openai"`, `"ollama"`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the provider.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "openai".into()
}

fn default_model() -> String {
    "gpt-4o".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Size thresholds and chunking behavior for the analysis engine.
///
/// The chunk budget is deliberately conservative relative to the hard
/// maximum: prompt scaffolding around the diff costs headroom, and chunking
/// must always be attempted before a diff is rejected outright.
///
/// # Examples
///
/// ```
/// use augur_core::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert!(config.chunk_budget_bytes < config.max_diff_bytes);
/// assert!(config.min_chunk_bytes <= config.chunk_budget_bytes);
/// assert!(config.chunking);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Hard maximum diff size in bytes; with chunking disabled, larger
    /// diffs are rejected outright (default: 240000).
    #[serde(default = "default_max_diff_bytes")]
    pub max_diff_bytes: usize,
    /// Per-request chunk budget in bytes; must be strictly smaller than
    /// `max_diff_bytes` (default: 48000).
    #[serde(default = "default_chunk_budget_bytes")]
    pub chunk_budget_bytes: usize,
    /// Floor for budget shrinking during recursive re-splits; chunks that
    /// still fail at this size are skipped (default: 4000).
    #[serde(default = "default_min_chunk_bytes")]
    pub min_chunk_bytes: usize,
    /// Split oversized diffs into per-chunk LLM calls (default: true).
    #[serde(default = "default_chunking")]
    pub chunking: bool,
}

fn default_max_diff_bytes() -> usize {
    240_000
}

fn default_chunk_budget_bytes() -> usize {
    48_000
}

fn default_min_chunk_bytes() -> usize {
    4_000
}

fn default_chunking() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_diff_bytes: default_max_diff_bytes(),
            chunk_budget_bytes: default_chunk_budget_bytes(),
            min_chunk_bytes: default_min_chunk_bytes(),
            chunking: default_chunking(),
        }
    }
}

impl AnalysisConfig {
    /// Check the threshold ordering invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AugurError::Config`] unless
    /// `0 < min_chunk_bytes <= chunk_budget_bytes < max_diff_bytes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use augur_core::AnalysisConfig;
    ///
    /// let mut config = AnalysisConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.chunk_budget_bytes = config.max_diff_bytes;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), AugurError> {
        if self.min_chunk_bytes == 0 {
            return Err(AugurError::Config(
                "min_chunk_bytes must be positive".into(),
            ));
        }
        if self.min_chunk_bytes > self.chunk_budget_bytes {
            return Err(AugurError::Config(format!(
                "min_chunk_bytes ({}) must not exceed chunk_budget_bytes ({})",
                self.min_chunk_bytes, self.chunk_budget_bytes
            )));
        }
        if self.chunk_budget_bytes >= self.max_diff_bytes {
            return Err(AugurError::Config(format!(
                "chunk_budget_bytes ({}) must be strictly smaller than max_diff_bytes ({})",
                self.chunk_budget_bytes, self.max_diff_bytes
            )));
        }
        Ok(())
    }
}
