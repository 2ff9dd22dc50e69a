//! Configuration for the dashboard

use crate::error::{Result, StockError};
use crate::ticker::{DEFAULT_TICKER, Ticker};
use idx_utils::EnvSource;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default generative model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Maximum characters of pasted text sent for analysis
pub const DEFAULT_MAX_TEXT_CHARS: usize = 5000;

/// Value shipped in sample configs; treated as "no key"
pub const API_KEY_PLACEHOLDER: &str = "GANTI_DENGAN_GEMINI_API_KEY_ANDA";

/// History ranges the market data adapter understands
pub const SUPPORTED_RANGES: &[&str] = &[
    "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Configuration for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Gemini API key; analysis is unavailable without it
    #[serde(skip_serializing)]
    pub gemini_api_key: Option<String>,

    /// Generative model identifier
    pub model: String,

    /// Ticker selected when a session starts
    pub default_ticker: String,

    /// Price history window
    pub history_range: String,

    /// How long fetched price history stays cached
    pub cache_ttl: Duration,

    /// Pasted text beyond this many characters is dropped
    pub max_text_chars: usize,

    /// Optional HTTP timeout for the generative client
    pub request_timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            default_ticker: DEFAULT_TICKER.to_string(),
            history_range: "6mo".to_string(),
            cache_ttl: Duration::from_secs(3600), // 1 hour
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            request_timeout: None,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Build and validate a configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Whether a usable Gemini API key is present
    pub fn has_api_key(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    /// Parsed default ticker
    pub fn default_ticker(&self) -> Result<Ticker> {
        Ticker::parse(&self.default_ticker)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(StockError::ConfigError("model must not be empty".to_string()));
        }

        if self.max_text_chars == 0 {
            return Err(StockError::ConfigError(
                "max_text_chars must be greater than 0".to_string(),
            ));
        }

        if !SUPPORTED_RANGES.contains(&self.history_range.as_str()) {
            return Err(StockError::ConfigError(format!(
                "Unsupported history range '{}', expected one of {SUPPORTED_RANGES:?}",
                self.history_range
            )));
        }

        self.default_ticker().map_err(|e| {
            StockError::ConfigError(format!("Invalid default ticker: {e}"))
        })?;

        Ok(())
    }
}

/// Drop blank keys and the sample placeholder
fn usable_key(key: String) -> Option<String> {
    let key = key.trim().to_string();
    (!key.is_empty() && key != API_KEY_PLACEHOLDER).then_some(key)
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    gemini_api_key: Option<String>,
    model: Option<String>,
    default_ticker: Option<String>,
    history_range: Option<String>,
    cache_ttl: Option<Duration>,
    max_text_chars: Option<usize>,
    request_timeout: Option<Duration>,
}

impl DashboardConfigBuilder {
    /// Set the Gemini API key
    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = usable_key(key.into());
        self
    }

    /// Set the generative model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the default ticker
    pub fn default_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.default_ticker = Some(ticker.into());
        self
    }

    /// Set the price history window
    pub fn history_range(mut self, range: impl Into<String>) -> Self {
        self.history_range = Some(range.into());
        self
    }

    /// Set cache TTL for price history
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Set the pasted text limit
    pub fn max_text_chars(mut self, limit: usize) -> Self {
        self.max_text_chars = Some(limit);
        self
    }

    /// Set request timeout for the generative client
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Load settings from the process environment
    pub fn with_env(self) -> Self {
        self.with_source(&idx_utils::ProcessEnv)
    }

    /// Load settings from a configuration source
    ///
    /// Recognized keys: `GEMINI_API_KEY`, `GEMINI_MODEL`, `IDX_DEFAULT_TICKER`,
    /// `IDX_HISTORY_RANGE`, `IDX_CACHE_TTL_SECS`, `IDX_REQUEST_TIMEOUT_SECS`.
    /// Values already set on the builder win.
    pub fn with_source(mut self, source: &impl EnvSource) -> Self {
        if self.gemini_api_key.is_none() {
            self.gemini_api_key = source.get("GEMINI_API_KEY").and_then(usable_key);
        }
        if self.model.is_none() {
            self.model = source.get("GEMINI_MODEL");
        }
        if self.default_ticker.is_none() {
            self.default_ticker = source.get("IDX_DEFAULT_TICKER");
        }
        if self.history_range.is_none() {
            self.history_range = source.get("IDX_HISTORY_RANGE");
        }
        if self.cache_ttl.is_none() {
            self.cache_ttl = source.parse("IDX_CACHE_TTL_SECS").map(Duration::from_secs);
        }
        if self.request_timeout.is_none() {
            self.request_timeout = source
                .parse("IDX_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            gemini_api_key: self.gemini_api_key,
            model: self.model.unwrap_or(defaults.model),
            default_ticker: self.default_ticker.unwrap_or(defaults.default_ticker),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            max_text_chars: self.max_text_chars.unwrap_or(defaults.max_text_chars),
            request_timeout: self.request_timeout.or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}
