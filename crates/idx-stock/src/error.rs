//! Error types for dashboard operations

use thiserror::Error;

/// Market data, configuration, and prompt errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Invalid ticker provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Prompt template error
    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    /// Generative client could not be built
    #[error("Generative client error: {0}")]
    ClientError(#[from] idx_llm::LLMError),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

/// Failures of one analysis submission
///
/// `Upload` and `Generation` never reach the caller as errors: the executor
/// folds them into a `Failed` session carrying the message. `Cleanup` is only
/// ever logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Neither text nor a document was supplied
    #[error("No text or document supplied")]
    InputMissing,

    /// An analysis is already in flight for this session
    #[error("An analysis is already running for this session")]
    AlreadyRunning,

    /// A completion arrived while no analysis was running
    #[error("No analysis is running for this session")]
    NotRunning,

    /// No generative client is configured
    #[error("Generative AI client is not configured (set GEMINI_API_KEY)")]
    ClientUnavailable,

    /// The analyst prompt could not be rendered
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// The document could not be persisted or uploaded
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The generation call failed or returned an error-marked text
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The uploaded document could not be deleted remotely
    #[error("Cleanup failed: {0}")]
    Cleanup(String),
}
