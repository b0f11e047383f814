use thiserror::Error;

/// Central error type for the stemsep-core crate.
#[derive(Debug, Error)]
pub enum SepError {
    // Generic fallback (wraps anyhow)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),

    // Domain-specific variants
    #[error("Input file not found: {path}")]
    MissingInput { path: String },

    #[error("Unknown model `{model}` for {engine}")]
    UnknownModel { engine: String, model: String },

    #[error("{tool} invocation failed: {detail}")]
    BackendInvocation { tool: String, detail: String },

    #[error("{tool} produced no usable output in {dir} (found: {listing})")]
    BackendOutputMissing {
        tool: String,
        dir: String,
        listing: String,
    },

    #[error("Unsupported format option: {0}")]
    UnsupportedFormat(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Config dir not available")]
    ConfigDirUnavailable,

    #[error("Job canceled")]
    Canceled,
}

// --- Implement From conversions for common errors ---
impl From<std::io::Error> for SepError {
    fn from(e: std::io::Error) -> Self {
        SepError::Anyhow(e.into())
    }
}

impl From<serde_json::Error> for SepError {
    fn from(e: serde_json::Error) -> Self {
        SepError::Anyhow(e.into())
    }
}

impl From<hound::Error> for SepError {
    fn from(e: hound::Error) -> Self {
        SepError::Anyhow(e.into())
    }
}

pub type Result<T> = std::result::Result<T, SepError>;
