//! Error types for fave-tg

use thiserror::Error;

/// Result type for assembly operations
pub type AssembleResult<T> = std::result::Result<T, AssembleError>;

/// Assembly pipeline error type
#[derive(Debug, Error)]
pub enum AssembleError {
    /// fave-common error (format, domain, tier kind, config)
    #[error(transparent)]
    Common(#[from] fave_common::Error),

    /// Manifest content that parses but makes no sense
    #[error("Invalid manifest: {0}")]
    Manifest(String),

    /// Manifest TOML syntax or schema error
    #[error("Manifest parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<fave_common::FormatError> for AssembleError {
    fn from(err: fave_common::FormatError) -> Self {
        AssembleError::Common(err.into())
    }
}
