use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid pattern '{pattern}' for section {label}: {source}")]
    InvalidPattern {
        label: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read document: {0}")]
    ExtractionError(String),

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },
}

impl SplitError {
    /// Configuration errors are fatal and must stop processing before any document
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SplitError::ConfigError(_) | SplitError::InvalidPattern { .. }
        )
    }
}
