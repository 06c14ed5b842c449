//! Error types for the model host

/// Result type alias using the model host's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for model host operations
///
/// The first five variants form the taxonomy every caller of the prediction
/// core sees. Load-time failures are always `Configuration`; per-request
/// failures are always one of `NotFound`, `Deserialization`, `Validation` or
/// `Prediction`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad plugin reference, contract violation or duplicate key
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unknown qualified name
    #[error("not found: {0}")]
    NotFound(String),

    /// Payload could not be parsed into structured data
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Payload does not satisfy a model's input schema
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal failure while a model was predicting
    #[error("prediction error: {0}")]
    Prediction(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new deserialization error
    pub fn deserialization(msg: impl Into<String>) -> Self {
        Self::Deserialization(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new prediction error
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Wire name of the error kind, as used in the `type` field of error bodies
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Deserialization(_) => "DESERIALIZATION_ERROR",
            Self::Validation(_) => "SCHEMA_ERROR",
            _ => "ERROR",
        }
    }

    /// Whether this error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Deserialization(_) | Self::Validation(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Deserialization(err.to_string())
    }
}
