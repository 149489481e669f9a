//! Error taxonomy for the orchestration layer.
//!
//! Only unrecoverable failures are errors. A degraded catalog (fallback
//! substituted), a forgotten job (lenient 404) and a job the service
//! reports as failed are reflected in state and logs instead.

use napire_backend::BackendError;

/// Napire orchestration errors.
#[derive(Debug, thiserror::Error)]
pub enum NapireError {
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(#[source] BackendError),

    #[error("job transport error: {0}")]
    JobTransport(#[source] BackendError),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("no model loaded")]
    NoModelLoaded,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl NapireError {
    /// The backend failure behind this error, if any.
    pub fn backend(&self) -> Option<&BackendError> {
        match self {
            NapireError::CatalogUnavailable(e) | NapireError::JobTransport(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for napire orchestration operations.
pub type Result<T> = std::result::Result<T, NapireError>;
