//! Error types for napire-backend

use thiserror::Error;

/// Errors that can occur while talking to the inference service.
///
/// Every variant carries the endpoint path (`/descriptions`, `/tasks`, ...)
/// so callers can key fallback payloads and user notifications off it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The service answered with a non-success status code
    #[error("Request to {endpoint} failed: {status_text} ({status})")]
    Status {
        endpoint: String,
        status: u16,
        status_text: String,
    },

    /// The request never produced a response (connect, timeout, TLS)
    #[error("Request to {endpoint} failed: {reason} (0)")]
    Transport { endpoint: String, reason: String },

    /// The response body did not match the expected shape
    #[error("Invalid response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

impl BackendError {
    /// Build a status error from an HTTP status code.
    pub fn status(endpoint: &str, status: u16) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Error")
            .to_string();
        BackendError::Status {
            endpoint: endpoint.to_string(),
            status,
            status_text,
        }
    }

    /// Build a transport error.
    pub fn transport(endpoint: &str, reason: impl Into<String>) -> Self {
        BackendError::Transport {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    /// Endpoint path the failing request was sent to, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            BackendError::Status { endpoint, .. }
            | BackendError::Transport { endpoint, .. }
            | BackendError::Decode { endpoint, .. } => Some(endpoint),
            BackendError::ClientSetup(_) => None,
        }
    }

    /// HTTP status code, when the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the service reported the resource as missing (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_names_endpoint_and_status() {
        let err = BackendError::status("/tasks", 404);
        assert_eq!(err.to_string(), "Request to /tasks failed: Not Found (404)");
        assert!(err.is_not_found());
        assert_eq!(err.endpoint(), Some("/tasks"));
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = BackendError::transport("/items", "connection refused");
        assert_eq!(err.status_code(), None);
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("connection refused"));
    }
}
