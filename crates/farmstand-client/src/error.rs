//! # Client Error Types
//!
//! Every failure the client can produce, normalized into one type with a
//! single human-readable message.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ClientError Categories                               │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │     Server      │  │       Local             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Timeout        │  │  Server{status, │  │  Storage                │ │
//! │  │  Network        │  │    message}     │  │  Config                 │ │
//! │  │  Unexpected     │  │  Decode         │  │  Validation / Domain    │ │
//! │  │                 │  │                 │  │  NotAuthenticated       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  user_message(): the one string a shell shows to the user              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use farmstand_core::{CoreError, ValidationError};
use farmstand_store::StoreError;

use crate::transport::TransportError;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request exceeded the client-wide timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// Transport failed in a way that fits no other category.
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// Non-2xx response. `message` is the server's own text when it sent one.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Domain(#[from] CoreError),

    /// No session, or the session was cleared after a failed refresh.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Operation not valid in the current client state (e.g. empty cart).
    #[error("{0}")]
    InvalidState(String),
}

impl ClientError {
    /// Server error with the given status, for tests and fallbacks.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ClientError::Server {
            status,
            message: message.into(),
        }
    }

    /// The message to show the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Timeout => "The request timed out. Please try again.".to_string(),
            ClientError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            ClientError::Unexpected(_) => "Something went wrong. Please try again.".to_string(),
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Decode(_) => {
                "Received an unexpected response from the server.".to_string()
            }
            ClientError::Storage(_) => "Could not access local storage on this device.".to_string(),
            ClientError::NotAuthenticated => "Please log in to continue.".to_string(),
            ClientError::Config(msg) => format!("Configuration problem: {msg}"),
            ClientError::Validation(e) => e.to_string(),
            ClientError::Domain(e) => e.to_string(),
            ClientError::InvalidState(msg) => msg.clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 from the server, or no local session at all.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ClientError::Server { status: 401, .. } | ClientError::NotAuthenticated
        )
    }

    /// Whether a user-initiated retry could plausibly succeed.
    ///
    /// The client itself never retries on this basis.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Timeout | ClientError::Network(_) => true,
            ClientError::Server { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ClientError::Timeout,
            TransportError::Connect(msg) => ClientError::Network(msg),
            TransportError::Other(msg) => ClientError::Unexpected(msg),
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(format!("Invalid config file: {err}"))
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::Config(format!("Could not serialize config: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ClientError::Timeout.user_message(),
            "The request timed out. Please try again."
        );
        assert_eq!(
            ClientError::server(400, "Phone already registered").user_message(),
            "Phone already registered"
        );
        assert!(ClientError::Network("dns".into())
            .user_message()
            .contains("Unable to reach the server"));
    }

    #[test]
    fn test_categories() {
        assert!(ClientError::server(401, "Unauthorized").is_unauthorized());
        assert!(ClientError::NotAuthenticated.is_unauthorized());
        assert!(!ClientError::server(403, "Forbidden").is_unauthorized());

        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::server(503, "down").is_retryable());
        assert!(!ClientError::server(400, "bad").is_retryable());
    }

    #[test]
    fn test_transport_conversion() {
        assert!(matches!(
            ClientError::from(TransportError::Timeout),
            ClientError::Timeout
        ));
        assert!(matches!(
            ClientError::from(TransportError::Connect("refused".into())),
            ClientError::Network(_)
        ));
    }
}
