//! Error taxonomy for the credential pipeline and session lifecycle.

use std::fmt;

use crate::graphql::GraphqlError;

/// Result alias for pipeline and client operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Connectivity failure, non-2xx status, or a malformed response body.
    Transport,
    /// One or more structured errors returned by the endpoint.
    Protocol,
    /// Successful response whose payload was empty (null user / null token).
    AuthFailed,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthErrorKind::Transport => write!(f, "transport"),
            AuthErrorKind::Protocol => write!(f, "protocol"),
            AuthErrorKind::AuthFailed => write!(f, "auth_failed"),
        }
    }
}

/// Structured failure raised by sign-in, sign-up, and token validation.
#[derive(Debug, Clone)]
pub struct AuthError {
    /// Error category.
    pub kind: AuthErrorKind,
    /// One-line summary suitable for logs.
    pub message: String,
    /// Structured protocol error entries; empty for other kinds.
    pub errors: Vec<GraphqlError>,
}

impl AuthError {
    /// Creates a transport-level error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: AuthErrorKind::Transport,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Creates a transport error from an HTTP status and response body.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {body}")
        };
        Self::transport(message)
    }

    /// Creates a protocol error from the response's error entries.
    pub fn protocol(errors: Vec<GraphqlError>) -> Self {
        let message = errors
            .first()
            .map_or_else(|| "GraphQL error".to_string(), |e| e.message.clone());
        Self {
            kind: AuthErrorKind::Protocol,
            message,
            errors,
        }
    }

    /// Creates the empty-payload failure.
    pub fn auth_failed() -> Self {
        Self {
            kind: AuthErrorKind::AuthFailed,
            message: "authentication failed".to_string(),
            errors: Vec::new(),
        }
    }

    /// Short message suitable for presenting to a user.
    pub fn user_message(&self) -> String {
        match self.kind {
            AuthErrorKind::Transport => {
                "Server unreachable. Check your connection and try again.".to_string()
            }
            AuthErrorKind::Protocol => self.message.clone(),
            AuthErrorKind::AuthFailed => "Invalid credentials.".to_string(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AuthError {}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}
