// ── Core error types ──
//
// User-facing errors from backoffice-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the fetcher contract speaks
// `TransportError`, and the session and list layers translate that into
// `AuthError` / `ListError`.

use std::fmt;

use thiserror::Error;

use crate::resource::RowId;

// ── Transport ───────────────────────────────────────────────────────

/// Broad classification of a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Server unreachable, timed out, or the connection dropped.
    Network,
    /// The bearer token was missing or rejected.
    Unauthorized,
    /// The addressed resource does not exist.
    NotFound,
    /// The server answered with a non-success status.
    Rejected,
    /// The response body could not be decoded.
    Decode,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Network => "network error",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not found",
            Self::Rejected => "request rejected",
            Self::Decode => "malformed response",
        };
        f.write_str(s)
    }
}

/// Failure reported by a [`ResourceFetcher`](crate::list::ResourceFetcher)
/// or [`Authenticator`](crate::gateway::Authenticator).
///
/// Carries an optional human-readable message from the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: Option<String>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == TransportErrorKind::Unauthorized
    }
}

// ── Authentication ──────────────────────────────────────────────────

/// Why a login attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    #[error("Cannot reach the server: {message}")]
    Network { message: String },

    #[error("Login failed: {message}")]
    Unknown { message: String },
}

impl AuthError {
    /// Text suitable for showing next to a login form.
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidCredentials { message }
            | Self::Network { message }
            | Self::Unknown { message } => message,
        }
    }
}

impl From<TransportError> for AuthError {
    fn from(err: TransportError) -> Self {
        match err.kind {
            TransportErrorKind::Unauthorized | TransportErrorKind::Rejected => {
                AuthError::InvalidCredentials {
                    message: err
                        .message
                        .unwrap_or_else(|| "Login failed. Please check your credentials.".into()),
                }
            }
            TransportErrorKind::Network => AuthError::Network {
                message: err.message.unwrap_or_else(|| "server unreachable".into()),
            },
            TransportErrorKind::NotFound | TransportErrorKind::Decode => AuthError::Unknown {
                message: err.to_string(),
            },
        }
    }
}

// ── Lists ───────────────────────────────────────────────────────────

/// Why a list operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("Cannot reach the server: {message}")]
    Network { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Session expired. Please sign in again.")]
    Unauthorized,

    #[error("Row {id} cannot be deleted")]
    NotPermitted { id: RowId },

    #[error("{message}")]
    Unknown { message: String },
}

impl ListError {
    /// Whether signing in again could resolve this failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<TransportError> for ListError {
    fn from(err: TransportError) -> Self {
        match err.kind {
            TransportErrorKind::Network => ListError::Network {
                message: err.message.unwrap_or_else(|| "server unreachable".into()),
            },
            TransportErrorKind::NotFound => ListError::NotFound {
                message: err.message.unwrap_or_else(|| "resource not found".into()),
            },
            TransportErrorKind::Unauthorized => ListError::Unauthorized,
            TransportErrorKind::Rejected | TransportErrorKind::Decode => ListError::Unknown {
                message: err.to_string(),
            },
        }
    }
}

// ── Facade ──────────────────────────────────────────────────────────

/// Unified error type for callers that drive the whole console.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    List(#[from] ListError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        let bare = TransportError::new(TransportErrorKind::Network);
        assert_eq!(bare.to_string(), "network error");

        let with = TransportError::with_message(TransportErrorKind::Rejected, "HTTP 500");
        assert_eq!(with.to_string(), "request rejected: HTTP 500");
    }

    #[test]
    fn rejected_login_maps_to_invalid_credentials() {
        let err = AuthError::from(TransportError::with_message(
            TransportErrorKind::Rejected,
            "Invalid email or password",
        ));
        assert_eq!(
            err,
            AuthError::InvalidCredentials {
                message: "Invalid email or password".into()
            }
        );
        assert_eq!(err.user_message(), "Invalid email or password");
    }

    #[test]
    fn list_error_mapping() {
        assert_eq!(
            ListError::from(TransportError::new(TransportErrorKind::Unauthorized)),
            ListError::Unauthorized
        );
        assert!(matches!(
            ListError::from(TransportError::new(TransportErrorKind::NotFound)),
            ListError::NotFound { .. }
        ));
        assert!(matches!(
            ListError::from(TransportError::new(TransportErrorKind::Decode)),
            ListError::Unknown { .. }
        ));
    }
}
