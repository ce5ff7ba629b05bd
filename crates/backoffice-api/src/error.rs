use thiserror::Error;

/// Top-level error type for the `backoffice-api` crate.
///
/// Covers every failure mode of the admin REST surface: authentication,
/// transport, HTTP status errors, and response decoding.
/// `backoffice-core` maps these into its own error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, failed field validation, ...).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// HTTP 401: bearer token missing, expired, or revoked, or (on login)
    /// the credentials were refused. Carries the server's message, if any.
    #[error("Session expired -- re-authentication required")]
    SessionExpired { message: Option<String> },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate setup error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success HTTP status with the server's message, if any.
    #[error("API error (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the bearer token was rejected and signing in
    /// again might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Returns `true` if the server could not be reached or did not answer in time.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The server-provided message, if the error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Authentication { message } => Some(message),
            Self::Api { message, .. } | Self::SessionExpired { message } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_falls_back_without_message() {
        let err = Error::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error (HTTP 500): no message");

        let err = Error::Api {
            status: 409,
            message: Some("already deleted".into()),
        };
        assert_eq!(err.to_string(), "API error (HTTP 409): already deleted");
    }

    #[test]
    fn classification_helpers() {
        assert!(Error::SessionExpired { message: None }.is_auth_expired());
        assert!(
            Error::Api {
                status: 404,
                message: None
            }
            .is_not_found()
        );
        assert!(!Error::Tls("bad pem".into()).is_transient());
        assert_eq!(
            Error::Authentication {
                message: "Invalid email or password".into()
            }
            .server_message(),
            Some("Invalid email or password")
        );
    }
}
