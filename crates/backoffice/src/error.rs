//! CLI error types with miette diagnostics.
//!
//! Maps config and core errors into user-facing errors with actionable help
//! text and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use backoffice_config::ConfigError;
use backoffice_core::{AuthError, CoreError, ListError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the admin API: {message}")]
    #[diagnostic(
        code(backoffice::connection_failed),
        help(
            "Check that the API is running and the URL is correct.\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed: {message}")]
    #[diagnostic(
        code(backoffice::auth_failed),
        help("Verify the email and password for profile '{profile}'.\nRun: backoffice config set-password")
    )]
    AuthFailed { profile: String, message: String },

    #[error("Not signed in")]
    #[diagnostic(code(backoffice::not_signed_in), help("Run: backoffice login"))]
    NotSignedIn,

    #[error("Session expired")]
    #[diagnostic(
        code(backoffice::session_expired),
        help("The server no longer accepts the stored token. Run: backoffice login")
    )]
    SessionExpired,

    #[error("Already signed in as {username}")]
    #[diagnostic(
        code(backoffice::already_signed_in),
        help("Use --force to sign in again, or run: backoffice logout")
    )]
    AlreadySignedIn { username: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(backoffice::no_credentials),
        help(
            "Configure credentials with: backoffice config init\n\
             Or set BACKOFFICE_EMAIL / BACKOFFICE_PASSWORD."
        )
    )]
    NoCredentials { profile: String, what: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(backoffice::not_found),
        help("Run: backoffice {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' cannot be deleted")]
    #[diagnostic(code(backoffice::not_permitted), help("Administrator accounts are protected."))]
    NotPermitted {
        resource_type: String,
        identifier: String,
    },

    #[error("API error: {message}")]
    #[diagnostic(code(backoffice::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(backoffice::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(backoffice::profile_not_found),
        help("Available profiles: {available}\nCreate one with: backoffice config init")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(backoffice::no_config),
        help("Create one with: backoffice config init\nExpected at: {path}")
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(backoffice::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(backoffice::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. }
            | Self::NotSignedIn
            | Self::SessionExpired
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::NotPermitted { .. } => exit_code::PERMISSION,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } | Self::AlreadySignedIn { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// An auth failure reported against a named profile.
    pub fn from_auth(err: AuthError, profile: &str) -> Self {
        match err {
            AuthError::InvalidCredentials { message } => Self::AuthFailed {
                profile: profile.into(),
                message,
            },
            AuthError::Network { message } => Self::ConnectionFailed { message },
            AuthError::Unknown { message } => Self::ApiError { message },
        }
    }

    /// A list failure for `resource_type`; `list_command` is suggested when
    /// the resource is missing.
    pub fn from_list(err: ListError, resource_type: &str, list_command: &str) -> Self {
        match err {
            ListError::Network { message } => Self::ConnectionFailed { message },
            ListError::NotFound { message } => Self::NotFound {
                resource_type: resource_type.into(),
                identifier: message,
                list_command: list_command.into(),
            },
            ListError::Unauthorized => Self::SessionExpired,
            ListError::NotPermitted { id } => Self::NotPermitted {
                resource_type: resource_type.into(),
                identifier: id.to_string(),
            },
            ListError::Unknown { message } => Self::ApiError { message },
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile, what } => Self::NoCredentials {
                profile,
                what: what.into(),
            },
            ConfigError::UnknownProfile { name } => {
                let cfg = backoffice_config::load_config_or_default();
                let mut available: Vec<_> = cfg.profiles.into_keys().collect();
                available.sort();
                Self::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                }
            }
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Auth(e) => Self::from_auth(e, "current"),
            CoreError::List(e) => Self::from_list(e, "resource", "--help"),
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_errors_map_to_exit_codes() {
        let cases = [
            (ListError::Unauthorized, exit_code::AUTH),
            (ListError::NotPermitted { id: 1 }, exit_code::PERMISSION),
            (ListError::NotFound { message: "gone".into() }, exit_code::NOT_FOUND),
            (ListError::Network { message: "refused".into() }, exit_code::CONNECTION),
            (ListError::Unknown { message: "boom".into() }, exit_code::GENERAL),
        ];
        for (err, code) in cases {
            assert_eq!(CliError::from_list(err, "user", "users list").exit_code(), code);
        }
    }

    #[test]
    fn rejected_login_names_the_profile() {
        let err = CliError::from_auth(
            AuthError::InvalidCredentials {
                message: "bad password".into(),
            },
            "staging",
        );
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert!(matches!(err, CliError::AuthFailed { ref profile, .. } if profile == "staging"));
    }

    #[test]
    fn missing_credentials_are_auth_errors() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "default".into(),
            what: "password",
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
