//! Shared configuration for backoffice tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), the
//! session file location, and translation to
//! `backoffice_core::ConsoleConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use backoffice_core::{ConsoleConfig, DEFAULT_PAGE_SIZE, RouteConfig, TlsVerification};

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "backoffice";
/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "BACKOFFICE_";
/// Fallback password variable when a profile names none.
pub const PASSWORD_ENV: &str = "BACKOFFICE_PASSWORD";
/// Fallback login email variable.
pub const EMAIL_ENV: &str = "BACKOFFICE_EMAIL";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no {what} configured for profile '{profile}'")]
    NoCredentials { profile: String, what: &'static str },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile name to use: explicit override, then `default_profile`,
    /// then `"default"`.
    pub fn profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles.get(name).ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// A named API profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://shop.example.com/api").
    pub api_url: String,

    /// Login email.
    pub email: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override rows per page.
    pub page_size: Option<u32>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "backoffice", "backoffice")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("backoffice");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the persisted session for `profile` lives.
pub fn session_path(profile: &str) -> PathBuf {
    let file = format!("session-{profile}.json");
    project_dirs().map_or_else(|| dirs_fallback().join(&file), |dirs| dirs.data_dir().join(&file))
}

// ── Loading & saving ────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, layered over defaults and under
/// `BACKOFFICE_`-prefixed environment variables (`__` separates levels,
/// e.g. `BACKOFFICE_DEFAULTS__PAGE_SIZE`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML at the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Login email: profile, then `BACKOFFICE_EMAIL`.
pub fn resolve_email(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .email
        .clone()
        .or_else(|| std::env::var(EMAIL_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
            what: "email",
        })
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Password: profile's `password_env`, then `BACKOFFICE_PASSWORD`, then the
/// system keyring, then plaintext in the config.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Env vars
    let env_names = profile.password_env.iter().map(String::as_str).chain([PASSWORD_ENV]);
    for name in env_names {
        if let Ok(pw) = std::env::var(name) {
            return Ok(SecretString::from(pw));
        }
    }

    // 2. Keyring
    if let Ok(pw) = keyring_entry(profile_name).and_then(|e| e.get_password()) {
        return Ok(SecretString::from(pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        what: "password",
    })
}

/// Store a password in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ConsoleConfig` from a profile and the global defaults.
pub fn profile_to_console_config(profile: &Profile, defaults: &Defaults) -> Result<ConsoleConfig, ConfigError> {
    let api_url: url::Url = profile.api_url.parse().map_err(|e| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL '{}': {e}", profile.api_url),
    })?;
    if !matches!(api_url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("unsupported scheme '{}'", api_url.scheme()),
        });
    }

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    Ok(ConsoleConfig {
        api_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        page_size,
        routes: RouteConfig::default(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile(url: &str) -> Profile {
        Profile {
            api_url: url.into(),
            ..Profile::default()
        }
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "staging"

[defaults]
page_size = 50

[profiles.staging]
api_url = "https://staging.example.com/api"
email = "ops@example.com"
insecure = true
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.profile_name(None), "staging");
        assert_eq!(cfg.profile_name(Some("prod")), "prod");
        assert_eq!(cfg.defaults.page_size, 50);
        assert_eq!(cfg.defaults.output, "table");

        let p = cfg.profile("staging").unwrap();
        assert_eq!(p.email.as_deref(), Some("ops@example.com"));
        assert!(matches!(cfg.profile("prod"), Err(ConfigError::UnknownProfile { .. })));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile("http://localhost:8080/api"));
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["default"].api_url, "http://localhost:8080/api");
    }

    #[test]
    fn console_config_uses_defaults_and_overrides() {
        let defaults = Defaults::default();

        let cc = profile_to_console_config(&profile("https://shop.example.com/api"), &defaults).unwrap();
        assert_eq!(cc.page_size, 20);
        assert_eq!(cc.timeout, Duration::from_secs(30));
        assert_eq!(cc.tls, TlsVerification::SystemDefaults);
        assert_eq!(cc.routes.login_path, "/login");

        let custom = Profile {
            ca_cert: Some(PathBuf::from("/etc/ca.pem")),
            timeout: Some(5),
            page_size: Some(100),
            ..profile("https://shop.example.com/api")
        };
        let cc = profile_to_console_config(&custom, &defaults).unwrap();
        assert_eq!(cc.tls, TlsVerification::CustomCa(PathBuf::from("/etc/ca.pem")));
        assert_eq!(cc.timeout, Duration::from_secs(5));
        assert_eq!(cc.page_size, 100);
    }

    #[test]
    fn invalid_urls_are_rejected() {
        let defaults = Defaults::default();
        for bad in ["not a url", "ftp://files.example.com"] {
            let err = profile_to_console_config(&profile(bad), &defaults).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
        }
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let p = Profile {
            page_size: Some(0),
            ..profile("https://shop.example.com/api")
        };
        assert!(profile_to_console_config(&p, &Defaults::default()).is_err());
    }

    #[test]
    fn session_path_is_per_profile() {
        assert_ne!(session_path("a"), session_path("b"));
        assert!(session_path("a").ends_with("session-a.json"));
    }
}
