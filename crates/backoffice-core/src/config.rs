// ── Runtime console configuration ──
//
// These types describe *where* the admin API lives and how the console
// navigates. They never touch disk: the CLI resolves a profile and hands a
// `ConsoleConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// Navigation targets used by the route guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    /// Where unauthenticated users are sent.
    pub login_path: String,
    /// Where authenticated users land by default.
    pub landing_path: String,
    /// Query parameter carrying the originally requested path.
    pub return_param: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".into(),
            landing_path: "/dashboard".into(),
            return_param: "returnUrl".into(),
        }
    }
}

/// Everything needed to talk to one admin API.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API base URL (e.g. `https://shop.example.com/api`).
    pub api_url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Rows per page for list controllers.
    pub page_size: u32,
    pub routes: RouteConfig,
}

impl ConsoleConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: DEFAULT_PAGE_SIZE,
            routes: RouteConfig::default(),
        }
    }
}
