//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use backoffice_core::{Console, Navigator, Redirect, RouteGuard};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Whether stdin is a terminal a prompt can read from.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !is_interactive() {
        return Err(CliError::NonInteractiveRequiresYes { action: action.into() });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Run `fut` behind a stderr spinner when attached to a terminal.
pub async fn with_spinner<T>(global: &GlobalOpts, message: &str, fut: impl Future<Output = T>) -> T {
    if global.quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));

    let out = fut.await;
    bar.finish_and_clear();
    out
}

// ── Route guards ────────────────────────────────────────────────────

/// Remembers where a guard wanted to send us; a terminal has nowhere to
/// navigate to, so the caller turns the redirect into an error or message.
#[derive(Debug, Default)]
pub struct CliNavigator {
    last: Mutex<Option<Redirect>>,
}

impl CliNavigator {
    pub fn take(&self) -> Option<Redirect> {
        self.last.lock().ok().and_then(|mut r| r.take())
    }
}

impl Navigator for CliNavigator {
    fn navigate(&self, path: &str, query: &[(String, String)]) {
        tracing::debug!(path, ?query, "guard redirect");
        if let Ok(mut last) = self.last.lock() {
            *last = Some(Redirect {
                target: path.to_owned(),
                query: query.to_vec(),
            });
        }
    }
}

/// Pass `route` through the auth guard; an unauthenticated session fails
/// with a hint to log in.
pub fn require_login(console: &Console, route: &str) -> Result<(), CliError> {
    let nav = CliNavigator::default();
    if console.auth_guard().activate(route, &nav) {
        return Ok(());
    }
    if let Some(redirect) = nav.take() {
        tracing::debug!(location = %redirect.to_location(), "protected route refused");
    }
    Err(CliError::NotSignedIn)
}
