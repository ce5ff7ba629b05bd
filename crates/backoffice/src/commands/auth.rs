//! Login, logout, and whoami handlers.

use secrecy::SecretString;

use backoffice_core::{Credentials, GuardDecision, Identity, Redirect, RouteGuard};

use crate::CliSession;
use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

use super::util::{self, CliNavigator};

fn detail(who: &Identity) -> String {
    [
        format!("ID:       {}", who.id),
        format!("Username: {}", who.username),
        format!("Email:    {}", who.email),
        format!("Role:     {}", who.role.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

/// Credentials from flags, profile, env, and keyring, prompting for
/// whatever is still missing when attached to a terminal.
fn gather_credentials(session: &CliSession, email: Option<String>) -> Result<Credentials, CliError> {
    let fallback = backoffice_config::Profile::default();
    let profile = session.profile_settings().unwrap_or(&fallback);

    let email = match email {
        Some(e) => e,
        None => match backoffice_config::resolve_email(profile, &session.profile) {
            Ok(e) => e,
            Err(_) if util::is_interactive() => dialoguer::Input::<String>::new()
                .with_prompt("Email")
                .interact_text()
                .map_err(util::prompt_err)?,
            Err(e) => return Err(e.into()),
        },
    };

    let password = match backoffice_config::resolve_password(profile, &session.profile) {
        Ok(pw) => pw,
        Err(_) if util::is_interactive() => {
            let pw = rpassword::prompt_password("Password: ").map_err(util::prompt_err)?;
            SecretString::from(pw)
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Credentials::new(email, password))
}

pub async fn login(session: &CliSession, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let console = &session.console;
    let routes = &console.config().routes;

    if let GuardDecision::Redirect(_) = console.login_guard().check(&routes.login_path) {
        if !args.force {
            let username = console
                .session()
                .identity()
                .map(|i| i.username.clone())
                .unwrap_or_default();
            return Err(CliError::AlreadySignedIn { username });
        }
        tracing::debug!("--force: replacing active session");
    }

    let credentials = gather_credentials(session, args.email)?;
    let nav = CliNavigator::default();
    let who = util::with_spinner(
        global,
        "Signing in...",
        console
            .gateway()
            .login_and_resume(&credentials, args.return_to.as_deref(), &nav),
    )
    .await
    .map_err(|e| CliError::from_auth(e, &session.profile))?;

    if !console.session().storage_available() {
        tracing::warn!("session storage unavailable; login lasts for this process only");
    }

    let destination = nav.take().as_ref().map(Redirect::to_location).unwrap_or_default();
    output::print_status(
        &format!("✓ Signed in as {} ({}) → {destination}", who.username, who.email),
        global.quiet,
    );
    Ok(())
}

pub fn logout(session: &CliSession, global: &GlobalOpts) -> Result<(), CliError> {
    let was_signed_in = session.console.session().is_authenticated();
    let nav = CliNavigator::default();
    session.console.gateway().logout_and_redirect(&nav);

    let msg = if was_signed_in {
        let destination = nav.take().as_ref().map(Redirect::to_location).unwrap_or_default();
        format!("✓ Signed out → {destination}")
    } else {
        "Not signed in; nothing to do".to_owned()
    };
    output::print_status(&msg, global.quiet);
    Ok(())
}

pub fn whoami(session: &CliSession, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_login(&session.console, "/profile")?;
    let who = session.console.session().identity().ok_or(CliError::NotSignedIn)?;

    let out = output::render_single(global.output, who.as_ref(), detail, |i| i.email.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
