mod cli;
mod commands;
mod error;
mod output;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use backoffice_config::{Config, Profile};
use backoffice_core::{Console, ConsoleConfig, FileStorage, TlsVerification};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need an API connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "backoffice", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let session = build_session(&cli.global)?;
            tracing::debug!(command = ?cmd, profile = %session.profile, "dispatching command");
            commands::dispatch(cmd, &session, &cli.global).await
        }
    }
}

/// Everything a command needs: the console plus the profile it came from.
pub struct CliSession {
    pub console: Console,
    pub profile: String,
    pub config: Config,
}

impl CliSession {
    pub fn profile_settings(&self) -> Option<&Profile> {
        self.config.profiles.get(&self.profile)
    }
}

/// Build the console for the active profile, with CLI flag overrides and
/// the profile's session file as durable storage.
fn build_session(global: &GlobalOpts) -> Result<CliSession, CliError> {
    let config = backoffice_config::load_config_or_default();
    let profile = config.profile_name(global.profile.as_deref());

    let mut console_config = match (config.profiles.get(&profile), global.api_url.as_deref()) {
        (Some(p), _) => backoffice_config::profile_to_console_config(p, &config.defaults)?,
        (None, Some(url)) => {
            let adhoc = Profile {
                api_url: url.to_owned(),
                ..Profile::default()
            };
            backoffice_config::profile_to_console_config(&adhoc, &config.defaults)?
        }
        (None, None) if global.profile.is_some() => {
            return Err(backoffice_config::ConfigError::UnknownProfile { name: profile }.into());
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: backoffice_config::config_path().display().to_string(),
            });
        }
    };
    apply_overrides(&mut console_config, global)?;

    let storage = Arc::new(FileStorage::new(backoffice_config::session_path(&profile)));
    let console = Console::new(console_config, storage)?;

    Ok(CliSession {
        console,
        profile,
        config,
    })
}

fn apply_overrides(cfg: &mut ConsoleConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref url) = global.api_url {
        cfg.api_url = url.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {url}"),
        })?;
    }
    if global.insecure {
        cfg.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        cfg.timeout = Duration::from_secs(secs);
    }
    Ok(())
}
