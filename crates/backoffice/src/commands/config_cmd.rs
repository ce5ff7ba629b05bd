//! Config subcommand handlers.

use dialoguer::{Input, Select};

use backoffice_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(global.output, &cfg, show_detail, |_| "config".into())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = cfg.profile_name(global.profile.as_deref());
            cfg.profile(&profile_name)?;

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            config::store_password(&profile_name, &secret)?;
            output::print_status(
                &format!("✓ Password stored in system keyring for profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}

/// Table view of the config. Plaintext passwords are masked.
fn show_detail(cfg: &Config) -> String {
    let mut lines = vec![
        format!("Default profile: {}", cfg.default_profile.as_deref().unwrap_or("default")),
        format!("Output:          {}", cfg.defaults.output),
        format!("Timeout:         {}s", cfg.defaults.timeout),
        format!("Page size:       {}", cfg.defaults.page_size),
    ];

    let mut profiles: Vec<_> = cfg.profiles.iter().collect();
    profiles.sort_by_key(|(name, _)| *name);
    for (name, p) in profiles {
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  api_url:  {}", p.api_url));
        lines.push(format!("  email:    {}", p.email.as_deref().unwrap_or("-")));
        let password = match (&p.password, &p.password_env) {
            (Some(_), _) => "(plaintext)".to_owned(),
            (None, Some(var)) => format!("${var}"),
            (None, None) => "(keyring)".to_owned(),
        };
        lines.push(format!("  password: {password}"));
        if p.insecure.unwrap_or(false) {
            lines.push("  insecure: true".into());
        }
        if let Some(ref ca) = p.ca_cert {
            lines.push(format!("  ca_cert:  {}", ca.display()));
        }
    }
    lines.join("\n")
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("backoffice: configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let api_url: String = Input::new()
        .with_prompt("API URL")
        .default("http://localhost:8080/api".into())
        .interact_text()
        .map_err(prompt_err)?;

    let email: String = Input::new()
        .with_prompt("Login email")
        .interact_text()
        .map_err(prompt_err)?;

    let password = rpassword::prompt_password("Password (leave empty to enter at login): ").map_err(prompt_err)?;

    let stored_password = if password.is_empty() {
        None
    } else {
        let store_choices = &["Store in system keyring (recommended)", "Save to config file (plaintext)"];
        let store_selection = Select::new()
            .with_prompt("Where to store the password?")
            .items(store_choices)
            .default(0)
            .interact()
            .map_err(prompt_err)?;

        if store_selection == 0 {
            config::store_password(&profile_name, &password)?;
            eprintln!("   ✓ Password stored in system keyring");
            None
        } else {
            Some(password)
        }
    };

    let profile = Profile {
        api_url,
        email: Some(email),
        password: stored_password,
        ..Profile::default()
    };

    // Validate before writing anything.
    let mut cfg = config::load_config_or_default();
    config::profile_to_console_config(&profile, &cfg.defaults)?;

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Next: backoffice login");
    Ok(())
}
