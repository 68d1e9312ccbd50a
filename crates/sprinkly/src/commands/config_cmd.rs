//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Mask plaintext passwords before display.
fn redact(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("****".into());
        }
    }
    cfg
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redact(config::load_config_or_default());
            let text = config::render_toml(&cfg)?;
            let out = output::render_single(&global.output, &cfg, |_| text.clone(), |c| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { name } => {
            let cfg = config::load_config_or_default();
            let profile_name = name.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let secret = rpassword::prompt_password("Device password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }
            config::store_password(&profile_name, &secret)?;

            if !global.quiet {
                eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Profile;

    fn config_with_secret() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "garden".into(),
            Profile {
                host: "10.0.0.5".into(),
                password: Some("hunter2".into()),
                stations: vec![0, 1],
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn table_view_masks_password() {
        let out = config::render_toml(&redact(config_with_secret())).unwrap();
        assert!(out.contains("[profiles.garden]"));
        assert!(out.contains("stations = [0, 1]"));
        assert!(out.contains("password = \"****\""));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn structured_view_masks_password() {
        let cfg = redact(config_with_secret());
        assert_eq!(cfg.profiles["garden"].password.as_deref(), Some("****"));
    }
}
