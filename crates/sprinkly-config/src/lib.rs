//! Shared configuration for sprinkly.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and
//! translation to `sprinkly_core::ControllerConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::BTreeMap;
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

use sprinkly_core::{ControllerConfig, IndexFilter, TlsVerification};

/// Keyring service name passwords are stored under.
pub const KEYRING_SERVICE: &str = "sprinkly";

/// Environment variable consulted for the device password.
pub const PASSWORD_ENV: &str = "SPRINKLY_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
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
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Minimum seconds between cache refreshes.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
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
    10
}
fn default_refresh_interval() -> u64 {
    60
}

/// A named device profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Profile {
    /// Device address (`10.0.0.5`, `sprinkler.local:8080`) or base URL.
    pub host: String,

    /// Device password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Station indices to expose; empty exposes all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stations: Vec<usize>,

    /// Program indices to expose; empty exposes all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub programs: Vec<usize>,

    /// Path to a custom CA certificate (for `https://` hosts).
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification (for `https://` hosts).
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override refresh interval.
    pub refresh_interval: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "sprinkly", "sprinkly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sprinkly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment.
///
/// A missing file is not an error. Environment variables use the
/// `SPRINKLY_` prefix with `__` separating nested keys, e.g.
/// `SPRINKLY_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SPRINKLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config rendering ────────────────────────────────────────────────

/// Serialize config back to the TOML layout `load_config_from` reads.
pub fn render_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Password resolution ─────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

/// Resolve the device password for a profile (no CLI flag step).
///
/// Order: the profile's `password_env` variable, `SPRINKLY_PASSWORD`,
/// the system keyring, then the plaintext `password` field.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        |profile_name| {
            keyring_entry(profile_name)
                .ok()
                .and_then(|entry| entry.get_password().ok())
        },
    )
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl FnOnce(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Some(val) = env(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Some(val) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Some(val) = keyring(profile_name) {
        return Ok(SecretString::from(val));
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── ControllerConfig translation ────────────────────────────────────

/// Check that `host` can be turned into a device base URL.
pub fn validate_host(host: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "host".into(),
        reason,
    };
    let trimmed = host.trim();
    if trimmed.is_empty() {
        return Err(invalid("host is empty".into()));
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };
    let url = url::Url::parse(&candidate).map_err(|e| invalid(format!("{host}: {e}")))?;
    if url.host_str().is_none() {
        return Err(invalid(format!("{host}: no host component")));
    }
    Ok(())
}

/// Build a `ControllerConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    let password = resolve_password(profile, profile_name)?;
    controller_config_with_password(profile, defaults, password)
}

/// Build a `ControllerConfig` from a profile with an already-resolved
/// password (e.g. one given on the command line).
pub fn controller_config_with_password(
    profile: &Profile,
    defaults: &Defaults,
    password: SecretString,
) -> Result<ControllerConfig, ConfigError> {
    validate_host(&profile.host)?;

    let mut config = ControllerConfig::new(profile.host.trim(), password);
    config.tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let refresh_interval = profile.refresh_interval.unwrap_or(defaults.refresh_interval);
    if refresh_interval == 0 {
        return Err(ConfigError::Validation {
            field: "refresh_interval".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    config.refresh_interval = Duration::from_secs(refresh_interval);
    config.stations = IndexFilter::only(profile.stations.iter().copied());
    config.programs = IndexFilter::only(profile.programs.iter().copied());
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn profile() -> Profile {
        Profile {
            host: "10.0.0.5".into(),
            password: Some("plain".into()),
            ..Profile::default()
        }
    }

    fn resolve(
        profile: &Profile,
        env: &[(&str, &str)],
        keyring: Option<&str>,
    ) -> Result<String, ConfigError> {
        resolve_password_with(
            profile,
            "default",
            |name| {
                env.iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| (*v).to_owned())
            },
            |_| keyring.map(str::to_owned),
        )
        .map(|s| s.expose_secret().to_owned())
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "garden"

[defaults]
timeout = 5

[profiles.garden]
host = "10.0.0.5"
password_env = "GARDEN_PW"
stations = [0, 2]
refresh_interval = 30
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();

        assert_eq!(config.default_profile.as_deref(), Some("garden"));
        assert_eq!(config.defaults.timeout, 5);
        assert_eq!(config.defaults.refresh_interval, 60);
        let garden = &config.profiles["garden"];
        assert_eq!(garden.host, "10.0.0.5");
        assert_eq!(garden.stations, vec![0, 2]);
        assert!(garden.programs.is_empty());
        assert_eq!(garden.refresh_interval, Some(30));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert!(config.profiles.is_empty());
        assert_eq!(config.defaults, Defaults::default());
    }

    #[test]
    fn rendered_toml_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.profiles.insert("default".into(), profile());

        std::fs::write(&path, render_toml(&config).unwrap()).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles["default"], profile());
    }

    #[test]
    fn profile_env_var_wins() {
        let mut p = profile();
        p.password_env = Some("GARDEN_PW".into());
        let pw = resolve(
            &p,
            &[("GARDEN_PW", "from-profile-env"), (PASSWORD_ENV, "from-global-env")],
            Some("from-keyring"),
        )
        .unwrap();
        assert_eq!(pw, "from-profile-env");
    }

    #[test]
    fn global_env_beats_keyring() {
        let pw = resolve(&profile(), &[(PASSWORD_ENV, "from-global-env")], Some("from-keyring"))
            .unwrap();
        assert_eq!(pw, "from-global-env");
    }

    #[test]
    fn keyring_beats_plaintext() {
        let pw = resolve(&profile(), &[], Some("from-keyring")).unwrap();
        assert_eq!(pw, "from-keyring");
    }

    #[test]
    fn plaintext_is_last_resort() {
        let mut p = profile();
        p.password_env = Some("UNSET_VAR".into());
        assert_eq!(resolve(&p, &[], None).unwrap(), "plain");
    }

    #[test]
    fn no_password_anywhere_is_an_error() {
        let mut p = profile();
        p.password = None;
        assert!(matches!(
            resolve(&p, &[], None),
            Err(ConfigError::NoCredentials { profile }) if profile == "default"
        ));
    }

    #[test]
    fn profile_overrides_defaults() {
        let mut p = profile();
        p.timeout = Some(3);
        p.stations = vec![1];
        let defaults = Defaults::default();

        let config =
            controller_config_with_password(&p, &defaults, SecretString::from("pw".to_string()))
                .unwrap();

        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
        assert!(!config.stations.permits(0));
        assert!(config.stations.permits(1));
        assert!(config.programs.is_unrestricted());
        assert_eq!(config.password.expose_secret(), "pw");
    }

    #[test]
    fn zero_refresh_interval_is_rejected() {
        let mut p = profile();
        p.refresh_interval = Some(0);

        let err = controller_config_with_password(
            &p,
            &Defaults::default(),
            SecretString::from("pw".to_string()),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Validation { ref field, .. } if field == "refresh_interval"
        ));
    }

    #[test]
    fn plaintext_profile_builds_controller_config() {
        let config =
            profile_to_controller_config(&profile(), "default", &Defaults::default()).unwrap();
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
    }

    #[test]
    fn host_validation() {
        assert!(validate_host("10.0.0.5").is_ok());
        assert!(validate_host("sprinkler.local:8080").is_ok());
        assert!(validate_host("https://sprinkler.example.com/os").is_ok());
        assert!(matches!(
            validate_host("  "),
            Err(ConfigError::Validation { ref field, .. }) if field == "host"
        ));
        assert!(validate_host("http://").is_err());
    }
}
