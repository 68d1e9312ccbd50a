//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sprinkly_config::ConfigError;
use sprinkly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach device at {host}")]
    #[diagnostic(
        code(sprinkly::connection_failed),
        help(
            "Check that the controller is powered and on the network.\n\
             Host: {host}\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { host: String, reason: String },

    #[error("Device at {host} did not answer within {seconds}s")]
    #[diagnostic(
        code(sprinkly::timeout),
        help("Increase timeout with --timeout or check the device's network link.")
    )]
    Timeout { host: String, seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(sprinkly::no_credentials),
        help(
            "Store one with: sprinkly config set-password {profile}\n\
             Or pass --password / set SPRINKLY_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Device data ──────────────────────────────────────────────────
    #[error("Unexpected response from device: {message}")]
    #[diagnostic(
        code(sprinkly::device_data),
        help(
            "A device that rejects the password answers with result code 2\n\
             instead of data. Verify the password, then retry with -vv."
        )
    )]
    DeviceData { message: String },

    #[error("{resource_type} {identifier} not found")]
    #[diagnostic(
        code(sprinkly::not_found),
        help("Run: sprinkly {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("API error: {message}")]
    #[diagnostic(code(sprinkly::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sprinkly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sprinkly::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(sprinkly::no_config),
        help(
            "Pass --host and --password, or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(sprinkly::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Connectivity { host, reason } => CliError::ConnectionFailed { host, reason },

            CoreError::Timeout { host, timeout_secs } => CliError::Timeout {
                host,
                seconds: timeout_secs,
            },

            CoreError::ControllerDisconnected => CliError::ApiError {
                message: "controller was dropped while in use".into(),
            },

            CoreError::Decode { message } => CliError::DeviceData { message },

            CoreError::MissingField { section, field } => CliError::DeviceData {
                message: format!("field '{field}' missing from {section} data"),
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api { message, status: _ } => CliError::ApiError { message },

            CoreError::Config { message } => CliError::Validation {
                field: "host".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
