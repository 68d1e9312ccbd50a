// ── Core error types ──
//
// User-facing errors from sprinkly-core. Consumers never see reqwest
// errors or raw JSON parse failures directly. The `From<sprinkly_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

use crate::store::Section;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach device at {host}: {reason}")]
    Connectivity { host: String, reason: String },

    #[error("Device at {host} did not answer within {timeout_secs}s")]
    Timeout { host: String, timeout_secs: u64 },

    #[error("Controller has been dropped")]
    ControllerDisconnected,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed device response: {message}")]
    Decode { message: String },

    /// The field was never delivered by a successful refresh.
    #[error("Field '{field}' missing from {section} data")]
    MissingField { section: Section, field: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` when the device could not be reached.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. } | Self::Timeout { .. })
    }

    pub(crate) fn missing(section: Section, field: impl Into<String>) -> Self {
        Self::MissingField {
            section,
            field: field.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sprinkly_api::Error> for CoreError {
    fn from(err: sprinkly_api::Error) -> Self {
        match err {
            sprinkly_api::Error::Connectivity { host, source } => CoreError::Connectivity {
                host,
                reason: source.to_string(),
            },
            sprinkly_api::Error::Timeout { host, timeout_secs } => {
                CoreError::Timeout { host, timeout_secs }
            }
            sprinkly_api::Error::Http { status, path } => CoreError::Api {
                message: format!("HTTP {status} from {path}"),
                status: Some(status),
            },
            sprinkly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid host: {e}"),
            },
            sprinkly_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            sprinkly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_count_as_connectivity() {
        let err = CoreError::from(sprinkly_api::Error::Timeout {
            host: "10.0.0.5".into(),
            timeout_secs: 10,
        });
        assert!(err.is_connectivity());
        assert_eq!(err.to_string(), "Device at 10.0.0.5 did not answer within 10s");
    }

    #[test]
    fn deserialization_becomes_decode() {
        let err = CoreError::from(sprinkly_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert!(matches!(err, CoreError::Decode { ref message } if message == "expected value"));
        assert!(!err.is_connectivity());
    }

    #[test]
    fn missing_field_names_section() {
        let err = CoreError::missing(Section::Options, "wl");
        assert_eq!(err.to_string(), "Field 'wl' missing from options data");
    }
}
