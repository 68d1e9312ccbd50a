use thiserror::Error;

/// Top-level error type for the `sprinkly-api` crate.
///
/// Covers every failure mode of a single round trip to the device:
/// reaching it, waiting for it, and making sense of what it sent back.
/// `sprinkly-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Device unreachable (connection refused, no route, DNS failure).
    #[error("No route to device '{host}'")]
    Connectivity {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out.
    #[error("Request to '{host}' timed out after {timeout_secs}s")]
    Timeout { host: String, timeout_secs: u64 },

    /// The device answered with a non-success HTTP status.
    #[error("HTTP {status} from {path}")]
    Http { status: u16, path: String },

    /// Host could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the device could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. } | Self::Timeout { .. })
    }

    /// Returns `true` if the response body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }
}
