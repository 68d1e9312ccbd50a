// ── Runtime connection configuration ──
//
// These types describe *how* to talk to one device.
// They carry credential data and refresh tuning, but never touch disk.
// The CLI (or any other host application) builds a `ControllerConfig`
// and hands it in; it is immutable for the controller's lifetime.

use std::collections::BTreeSet;
use std::time::Duration;

use secrecy::SecretString;

use sprinkly_api::{TlsMode, TransportConfig};

/// Minimum time between two network refreshes of the shared cache.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed reverse proxies).
    DangerAcceptInvalid,
}

/// Allow-list of station or program indices a caller wants to expose.
///
/// Empty means "everything". Enumeration never applies it; callers filter
/// the enumerated handles with [`permits`](Self::permits).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexFilter(BTreeSet<usize>);

impl IndexFilter {
    /// A filter that lets every index through.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter restricted to the given indices.
    pub fn only(indices: impl IntoIterator<Item = usize>) -> Self {
        Self(indices.into_iter().collect())
    }

    pub fn permits(&self, index: usize) -> bool {
        self.0.is_empty() || self.0.contains(&index)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for IndexFilter {
    fn from(indices: Vec<usize>) -> Self {
        Self::only(indices)
    }
}

/// Configuration for one device.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Device address (`10.0.0.5`, `sprinkler.local:8080`) or base URL.
    pub host: String,
    /// Shared secret sent as the `pw` query parameter.
    pub password: SecretString,
    /// TLS verification strategy (only relevant for `https://` hosts).
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Minimum time between cache refreshes.
    pub refresh_interval: Duration,
    /// Stations the caller wants to expose.
    pub stations: IndexFilter,
    /// Programs the caller wants to expose.
    pub programs: IndexFilter,
}

impl ControllerConfig {
    /// Config with default timeout (10s) and refresh interval (60s).
    pub fn new(host: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            password,
            tls: TlsVerification::default(),
            timeout: sprinkly_api::DEFAULT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            stations: IndexFilter::all(),
            programs: IndexFilter::all(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
