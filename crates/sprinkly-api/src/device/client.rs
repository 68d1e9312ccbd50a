// Device API HTTP client
//
// Wraps `reqwest::Client` with device-specific URL construction, shared
// secret injection, and failure classification. Endpoint methods live in
// sibling files (`state.rs`, `commands.rs`) as inherent methods so this
// module stays focused on transport mechanics.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::device::models::{CommandResponse, ResultCode};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Query parameter carrying the shared secret on every request.
const PASSWORD_PARAM: &str = "pw";

/// Raw HTTP client for one device.
///
/// Every request is a GET against a fixed path with the shared secret as
/// the `pw` query parameter. The secret never reaches the logs: only the
/// request path is traced, and transport errors are stripped of their URL
/// before they are returned.
#[derive(Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
    host: String,
    password: SecretString,
    timeout: Duration,
}

impl std::fmt::Debug for DeviceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl DeviceClient {
    /// Create a new client from a host and a `TransportConfig`.
    ///
    /// `host` may be a bare address (`10.0.0.5`, `sprinkler.local:8080`),
    /// in which case plain HTTP is assumed, or a full base URL.
    pub fn new(
        host: &str,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = base_url_for_host(host)?;
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, password, transport.timeout))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// `timeout` is only used when reporting a timed-out request; the
    /// enforced timeout is whatever `http` was built with.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        password: SecretString,
        timeout: Duration,
    ) -> Self {
        let host = base_url.host_str().map_or_else(
            || base_url.as_str().to_owned(),
            |h| match base_url.port() {
                Some(port) => format!("{h}:{port}"),
                None => h.to_owned(),
            },
        );
        Self {
            http,
            base_url,
            host,
            password,
            timeout,
        }
    }

    /// The device identity used in log lines and errors (`host[:port]`).
    pub fn host(&self) -> &str {
        &self.host
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}{path}?pw=…&{params}`.
    pub(crate) fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{path}"));
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.append_pair(PASSWORD_PARAM, self.password.expose_secret());
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        url
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Issue a GET and decode the body as JSON.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let body = self.send(path, params).await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Issue a fire-and-forget command.
    ///
    /// Succeeds as soon as the device answered. The `{"result": n}` code is
    /// only inspected to warn about rejected commands.
    pub(crate) async fn command(&self, path: &str, params: &[(&str, String)]) -> Result<(), Error> {
        let body = self.send(path, params).await?;
        match serde_json::from_str::<CommandResponse>(&body) {
            Ok(resp) => match ResultCode::from(resp.result) {
                ResultCode::Success => debug!(path, "command accepted"),
                code => warn!(host = %self.host, path, %code, "device rejected command"),
            },
            Err(_) => debug!(path, "command response carried no result code"),
        }
        Ok(())
    }

    async fn send(&self, path: &str, params: &[(&str, String)]) -> Result<String, Error> {
        let url = self.endpoint_url(path, params);
        debug!(host = %self.host, path, "GET");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(host = %self.host, path, status = status.as_u16(), "unexpected HTTP status");
            return Err(Error::Http {
                status: status.as_u16(),
                path: path.to_owned(),
            });
        }

        resp.text().await.map_err(|e| self.classify(e))
    }

    /// Turn a reqwest failure into the transport taxonomy, logging it with
    /// the device identity. The URL (and with it the secret) is dropped.
    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            warn!(host = %self.host, timeout_secs = self.timeout.as_secs(), "device did not answer in time");
            Error::Timeout {
                host: self.host.clone(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            let err = err.without_url();
            warn!(host = %self.host, error = %err, "no route to device");
            Error::Connectivity {
                host: self.host.clone(),
                source: err,
            }
        }
    }
}

/// Turn a configured host into a base URL, assuming `http://` when no
/// scheme is given.
pub fn base_url_for_host(host: &str) -> Result<Url, Error> {
    let trimmed = host.trim().trim_end_matches('/');
    let url = if trimmed.contains("://") {
        Url::parse(trimmed)?
    } else {
        Url::parse(&format!("http://{trimmed}"))?
    };
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(Error::InvalidUrl(url::ParseError::EmptyHost));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(host: &str) -> DeviceClient {
        DeviceClient::new(
            host,
            SecretString::from("abc".to_string()),
            &TransportConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn bare_host_gets_http_scheme() {
        let url = base_url_for_host("10.0.0.5").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.5/");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let url = base_url_for_host("https://proxy.example/garden/").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.path(), "/garden");
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(matches!(
            base_url_for_host("   "),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn endpoint_url_puts_secret_first() {
        let c = client("10.0.0.5");
        let url = c.endpoint_url("/cm", &[("sid", "1".into()), ("en", "0".into())]);
        assert_eq!(url.as_str(), "http://10.0.0.5/cm?pw=abc&sid=1&en=0");
    }

    #[test]
    fn endpoint_url_respects_path_prefix() {
        let c = client("https://proxy.example/garden");
        let url = c.endpoint_url("/ja", &[]);
        assert_eq!(url.as_str(), "https://proxy.example/garden/ja?pw=abc");
    }

    #[test]
    fn host_identity_includes_port() {
        assert_eq!(client("10.0.0.5:8080").host(), "10.0.0.5:8080");
        assert_eq!(client("10.0.0.5").host(), "10.0.0.5");
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", client("10.0.0.5"));
        assert!(!rendered.contains("abc"));
    }
}
