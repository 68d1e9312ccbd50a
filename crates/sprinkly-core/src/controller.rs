// ── Controller abstraction ──
//
// Facade over one device: read accessors served from the shared cache,
// enumerations and commands sent straight to the device. Every operation
// runs inside the controller's own tracing span.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{Instrument, Span, info, info_span};

use sprinkly_api::DeviceClient;

use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::model::{LastRun, Program, Station};
use crate::store::{CacheStore, DeviceSnapshot, RefreshOutcome, RefreshPolicy, Section};

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`; clones share one cache,
/// so any number of callers polling the same device cause at most one
/// device request per refresh interval.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

pub(crate) struct ControllerInner {
    config: ControllerConfig,
    api: Arc<DeviceClient>,
    cache: CacheStore,
    span: Span,
}

impl ControllerInner {
    async fn ensure_fresh(&self) -> RefreshOutcome {
        let api = &self.api;
        self.cache
            .ensure_fresh(|| api.get_all())
            .instrument(self.span.clone())
            .await
    }

    /// Bring the cache up to date, then project from the current snapshot.
    ///
    /// `section`/`field` name what `project` reads, for the error when no
    /// refresh has ever succeeded.
    pub(crate) async fn read<T>(
        &self,
        section: Section,
        field: &str,
        project: impl FnOnce(&DeviceSnapshot) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        self.ensure_fresh().await;
        let snapshot = self
            .cache
            .current()
            .ok_or_else(|| CoreError::missing(section, field))?;
        project(&snapshot)
    }

    async fn field<T: serde::de::DeserializeOwned>(
        &self,
        section: Section,
        field: &str,
    ) -> Result<T, CoreError> {
        self.read(section, field, |snap| snap.field(section, field))
            .await
    }

    async fn flag(&self, section: Section, field: &str) -> Result<bool, CoreError> {
        self.read(section, field, |snap| snap.flag(section, field))
            .await
    }
}

impl Controller {
    /// Create a controller without touching the network.
    ///
    /// The first read triggers the first refresh. Fails only when the host
    /// or TLS settings are unusable.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let span = info_span!("device", host = %config.host);
        Self::with_span(config, span)
    }

    /// Like [`new`](Self::new), with a caller-provided span wrapping every
    /// operation (e.g. one carrying the host application's entity id).
    pub fn with_span(config: ControllerConfig, span: Span) -> Result<Self, CoreError> {
        let api = DeviceClient::new(&config.host, config.password.clone(), &config.transport())?;
        let cache = CacheStore::new(RefreshPolicy::new(config.refresh_interval));
        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                api: Arc::new(api),
                cache,
                span,
            }),
        })
    }

    /// Create a controller and load the initial snapshot.
    ///
    /// Unlike later reads, a failed first refresh is an error: there is no
    /// previous data to fall back on.
    pub async fn connect(config: ControllerConfig) -> Result<Self, CoreError> {
        let controller = Self::new(config)?;
        controller.refresh().await?;
        Ok(controller)
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Device identity used in logs and errors (`host[:port]`).
    pub fn host(&self) -> &str {
        self.inner.api.host()
    }

    // ── Cache ────────────────────────────────────────────────────

    /// Refresh the cache if the refresh interval has elapsed.
    ///
    /// Never fails; a failed refresh keeps the previous snapshot.
    pub async fn ensure_fresh(&self) -> RefreshOutcome {
        self.inner.ensure_fresh().await
    }

    /// Refresh the cache now, ignoring the interval.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let api = &self.inner.api;
        self.inner
            .cache
            .refresh(|| api.get_all())
            .instrument(self.inner.span.clone())
            .await
    }

    /// When the cached data was fetched, if ever.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.cache.current().map(|snap| snap.fetched_at())
    }

    /// How old the cached data is, if any exists. Measured on the same
    /// monotonic clock as the refresh interval.
    pub fn data_age(&self) -> Option<Duration> {
        self.inner.cache.current().map(|snap| snap.age())
    }

    /// Bring the cache up to date and return the whole snapshot, for
    /// callers that need several fields from the same refresh.
    pub async fn snapshot(&self) -> Option<Arc<DeviceSnapshot>> {
        self.inner.ensure_fresh().await;
        self.inner.cache.current()
    }

    // ── Read accessors ───────────────────────────────────────────

    /// Water level percentage applied to run times (`options.wl`).
    pub async fn water_level(&self) -> Result<u32, CoreError> {
        self.inner.field(Section::Options, "wl").await
    }

    pub async fn last_run(&self) -> Result<LastRun, CoreError> {
        self.inner.field(Section::Settings, "lrun").await
    }

    /// Whether the controller is enabled (`settings.en`).
    pub async fn enable_operation(&self) -> Result<bool, CoreError> {
        self.inner.flag(Section::Settings, "en").await
    }

    /// Whether a rain delay is active (`settings.rd`).
    pub async fn rain_delay(&self) -> Result<bool, CoreError> {
        self.inner.flag(Section::Settings, "rd").await
    }

    /// When the active rain delay ends; `None` if no delay is set.
    pub async fn rain_delay_stop_time(&self) -> Result<Option<DateTime<Utc>>, CoreError> {
        self.inner
            .read(Section::Settings, "rdst", |snap| {
                snap.time(Section::Settings, "rdst")
            })
            .await
    }

    /// Whether the rain sensor reports rain (`settings.rs`).
    pub async fn rain_sensor(&self) -> Result<bool, CoreError> {
        self.inner.flag(Section::Settings, "rs").await
    }

    // ── Enumeration ──────────────────────────────────────────────

    /// List the device's stations. Always queries the device.
    pub async fn stations(&self) -> Result<Vec<Station>, CoreError> {
        async {
            let names = self.inner.api.get_station_names().await?;
            let stations: Vec<Station> = names
                .snames
                .into_iter()
                .enumerate()
                .map(|(index, name)| {
                    Station::new(
                        name,
                        index,
                        Arc::clone(&self.inner.api),
                        Arc::downgrade(&self.inner),
                        self.inner.span.clone(),
                    )
                })
                .collect();
            info!(count = stations.len(), "enumerated stations");
            Ok(stations)
        }
        .instrument(self.inner.span.clone())
        .await
    }

    /// List the device's programs. Always queries the device.
    pub async fn programs(&self) -> Result<Vec<Program>, CoreError> {
        async {
            let data = self.inner.api.get_programs().await?;
            let programs = data
                .pd
                .iter()
                .enumerate()
                .map(|(index, raw)| {
                    let name = raw.name().ok_or_else(|| CoreError::Decode {
                        message: format!("program {index} has no name"),
                    })?;
                    Ok(Program::new(
                        name.to_owned(),
                        index,
                        Arc::clone(&self.inner.api),
                        self.inner.span.clone(),
                    ))
                })
                .collect::<Result<Vec<_>, CoreError>>()?;
            info!(count = programs.len(), "enumerated programs");
            Ok(programs)
        }
        .instrument(self.inner.span.clone())
        .await
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("host", &self.host())
            .field("refresh_interval", &self.inner.cache.policy().min_interval())
            .finish_non_exhaustive()
    }
}
