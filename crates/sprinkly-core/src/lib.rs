//! Shared, time-windowed view of one irrigation controller.
//!
//! This crate sits between `sprinkly-api` and its callers (the CLI, or a
//! host application polling many sensors against the same device):
//!
//! - **[`Controller`]**: cheaply cloneable facade. Read accessors
//!   ([`water_level()`](Controller::water_level),
//!   [`rain_delay()`](Controller::rain_delay), ...) are served from a shared
//!   cache; enumerations ([`stations()`](Controller::stations),
//!   [`programs()`](Controller::programs)) always query the device.
//!
//! - **[`CacheStore`]**: one immutable [`DeviceSnapshot`] behind `arc-swap`,
//!   refreshed at most once per [`RefreshPolicy`] interval. Concurrent callers
//!   that arrive during a refresh share it instead of issuing their own; a
//!   failed refresh keeps the previous snapshot.
//!
//! - **Handles** ([`Station`], [`Program`]): per-entity views bound to a
//!   device index. Station reads go through the cache; commands go straight
//!   to the device and are never deduplicated.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    ControllerConfig, DEFAULT_REFRESH_INTERVAL, IndexFilter, TlsVerification,
};
pub use controller::Controller;
pub use error::CoreError;
pub use model::{LastRun, MAX_RUN_MINUTES, Program, ProgramStatus, Station};
pub use store::{CacheStore, DeviceSnapshot, RefreshOutcome, RefreshPolicy, Section};
