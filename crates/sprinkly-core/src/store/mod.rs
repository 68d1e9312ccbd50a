// ── Device-state cache ──
//
// Lock-free snapshot reads with single-flight, interval-bounded refresh.

mod cache;
mod policy;
mod snapshot;

pub use cache::{CacheStore, RefreshOutcome};
pub use policy::RefreshPolicy;
pub use snapshot::{DeviceSnapshot, Section};
