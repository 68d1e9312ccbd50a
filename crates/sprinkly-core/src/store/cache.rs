// ── Shared device-state cache ──
//
// Readers load the current snapshot without locking (`arc-swap`).
// Refreshes are single-flight: one async mutex serialises them, the
// interval check runs inside it, and callers that queued behind an
// in-flight refresh reuse its outcome instead of issuing their own.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use sprinkly_api::AllData;

use super::policy::RefreshPolicy;
use super::snapshot::DeviceSnapshot;
use crate::error::CoreError;

/// What a call to [`CacheStore::ensure_fresh`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fetched from the device and swapped in a new snapshot.
    Refreshed,
    /// Within the refresh interval; the cached snapshot was kept.
    Reused,
    /// Another caller refreshed (or tried to) while this one waited.
    Shared,
    /// The fetch failed; the previous snapshot (if any) was kept.
    Failed,
}

#[derive(Debug, Default)]
struct RefreshState {
    /// Start of the last attempt, successful or not. Gates the interval.
    last_attempt: Option<Instant>,
}

/// Time-windowed cache of one device's state.
pub struct CacheStore {
    current: ArcSwapOption<DeviceSnapshot>,
    refresh: Mutex<RefreshState>,
    /// Completed refresh attempts, successful or not. Bumped under `refresh`.
    attempts: AtomicU64,
    policy: RefreshPolicy,
}

impl CacheStore {
    pub fn new(policy: RefreshPolicy) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            refresh: Mutex::new(RefreshState::default()),
            attempts: AtomicU64::new(0),
            policy,
        }
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// The current snapshot, `None` until the first successful refresh.
    pub fn current(&self) -> Option<Arc<DeviceSnapshot>> {
        self.current.load_full()
    }

    /// Number of refresh attempts made so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Acquire)
    }

    /// Refresh through `fetch` if the interval since the last attempt has
    /// elapsed.
    ///
    /// Never fails: a failed fetch is logged and the previous snapshot
    /// stays in place until the next interval.
    pub async fn ensure_fresh<F, Fut>(&self, fetch: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AllData, sprinkly_api::Error>>,
    {
        let seen = self.attempts();
        let mut state = self.refresh.lock().await;

        if self.attempts() != seen {
            debug!("joined in-flight refresh");
            return RefreshOutcome::Shared;
        }

        if !self.policy.is_due(state.last_attempt, Instant::now()) {
            debug!("recycling cached data");
            return RefreshOutcome::Reused;
        }

        match self.run(&mut state, fetch).await {
            Ok(()) => RefreshOutcome::Refreshed,
            Err(_) => RefreshOutcome::Failed,
        }
    }

    /// Refresh through `fetch` regardless of the interval.
    pub async fn refresh<F, Fut>(&self, fetch: F) -> Result<(), CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AllData, sprinkly_api::Error>>,
    {
        let mut state = self.refresh.lock().await;
        self.run(&mut state, fetch).await
    }

    async fn run<F, Fut>(&self, state: &mut RefreshState, fetch: F) -> Result<(), CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AllData, sprinkly_api::Error>>,
    {
        debug!("updating cache");
        state.last_attempt = Some(Instant::now());
        let result = fetch().await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(data) => {
                let snapshot = DeviceSnapshot::new(data, Utc::now());
                self.current.store(Some(Arc::new(snapshot)));
                info!("device state refreshed");
                Ok(())
            }
            Err(e) => {
                let stale = self.current.load().is_some();
                warn!(error = %e, stale, "refresh failed, keeping previous data");
                Err(e.into())
            }
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(RefreshPolicy::default())
    }
}
