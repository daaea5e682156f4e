//! Sliding-window rate limiting keyed by caller identity

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

/// Outcome of a rate-limit check for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { retry_after_seconds: u64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

/// Per-identity request counters. The in-memory map is the single-process
/// reference implementation; a deployment can substitute a networked counter
/// service behind this trait without touching the gateway.
pub trait RateLimitStore: Send + Sync {
    /// Checks and consumes one request slot for the identity. This is the
    /// sole mutating entry point besides [`sweep`](Self::sweep).
    fn check(&self, identity: &str) -> RateLimitDecision;

    /// Removes all expired entries, returning how many were dropped. Runs
    /// from a housekeeping task, never from the request path.
    fn sweep(&self) -> usize;
}

struct RateLimitEntry {
    count: u32,
    window_reset_at: Instant,
}

/// In-memory store: a mutex-guarded map from identity to window counter.
/// The lock makes check-then-increment atomic, so the window limit holds
/// strictly even under concurrent bursts from one identity.
#[derive(Clone)]
pub struct InMemoryRateLimitStore {
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
    max_requests: u32,
    window: Duration,
}

impl InMemoryRateLimitStore {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    #[cfg(test)]
    fn entry_count(&self) -> usize {
        self.entries.lock().len()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn check(&self, identity: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get_mut(identity) {
            // An entry past its reset is treated as absent.
            Some(entry) if now < entry.window_reset_at => {
                if entry.count >= self.max_requests {
                    let retry_after = entry.window_reset_at.duration_since(now);
                    return RateLimitDecision::Limited {
                        retry_after_seconds: retry_after.as_secs(),
                    };
                }
                entry.count += 1;
                RateLimitDecision::Allowed
            }
            _ => {
                entries.insert(
                    identity.to_string(),
                    RateLimitEntry {
                        count: 1,
                        window_reset_at: now + self.window,
                    },
                );
                RateLimitDecision::Allowed
            }
        }
    }

    fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| now < entry.window_reset_at);
        before - entries.len()
    }
}

/// Spawns the periodic compaction task. The handle is aborted on shutdown;
/// requests never await this task.
pub fn start_sweep_task(store: Arc<dyn RateLimitStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick fires immediately; skip it so a fresh process does
        // not sweep an empty map.
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = store.sweep();
            if removed > 0 {
                debug!("rate limit sweep removed {} expired entries", removed);
            }
        }
    })
}
