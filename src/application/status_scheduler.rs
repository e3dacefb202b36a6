// Status scheduler - one shared timer polling every watched entry
use crate::application::status_probe::StatusProbe;
use crate::domain::status::StatusTuple;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(30_000);

/// Proof of interest in one entry's status. Consumed by
/// `StatusScheduler::release`; there is no implicit teardown.
#[derive(Debug)]
pub struct WatchHandle {
    entry_id: String,
}

impl WatchHandle {
    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }
}

/// Runs exactly one shared timer regardless of how many entries are being
/// watched. Subscribing the first watcher starts the timer, releasing the
/// last one stops it; each tick re-probes every watched entry and writes
/// the results into the in-memory status cache.
///
/// Instances are independent: construct one per deployment (or per test)
/// and call `shutdown` when done.
#[derive(Clone)]
pub struct StatusScheduler {
    shared: Arc<Shared>,
}

struct Shared {
    probe: Arc<dyn StatusProbe>,
    poll_interval: Duration,
    // The cache and the watcher table are the only shared mutable state.
    cache: Mutex<HashMap<String, StatusTuple>>,
    watchers: Mutex<HashMap<String, usize>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    sweep_running: AtomicBool,
}

impl StatusScheduler {
    pub fn new(probe: Arc<dyn StatusProbe>, poll_interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                probe,
                poll_interval,
                cache: Mutex::new(HashMap::new()),
                watchers: Mutex::new(HashMap::new()),
                timer: Mutex::new(None),
                sweep_running: AtomicBool::new(false),
            }),
        }
    }

    /// Registers interest in an entry. The first watcher for an id gets a
    /// `loading` tuple published immediately and an out-of-band probe, so
    /// reads never hit an absent gap; the first watcher system-wide starts
    /// the shared timer.
    pub fn subscribe(&self, entry_id: &str) -> WatchHandle {
        let (first_for_entry, first_overall) = {
            let mut watchers = self.shared.watchers.lock().unwrap();
            let first_overall = watchers.is_empty();
            let count = watchers.entry(entry_id.to_string()).or_insert(0);
            let first_for_entry = *count == 0;
            *count += 1;
            (first_for_entry, first_overall)
        };

        if first_for_entry {
            self.shared
                .cache
                .lock()
                .unwrap()
                .insert(entry_id.to_string(), StatusTuple::loading(entry_id));

            let shared = self.shared.clone();
            let id = entry_id.to_string();
            tokio::spawn(async move {
                shared.probe_into_cache(&id).await;
            });
        }

        if first_overall {
            self.start_timer();
        }

        WatchHandle {
            entry_id: entry_id.to_string(),
        }
    }

    /// Drops one watcher. At zero the entry leaves the watched set; its
    /// cached tuple is left in place, stale, until re-subscribed. When the
    /// watched set empties the shared timer stops - no idle polling. An
    /// in-flight probe for the entry is not cancelled; its final write
    /// simply goes unread.
    pub fn release(&self, handle: WatchHandle) {
        let mut watchers = self.shared.watchers.lock().unwrap();
        if let Some(count) = watchers.get_mut(&handle.entry_id) {
            *count -= 1;
            if *count == 0 {
                watchers.remove(&handle.entry_id);
            }
        }

        // Stopped while the watcher table is still locked; subscribe takes
        // the same lock before it would start a timer.
        if watchers.is_empty() {
            self.stop_timer();
        }
    }

    /// Synchronous cache read; never triggers a probe.
    pub fn read(&self, entry_id: &str) -> Option<StatusTuple> {
        self.shared.cache.lock().unwrap().get(entry_id).cloned()
    }

    /// Stops the shared timer. The cache is retained.
    pub fn shutdown(&self) {
        self.stop_timer();
    }

    fn start_timer(&self) {
        let mut timer = self.shared.timer.lock().unwrap();
        if timer.is_some() {
            return;
        }

        tracing::info!(
            "status polling started (period {:?})",
            self.shared.poll_interval
        );
        let shared = Arc::downgrade(&self.shared);
        *timer = Some(tokio::spawn(run_timer(shared, self.shared.poll_interval)));
    }

    fn stop_timer(&self) {
        if let Some(timer) = self.shared.timer.lock().unwrap().take() {
            timer.abort();
            tracing::info!("status polling stopped");
        }
    }
}

async fn run_timer(shared: Weak<Shared>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; initial probes were already
    // issued on subscribe.
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some(shared) = shared.upgrade() else {
            return;
        };
        shared.sweep();
    }
}

impl Shared {
    /// One timer-driven sweep over the watched set. If the previous sweep
    /// is still in flight the new one is skipped, not queued, bounding
    /// outstanding probe work to one full sweep at a time.
    fn sweep(self: Arc<Self>) {
        if self.sweep_running.swap(true, Ordering::SeqCst) {
            tracing::debug!("previous status sweep still in flight, skipping tick");
            return;
        }

        let entry_ids: Vec<String> = self.watchers.lock().unwrap().keys().cloned().collect();
        if entry_ids.is_empty() {
            self.sweep_running.store(false, Ordering::SeqCst);
            return;
        }

        tracing::debug!("sweeping {} watched entries", entry_ids.len());

        // One task per entry so a slow target cannot delay the others; each
        // task writes its own cache slot as soon as its probe completes.
        let probes: Vec<_> = entry_ids
            .into_iter()
            .map(|entry_id| {
                let shared = self.clone();
                tokio::spawn(async move {
                    shared.probe_into_cache(&entry_id).await;
                })
            })
            .collect();

        tokio::spawn(async move {
            futures::future::join_all(probes).await;
            self.sweep_running.store(false, Ordering::SeqCst);
        });
    }

    /// Probes one entry and records the result. Failures are per-entry and
    /// resolve to `unknown`; they never cross the scheduler boundary.
    async fn probe_into_cache(&self, entry_id: &str) {
        let tuple = match self.probe.check_entry(entry_id).await {
            Ok(reading) => StatusTuple::from_reading(entry_id, reading),
            Err(e) => {
                tracing::debug!("status probe failed for {}: {:#}", entry_id, e);
                StatusTuple::unknown(entry_id)
            }
        };

        // Last write wins; lastChecked is the staleness tie-breaker.
        self.cache
            .lock()
            .unwrap()
            .insert(entry_id.to_string(), tuple);
    }
}
