// Application state for HTTP handlers
use crate::application::config_store::ConfigStore;
use crate::application::session::SessionGate;
use crate::application::status_scheduler::{StatusScheduler, WatchHandle};
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::Mutex;

pub struct AppState {
    pub config_store: ConfigStore,
    pub scheduler: StatusScheduler,
    pub session: SessionGate,
    pub admin_token: String,
    // Watch handles held on behalf of HTTP clients, keyed by the id handed
    // back from the watch endpoint.
    pub watches: Mutex<HashMap<u64, WatchHandle>>,
    pub next_watch_id: AtomicU64,
}

impl AppState {
    pub fn new(
        config_store: ConfigStore,
        scheduler: StatusScheduler,
        session: SessionGate,
        admin_token: String,
    ) -> Self {
        Self {
            config_store,
            scheduler,
            session,
            admin_token,
            watches: Mutex::new(HashMap::new()),
            next_watch_id: AtomicU64::new(1),
        }
    }
}
