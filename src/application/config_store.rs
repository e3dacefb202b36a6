// Configuration store - authoritative in-memory document with
// persist-first update discipline
use crate::application::config_repository::{ConfigError, ConfigRepository};
use crate::domain::catalog::{Config, Dashboard};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// Holds the authoritative copy of the configuration document. Readers
/// always observe a complete document: the copy is swapped atomically as an
/// `Arc`, and only after the persistence collaborator has accepted the new
/// document. A failed persist leaves the in-memory copy untouched.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    repository: Arc<dyn ConfigRepository>,
    current: RwLock<Option<Arc<Config>>>,
    last_error: RwLock<Option<String>>,
    // Serializes update/update_dashboard so a second writer never reads a
    // torn document.
    write_lock: Mutex<()>,
}

impl ConfigStore {
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                repository,
                current: RwLock::new(None),
                last_error: RwLock::new(None),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Fetches the document and replaces the in-memory copy wholesale. On
    /// failure the stale copy (if any) is retained and the error stays
    /// readable via `last_error` until a later load succeeds.
    pub async fn load(&self) -> Result<(), ConfigError> {
        match self.inner.repository.fetch_config().await {
            Ok(config) => {
                if let Err(e) = config.validate() {
                    // The persisted document is authoritative even when it
                    // carries duplicate ids; only mutations are rejected.
                    tracing::warn!("loaded configuration failed validation: {}", e);
                }
                *self.inner.current.write().unwrap() = Some(Arc::new(config));
                *self.inner.last_error.write().unwrap() = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!("failed to load configuration: {:#}", e);
                *self.inner.last_error.write().unwrap() = Some(format!("{e:#}"));
                Err(ConfigError::Load(e))
            }
        }
    }

    /// Whole-document snapshot; None until the first successful load.
    pub fn snapshot(&self) -> Option<Arc<Config>> {
        self.inner.current.read().unwrap().clone()
    }

    /// Message from the most recent failed load, if the last load failed.
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.read().unwrap().clone()
    }

    /// Looks a dashboard up by route path or id; first match in document
    /// order wins.
    pub fn find_dashboard(&self, path_or_id: &str) -> Option<Dashboard> {
        self.snapshot()?.find_dashboard(path_or_id).cloned()
    }

    /// Replaces the dashboard with matching id in place (same index), then
    /// persists the whole document. The in-memory copy only changes once
    /// persistence has succeeded.
    pub async fn update_dashboard(&self, updated: Dashboard) -> Result<(), ConfigError> {
        let _guard = self.inner.write_lock.lock().await;

        let snapshot = self.snapshot().ok_or(ConfigError::NotLoaded)?;
        let mut next = (*snapshot).clone();
        let index = next
            .dashboards
            .iter()
            .position(|d| d.id == updated.id)
            .ok_or_else(|| ConfigError::DashboardNotFound(updated.id.clone()))?;
        next.dashboards[index] = updated;
        next.validate()?;

        self.inner
            .repository
            .persist_config(&next)
            .await
            .map_err(ConfigError::Persist)?;
        *self.inner.current.write().unwrap() = Some(Arc::new(next));
        Ok(())
    }

    /// Full-document replace, same persist-first discipline.
    pub async fn update(&self, new_config: Config) -> Result<(), ConfigError> {
        new_config.validate()?;
        let _guard = self.inner.write_lock.lock().await;

        self.inner
            .repository
            .persist_config(&new_config)
            .await
            .map_err(ConfigError::Persist)?;
        *self.inner.current.write().unwrap() = Some(Arc::new(new_config));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Entry, Group, OpenMode, Settings, SizeClass, Tab, Theme};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct MockRepository {
        remote: StdMutex<Option<Config>>,
        fail_fetch: AtomicBool,
        fail_persist: AtomicBool,
        persist_calls: StdMutex<Vec<Config>>,
    }

    #[async_trait]
    impl ConfigRepository for MockRepository {
        async fn fetch_config(&self) -> anyhow::Result<Config> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                anyhow::bail!("backend offline");
            }
            Ok(self.remote.lock().unwrap().clone().expect("no remote config"))
        }

        async fn persist_config(&self, config: &Config) -> anyhow::Result<()> {
            if self.fail_persist.load(Ordering::SeqCst) {
                anyhow::bail!("persist refused");
            }
            self.persist_calls.lock().unwrap().push(config.clone());
            Ok(())
        }
    }

    fn entry(id: &str) -> Entry {
        Entry {
            id: id.to_string(),
            name: id.to_string(),
            url: format!("https://{id}.example"),
            icon: "mdi:link".to_string(),
            icon_url: None,
            description: None,
            open_mode: OpenMode::NewTab,
            status_check: None,
            theme: None,
            size: SizeClass::Medium,
            order: 0,
        }
    }

    fn dashboard(id: &str, name: &str, path: &str) -> Dashboard {
        Dashboard {
            id: id.to_string(),
            name: name.to_string(),
            path: path.to_string(),
            background: None,
            theme: None,
            tabs: vec![Tab {
                id: "t1".to_string(),
                name: "Main".to_string(),
                background: None,
                theme: None,
                groups: vec![Group {
                    id: "g1".to_string(),
                    name: "Services".to_string(),
                    collapsed: false,
                    theme: None,
                    entries: vec![entry("e1")],
                    order: 0,
                }],
                order: 0,
            }],
            order: 0,
        }
    }

    fn sample_config() -> Config {
        Config {
            dashboards: vec![
                dashboard("d1", "Home", "/home"),
                dashboard("d2", "Media", "/media"),
            ],
            theme: Theme::default(),
            settings: Settings::default(),
        }
    }

    fn loaded_store() -> (ConfigStore, Arc<MockRepository>) {
        let repository = Arc::new(MockRepository::default());
        *repository.remote.lock().unwrap() = Some(sample_config());
        (ConfigStore::new(repository.clone()), repository)
    }

    #[tokio::test]
    async fn test_load_replaces_document() {
        let (store, _repository) = loaded_store();
        assert!(store.snapshot().is_none());

        store.load().await.unwrap();
        assert_eq!(store.snapshot().unwrap().dashboards.len(), 2);
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_failed_load_retains_stale_copy() {
        let (store, repository) = loaded_store();
        store.load().await.unwrap();

        repository.fail_fetch.store(true, Ordering::SeqCst);
        let result = store.load().await;
        assert!(matches!(result, Err(ConfigError::Load(_))));

        // Stale document still served, error flag raised.
        assert_eq!(store.find_dashboard("/home").unwrap().id, "d1");
        assert!(store.last_error().unwrap().contains("backend offline"));

        // A later successful load clears the flag.
        repository.fail_fetch.store(false, Ordering::SeqCst);
        store.load().await.unwrap();
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_find_dashboard_by_path_or_id() {
        let (store, _repository) = loaded_store();
        store.load().await.unwrap();

        assert_eq!(store.find_dashboard("/home").unwrap().id, "d1");
        assert_eq!(store.find_dashboard("home").unwrap().id, "d1");
        assert_eq!(store.find_dashboard("d2").unwrap().id, "d2");
        assert!(store.find_dashboard("/nope").is_none());
    }

    #[tokio::test]
    async fn test_update_dashboard_replaces_in_place() {
        let (store, repository) = loaded_store();
        store.load().await.unwrap();

        let mut updated = store.find_dashboard("d2").unwrap();
        updated.name = "Media Center".to_string();
        store.update_dashboard(updated).await.unwrap();

        let snapshot = store.snapshot().unwrap();
        // Same index, new content.
        assert_eq!(snapshot.dashboards[1].id, "d2");
        assert_eq!(snapshot.dashboards[1].name, "Media Center");
        assert_eq!(repository.persist_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_dashboard_unknown_id() {
        let (store, repository) = loaded_store();
        store.load().await.unwrap();

        let ghost = dashboard("ghost", "Ghost", "/ghost");
        let result = store.update_dashboard(ghost).await;
        assert!(matches!(result, Err(ConfigError::DashboardNotFound(id)) if id == "ghost"));
        assert!(repository.persist_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persist_failure_leaves_document_unchanged() {
        let (store, repository) = loaded_store();
        store.load().await.unwrap();
        repository.fail_persist.store(true, Ordering::SeqCst);

        let mut updated = store.find_dashboard("d1").unwrap();
        updated.name = "Renamed".to_string();
        let result = store.update_dashboard(updated).await;

        assert!(matches!(result, Err(ConfigError::Persist(_))));
        assert_eq!(store.find_dashboard("d1").unwrap().name, "Home");
    }

    #[tokio::test]
    async fn test_duplicate_id_mutation_rejected() {
        let (store, repository) = loaded_store();
        store.load().await.unwrap();

        let mut updated = store.find_dashboard("d1").unwrap();
        let clone = updated.tabs[0].clone();
        updated.tabs.push(clone);
        let result = store.update_dashboard(updated).await;

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        // Rejected before the persistence call, nothing committed.
        assert!(repository.persist_calls.lock().unwrap().is_empty());
        assert_eq!(store.find_dashboard("d1").unwrap().tabs.len(), 1);
    }

    #[tokio::test]
    async fn test_full_update_replaces_document() {
        let (store, _repository) = loaded_store();
        store.load().await.unwrap();

        let mut next = (*store.snapshot().unwrap()).clone();
        next.dashboards.remove(1);
        store.update(next).await.unwrap();

        assert_eq!(store.snapshot().unwrap().dashboards.len(), 1);
        assert!(store.find_dashboard("/media").is_none());
    }

    #[tokio::test]
    async fn test_update_dashboard_before_load() {
        let repository = Arc::new(MockRepository::default());
        let store = ConfigStore::new(repository);

        let result = store.update_dashboard(dashboard("d1", "Home", "/home")).await;
        assert!(matches!(result, Err(ConfigError::NotLoaded)));
    }
}
