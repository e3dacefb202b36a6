// Persistence seam for the configuration document
use crate::domain::catalog::{Config, ValidationError};
use async_trait::async_trait;
use thiserror::Error;

/// External persistence collaborator. Both operations may fail; failures
/// are wrapped into `ConfigError` at the store boundary.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn fetch_config(&self) -> anyhow::Result<Config>;

    async fn persist_config(&self, config: &Config) -> anyhow::Result<()>;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] anyhow::Error),
    #[error("failed to persist configuration")]
    Persist(#[source] anyhow::Error),
    #[error("no configuration loaded")]
    NotLoaded,
    #[error("dashboard {0:?} not found")]
    DashboardNotFound(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
