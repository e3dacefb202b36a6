// HTTP client for the configuration persistence backend
use crate::application::config_repository::ConfigRepository;
use crate::domain::catalog::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpConfigRepository {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpConfigRepository {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }
}

#[async_trait]
impl ConfigRepository for HttpConfigRepository {
    async fn fetch_config(&self) -> Result<Config> {
        let url = format!("{}/config", self.base_url);

        let response = self
            .authorize(self.client.get(&url))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to reach configuration backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("configuration fetch failed with status {}: {}", status, body);
        }

        response
            .json::<Config>()
            .await
            .context("Failed to parse configuration document")
    }

    async fn persist_config(&self, config: &Config) -> Result<()> {
        let url = format!("{}/config/update", self.base_url);

        let response = self
            .authorize(self.client.put(&url))
            .json(config)
            .send()
            .await
            .context("Failed to reach configuration backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "configuration persist failed with status {}: {}",
                status,
                body
            );
        }

        Ok(())
    }
}
