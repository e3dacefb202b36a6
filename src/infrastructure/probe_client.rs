// HTTP probe transport against the external status-checking service
use crate::application::status_probe::StatusProbe;
use crate::domain::status::ProbeReading;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpProbeClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProbeClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .context("Failed to build status check client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_check_url(&self, entry_id: &str) -> String {
        // Entry ids are opaque caller-supplied strings.
        format!(
            "{}/status/{}",
            self.base_url,
            urlencoding::encode(entry_id)
        )
    }
}

#[async_trait]
impl StatusProbe for HttpProbeClient {
    async fn check_entry(&self, entry_id: &str) -> Result<ProbeReading> {
        let url = self.build_check_url(entry_id);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to reach status checking service")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("status check failed with status {}", status);
        }

        response
            .json::<ProbeReading>()
            .await
            .context("Failed to parse status check response")
    }
}
