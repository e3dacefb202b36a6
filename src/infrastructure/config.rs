use crate::application::status_scheduler::DEFAULT_POLL_INTERVAL;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct HubConfig {
    pub server: ServerSettings,
    pub status: StatusSettings,
    pub persistence: PersistenceSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatusSettings {
    /// Base URL of the external status-checking service.
    pub checker_url: String,
    /// Shared polling cadence for all watched entries.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PersistenceSettings {
    /// Base URL of the configuration persistence backend.
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    /// Token compared on login to flip the session gate.
    pub admin_token: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

pub fn load_hub_config() -> anyhow::Result<HubConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/hub"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let raw = r#"
            [server]

            [status]
            checker_url = "http://checker.local/api"

            [persistence]
            base_url = "http://backend.local/api"

            [auth]
            admin_token = "secret"
        "#;
        let settings = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap();
        let hub: HubConfig = settings.try_deserialize().unwrap();

        assert_eq!(hub.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(hub.status.poll_interval_ms, 30_000);
        assert!(hub.persistence.token.is_none());
    }
}
