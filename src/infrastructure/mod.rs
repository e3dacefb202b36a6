// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod config_client;
pub mod probe_client;
