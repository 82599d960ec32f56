use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // HTTP server config
    pub http_host: String,
    pub http_port: u16,

    // Online history
    pub history_capacity: usize,

    // Per-call bound for history / similarity collaborators
    pub dependency_timeout_ms: u64,

    // Largest `k` accepted from callers
    pub max_k: usize,

    // Remote collaborators; in-process stores are used when unset
    pub events_service_url: Option<String>,
    pub features_service_url: Option<String>,

    // Snapshots (JSON lines)
    pub personal_snapshot_path: String,
    pub default_snapshot_path: String,
    pub similar_snapshot_path: String,

    // Observability
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8000)?
            .set_default("history_capacity", 10)?
            .set_default("dependency_timeout_ms", 500)?
            .set_default("max_k", 1000)?
            .set_default("personal_snapshot_path", "recommendations.jsonl")?
            .set_default("default_snapshot_path", "top_popular.jsonl")?
            .set_default("similar_snapshot_path", "similar.jsonl")?
            .set_default("log_level", "info")?
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn dependency_timeout(&self) -> Duration {
        Duration::from_millis(self.dependency_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP port must be greater than 0"));
        }

        if self.history_capacity == 0 {
            return Err(anyhow!("History capacity must be greater than 0"));
        }

        if self.dependency_timeout_ms == 0 {
            return Err(anyhow!("Dependency timeout must be greater than 0"));
        }

        if self.max_k == 0 {
            return Err(anyhow!("max_k must be greater than 0"));
        }

        for (name, url) in [
            ("events_service_url", &self.events_service_url),
            ("features_service_url", &self.features_service_url),
        ] {
            if let Some(url) = url {
                reqwest::Url::parse(url).map_err(|e| anyhow!("Invalid {}: {}", name, e))?;
            }
        }

        Ok(())
    }
}
