use serde::Deserialize;
use std::time::Duration;

use poolcounter_core::error::{PoolCounterError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    #[serde(default = "default_pool_counter_address")]
    pub pool_counter_address: String,

    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    #[serde(default)]
    pub logs_as_json: bool,

    #[serde(default = "default_collector_timeout_seconds")]
    pub collector_timeout_seconds: u64,

    #[serde(default = "default_server_timeout_seconds")]
    pub server_timeout_seconds: u64,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            pool_counter_address: default_pool_counter_address(),
            listen_address: default_listen_address(),
            logs_as_json: false,
            collector_timeout_seconds: default_collector_timeout_seconds(),
            server_timeout_seconds: default_server_timeout_seconds(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        validate_host_port("pool_counter_address", &self.pool_counter_address)?;
        validate_host_port("listen_address", &self.listen_address)?;

        if !(1..=300).contains(&self.collector_timeout_seconds) {
            return Err(PoolCounterError::BadConfig(
                "collector_timeout_seconds must be between 1 and 300".into(),
            ));
        }
        if !(1..=300).contains(&self.server_timeout_seconds) {
            return Err(PoolCounterError::BadConfig(
                "server_timeout_seconds must be between 1 and 300".into(),
            ));
        }
        Ok(())
    }

    pub fn collector_timeout(&self) -> Duration {
        Duration::from_secs(self.collector_timeout_seconds)
    }

    pub fn server_timeout(&self) -> Duration {
        Duration::from_secs(self.server_timeout_seconds)
    }
}

// host may be a name; only the port is checked here
fn validate_host_port(field: &str, value: &str) -> Result<()> {
    let port = value
        .rsplit_once(':')
        .filter(|(host, _)| !host.is_empty())
        .and_then(|(_, port)| port.parse::<u16>().ok());
    match port {
        Some(_) => Ok(()),
        None => Err(PoolCounterError::BadConfig(format!(
            "{field} must be host:port, got {value:?}"
        ))),
    }
}

fn default_pool_counter_address() -> String {
    "localhost:7531".into()
}
fn default_listen_address() -> String {
    "localhost:8000".into()
}
fn default_collector_timeout_seconds() -> u64 {
    5
}
fn default_server_timeout_seconds() -> u64 {
    3
}
