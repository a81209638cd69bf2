//! Exporter config loader (strict YAML + `EXPORTER_*` environment overrides).
//!
//! Loaded once at startup. The file is optional unless `EXPORTER_CONFIG`
//! names one explicitly.

pub mod schema;

use std::fs;
use std::io;

use poolcounter_core::error::{PoolCounterError, Result};

pub use schema::ExporterConfig;

/// Environment variable naming the YAML file.
pub const CONFIG_PATH_ENV: &str = "EXPORTER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "poolcounter-exporter.yaml";

const ENV_POOL_COUNTER_ADDRESS: &str = "EXPORTER_POOL_COUNTER_ADDRESS";
const ENV_LISTEN_ADDRESS: &str = "EXPORTER_LISTEN_ADDRESS";
const ENV_LOGS_AS_JSON: &str = "EXPORTER_LOGS_AS_JSON";
const ENV_COLLECTOR_TIMEOUT_SECONDS: &str = "EXPORTER_COLLECTOR_TIMEOUT_SECONDS";
const ENV_SERVER_TIMEOUT_SECONDS: &str = "EXPORTER_SERVER_TIMEOUT_SECONDS";

/// Load from the process environment.
pub fn load() -> Result<ExporterConfig> {
    load_with(|key| std::env::var(key).ok())
}

/// Load using `lookup` for environment variables.
pub fn load_with<F>(lookup: F) -> Result<ExporterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit = lookup(CONFIG_PATH_ENV);
    let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut cfg = match fs::read_to_string(&path) {
        Ok(s) => parse_yaml(&s)?,
        Err(e) if explicit.is_none() && e.kind() == io::ErrorKind::NotFound => {
            ExporterConfig::default()
        }
        Err(e) => {
            return Err(PoolCounterError::BadConfig(format!("read {path} failed: {e}")));
        }
    };

    apply_env(&mut cfg, lookup)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg = parse_yaml(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse_yaml(s: &str) -> Result<ExporterConfig> {
    serde_yaml::from_str(s).map_err(|e| PoolCounterError::BadConfig(format!("invalid yaml: {e}")))
}

/// Overlay `EXPORTER_*` variables on top of `cfg`.
pub fn apply_env<F>(cfg: &mut ExporterConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_POOL_COUNTER_ADDRESS) {
        cfg.pool_counter_address = v;
    }
    if let Some(v) = lookup(ENV_LISTEN_ADDRESS) {
        cfg.listen_address = v;
    }
    if let Some(v) = lookup(ENV_LOGS_AS_JSON) {
        cfg.logs_as_json = parse_bool(ENV_LOGS_AS_JSON, &v)?;
    }
    if let Some(v) = lookup(ENV_COLLECTOR_TIMEOUT_SECONDS) {
        cfg.collector_timeout_seconds = parse_seconds(ENV_COLLECTOR_TIMEOUT_SECONDS, &v)?;
    }
    if let Some(v) = lookup(ENV_SERVER_TIMEOUT_SECONDS) {
        cfg.server_timeout_seconds = parse_seconds(ENV_SERVER_TIMEOUT_SECONDS, &v)?;
    }
    Ok(())
}

fn parse_bool(key: &str, v: &str) -> Result<bool> {
    match v {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(PoolCounterError::BadConfig(format!("{key}: invalid bool {v:?}"))),
    }
}

fn parse_seconds(key: &str, v: &str) -> Result<u64> {
    v.trim()
        .parse()
        .map_err(|e| PoolCounterError::BadConfig(format!("{key}: invalid seconds {v:?}: {e}")))
}
