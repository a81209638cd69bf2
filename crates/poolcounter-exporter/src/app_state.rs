//! Shared application state for the exporter.
//!
//! Built once from the loaded config: the metric catalog, the collector bound
//! to the counter service, and the exporter's own metrics.

use std::sync::Arc;

use poolcounter_core::catalog::Catalog;

use crate::config::ExporterConfig;
use crate::obs::metrics::ExporterMetrics;
use crate::scrape::{Collector, Connector, TcpConnector};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    collector: Collector,
    metrics: ExporterMetrics,
}

impl AppState {
    /// State backed by a TCP connection to `cfg.pool_counter_address`.
    pub fn new(cfg: ExporterConfig) -> Self {
        let connector = TcpConnector::new(cfg.pool_counter_address.clone(), cfg.collector_timeout());
        Self::with_connector(cfg, Arc::new(connector))
    }

    pub fn with_connector(cfg: ExporterConfig, connector: Arc<dyn Connector>) -> Self {
        let catalog = Arc::new(Catalog::standard());
        let collector = Collector::new(catalog, connector, cfg.collector_timeout());
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                collector,
                metrics: ExporterMetrics::default(),
            }),
        }
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn collector(&self) -> &Collector {
        &self.inner.collector
    }

    pub fn metrics(&self) -> &ExporterMetrics {
        &self.inner.metrics
    }
}
