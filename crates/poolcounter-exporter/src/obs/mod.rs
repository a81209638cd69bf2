//! Observability: Prometheus text rendering, exporter self-metrics, logging.
//!
//! Scraped samples and the exporter's own counters are rendered by hand into
//! the text exposition format; nothing here needs a client library.

pub mod exposition;
pub mod logging;
pub mod metrics;
