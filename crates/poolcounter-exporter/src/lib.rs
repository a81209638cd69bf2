//! poolcounter exporter library entry.
//!
//! This crate wires the counter-service protocol reader, the scrape
//! orchestrator, Prometheus text rendering, and the HTTP ops surface into one
//! service. It is consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod scrape;
