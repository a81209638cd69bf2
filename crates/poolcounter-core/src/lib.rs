//! poolcounter core: transport-agnostic parsing primitives, the metric catalog,
//! and the error surface shared by the exporter.
//!
//! Nothing here touches the network or a runtime. The exporter feeds raw
//! response lines in and gets typed samples back out, which keeps every parsing
//! rule testable without a live counter service.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A malformed field from the counter service must never take the exporter down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod catalog;
pub mod duration;
pub mod error;
pub mod mapper;
pub mod stats;

/// Shared result type.
pub use error::{ErrorKind, PoolCounterError, Result};
