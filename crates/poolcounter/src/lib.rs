//! Top-level facade crate for the poolcounter exporter.
//!
//! Re-exports the parsing core and the exporter service so users can depend on a single crate.

pub mod core {
    pub use poolcounter_core::*;
}

pub mod exporter {
    pub use poolcounter_exporter::*;
}
