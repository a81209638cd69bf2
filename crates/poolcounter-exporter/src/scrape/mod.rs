//! Scrape pipeline.
//!
//! - `reader`: connect, send `STATS FULL`, stream split response lines
//! - `collector`: describe/collect contract driving reader -> mapper -> sink

pub mod collector;
pub mod reader;

pub use collector::{Collector, RecordedSample, SampleSink, ScrapeReport};
pub use reader::{connect_within, Connector, StatsReader, StatsTransport, TcpConnector};
