//! Describe/collect orchestration.
//!
//! Each `collect` call is one independent pull: its own connection, its own
//! line stream, no state carried to the next pull. Samples go to the sink as
//! soon as they are mapped. The availability sample is pushed by a drop guard,
//! so it lands exactly once and last on every exit path, including when the
//! pull future itself is dropped.

use std::sync::Arc;

use tokio::time::{Duration, Instant};

use poolcounter_core::catalog::{Catalog, Descriptor, MetricKind};
use poolcounter_core::error::{ErrorKind, PoolCounterError, Result};
use poolcounter_core::mapper::{self, Reading, Sample};
use poolcounter_core::stats::StatLine;

use super::reader::{Connector, StatsReader};

/// Receives samples as a pull produces them.
pub trait SampleSink: Send {
    fn emit(&mut self, sample: Sample<'_>);
}

/// Owned copy of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSample {
    pub name: String,
    pub kind: MetricKind,
    pub reading: Reading,
}

impl RecordedSample {
    pub fn value(&self) -> f64 {
        self.reading.value()
    }
}

impl SampleSink for Vec<RecordedSample> {
    fn emit(&mut self, sample: Sample<'_>) {
        self.push(RecordedSample {
            name: sample.descriptor.name.clone(),
            kind: sample.descriptor.kind,
            reading: sample.reading,
        });
    }
}

/// Outcome of one pull, for logging and self-metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeReport {
    pub up: bool,
    /// Data samples emitted (availability excluded).
    pub samples: usize,
    pub unparsed: usize,
    pub error: Option<ErrorKind>,
    pub elapsed: Duration,
}

impl ScrapeReport {
    /// `result` label value.
    pub fn result(&self) -> &'static str {
        match self.error {
            None => "success",
            Some(kind) => kind.as_str(),
        }
    }
}

#[derive(Clone)]
pub struct Collector {
    catalog: Arc<Catalog>,
    connector: Arc<dyn Connector>,
    budget: Duration,
}

impl Collector {
    /// `budget` bounds the write and read phase of each pull.
    pub fn new(catalog: Arc<Catalog>, connector: Arc<dyn Connector>, budget: Duration) -> Self {
        Self {
            catalog,
            connector,
            budget,
        }
    }

    /// Every metric this collector can produce, availability included.
    /// Does not touch the network.
    pub fn describe(&self) -> &[Descriptor] {
        self.catalog.descriptors()
    }

    /// Run one pull, streaming samples into `sink`.
    pub async fn collect(&self, sink: &mut dyn SampleSink) -> ScrapeReport {
        let started = Instant::now();
        let mut guard = Availability::new(&self.catalog, sink, self.connector.target());

        let outcome = self.pull(&mut guard).await;
        guard.finish(outcome);

        let report = guard.report(started.elapsed());
        tracing::debug!(
            addr = %self.connector.target(),
            up = report.up,
            samples = report.samples,
            unparsed = report.unparsed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "scrape finished"
        );
        report
    }

    async fn pull(&self, guard: &mut Availability<'_, '_>) -> Result<()> {
        let mut reader = StatsReader::open(self.connector.as_ref(), self.budget).await?;
        while let Some(line) = reader.next_line().await? {
            guard.map_and_emit(&line);
        }
        Ok(())
    }
}

/// Finalizer that emits the availability sample when dropped.
struct Availability<'a, 's> {
    catalog: &'a Catalog,
    sink: &'s mut dyn SampleSink,
    target: &'a str,
    finished: bool,
    failure: Option<PoolCounterError>,
    samples: usize,
    unparsed: usize,
}

impl<'a, 's> Availability<'a, 's> {
    fn new(catalog: &'a Catalog, sink: &'s mut dyn SampleSink, target: &'a str) -> Self {
        Self {
            catalog,
            sink,
            target,
            finished: false,
            failure: None,
            samples: 0,
            unparsed: 0,
        }
    }

    fn map_and_emit(&mut self, line: &StatLine) {
        let Some(sample) = mapper::map_stat(self.catalog, &line.key, &line.value) else {
            return;
        };
        if let Reading::Unparsed { error, .. } = &sample.reading {
            self.unparsed += 1;
            tracing::warn!(key = %line.key, error = %error, "unparsable poolcounter value, exporting fallback");
        }
        self.samples += 1;
        self.sink.emit(sample);
    }

    fn finish(&mut self, outcome: Result<()>) {
        self.finished = true;
        self.failure = outcome.err();
    }

    fn up(&self) -> bool {
        self.finished && self.failure.is_none()
    }

    fn report(&self, elapsed: Duration) -> ScrapeReport {
        ScrapeReport {
            up: self.up(),
            samples: self.samples,
            unparsed: self.unparsed,
            error: self.failure.as_ref().map(PoolCounterError::kind),
            elapsed,
        }
    }
}

impl Drop for Availability<'_, '_> {
    fn drop(&mut self) {
        match (&self.failure, self.finished) {
            (Some(err), _) => tracing::error!(
                addr = %self.target,
                kind = err.kind().as_str(),
                error = %err,
                samples = self.samples,
                "poolcounter scrape failed"
            ),
            (None, false) => tracing::warn!(addr = %self.target, "poolcounter scrape abandoned"),
            (None, true) => {}
        }
        let up = mapper::availability(self.catalog, self.up());
        self.sink.emit(up);
    }
}
