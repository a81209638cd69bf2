//! Fixed metric catalog.
//!
//! Built once at startup and shared read-only for the life of the process.
//! Descriptor order is stable: it is the order `describe` reports and the order
//! used in tests.

use std::collections::HashMap;

/// Metric namespace prepended to every exported name.
pub const NAMESPACE: &str = "poolcounter";

/// Prometheus metric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    /// Name used in `# TYPE` lines.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// How a raw value text becomes a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    /// Elapsed-time text, see [`crate::duration`].
    Duration,
    /// Plain floating point number.
    Numeric,
}

/// Immutable description of one exported metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Stat key in the `STATS FULL` response; `None` for the availability gauge.
    pub key: Option<&'static str>,
    /// Fully qualified name (`poolcounter_<metric>`).
    pub name: String,
    pub help: &'static str,
    pub kind: MetricKind,
    pub transform: ValueTransform,
}

struct Entry {
    key: &'static str,
    metric: &'static str,
    help: &'static str,
    kind: MetricKind,
    transform: ValueTransform,
}

const fn entry(
    key: &'static str,
    metric: &'static str,
    kind: MetricKind,
    transform: ValueTransform,
    help: &'static str,
) -> Entry {
    Entry { key, metric, help, kind, transform }
}

use MetricKind::{Counter, Gauge};
use ValueTransform::{Duration, Numeric};

const RECOGNIZED: [Entry; 15] = [
    entry("total processing time", "total_processing_time_seconds", Counter, Duration,
        "Total processing time in seconds"),
    entry("average processing time", "avg_processing_time_seconds", Gauge, Duration,
        "Average processing time in seconds"),
    entry("gained time", "total_gained_time_seconds", Counter, Duration,
        "Total processing time saved by the use of PoolCounter in seconds"),
    entry("waiting time for me", "total_excl_wait_time_seconds", Counter, Duration,
        "Total waiting time for exclusive locks in seconds"),
    entry("waiting time for anyone", "total_shared_wait_time_seconds", Counter, Duration,
        "Total waiting time for shared locks in seconds"),
    entry("total_acquired", "total_acquired", Counter, Numeric,
        "Total acquired locks count"),
    entry("total_releases", "total_releases", Counter, Numeric,
        "Total released locks count"),
    entry("hashtable_entries", "hashtable_entries", Gauge, Numeric,
        "Number of entries in poolcounter hash table"),
    entry("processing_workers", "processing_workers", Gauge, Numeric,
        "Number of workers busy processing tasks"),
    entry("waiting_workers", "waiting_workers", Gauge, Numeric,
        "Number of workers waiting for tasks to be completed"),
    entry("connect_errors", "connect_errors", Counter, Numeric,
        "Total count of client connection errors"),
    entry("full_queues", "full_queues", Counter, Numeric,
        "Number of queues full of waiting workers"),
    entry("lock_mismatch", "lock_mismatch", Counter, Numeric,
        "Total count of mismatched lock requests"),
    entry("release_mismatch", "release_mismatch", Counter, Numeric,
        "Total count of mismatched release requests"),
    entry("processed_count", "processed_count", Counter, Numeric,
        "Total count of processed tasks"),
];

const UP_METRIC: &str = "up";
const UP_HELP: &str = "Whether poolcounter is up and responding to the exporter";

/// Build `<namespace>_<metric>`.
pub fn fq_name(namespace: &str, metric: &str) -> String {
    format!("{namespace}_{metric}")
}

/// All descriptors plus the key lookup used by the mapper.
#[derive(Debug, Clone)]
pub struct Catalog {
    descriptors: Vec<Descriptor>,
    by_key: HashMap<&'static str, usize>,
    up: usize,
}

impl Catalog {
    /// The counter-service recognition table followed by the availability gauge.
    pub fn standard() -> Self {
        let mut descriptors: Vec<Descriptor> = RECOGNIZED
            .iter()
            .map(|e| Descriptor {
                key: Some(e.key),
                name: fq_name(NAMESPACE, e.metric),
                help: e.help,
                kind: e.kind,
                transform: e.transform,
            })
            .collect();

        let by_key = RECOGNIZED
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key, i))
            .collect();

        let up = descriptors.len();
        descriptors.push(Descriptor {
            key: None,
            name: fq_name(NAMESPACE, UP_METRIC),
            help: UP_HELP,
            kind: MetricKind::Gauge,
            transform: ValueTransform::Numeric,
        });

        Self { descriptors, by_key, up }
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Descriptor for a recognized stat key.
    pub fn lookup(&self, key: &str) -> Option<&Descriptor> {
        self.by_key.get(key).map(|&i| &self.descriptors[i])
    }

    /// The availability descriptor.
    pub fn up(&self) -> &Descriptor {
        &self.descriptors[self.up]
    }

    /// Recognized stat keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().filter_map(|d| d.key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_shape() {
        let c = Catalog::standard();
        assert_eq!(c.descriptors().len(), 16);
        assert_eq!(c.keys().count(), 15);
        assert_eq!(c.up().name, "poolcounter_up");
        assert_eq!(c.up().kind, MetricKind::Gauge);
        assert!(c.up().key.is_none());
    }

    #[test]
    fn lookup_by_stat_key() {
        let c = Catalog::standard();
        let d = c.lookup("waiting time for anyone").unwrap();
        assert_eq!(d.name, "poolcounter_total_shared_wait_time_seconds");
        assert_eq!(d.transform, ValueTransform::Duration);

        let d = c.lookup("full_queues").unwrap();
        assert_eq!(d.kind, MetricKind::Counter);

        assert!(c.lookup("up").is_none());
        assert!(c.lookup("unknown_key").is_none());
    }

    #[test]
    fn names_are_unique() {
        let c = Catalog::standard();
        let mut names: Vec<_> = c.descriptors().iter().map(|d| d.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), c.descriptors().len());
    }
}
