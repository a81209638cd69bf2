//! Raw stat value -> typed sample.
//!
//! A bad value never aborts a pull: it becomes [`Reading::Unparsed`], which
//! still carries the number that gets exported (zero for the broken component)
//! next to the parse error, so callers can tell a real zero from a failed parse.

use crate::catalog::{Catalog, Descriptor, MetricKind, ValueTransform};
use crate::duration;
use crate::error::PoolCounterError;

/// Parsed value of one sample.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Parsed(f64),
    Unparsed { fallback: f64, error: PoolCounterError },
}

impl Reading {
    /// Value to export.
    pub fn value(&self) -> f64 {
        match self {
            Reading::Parsed(v) => *v,
            Reading::Unparsed { fallback, .. } => *fallback,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Reading::Parsed(_))
    }
}

/// One typed metric value produced during a pull.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<'a> {
    pub descriptor: &'a Descriptor,
    pub reading: Reading,
}

impl Sample<'_> {
    pub fn kind(&self) -> MetricKind {
        self.descriptor.kind
    }

    pub fn value(&self) -> f64 {
        self.reading.value()
    }
}

/// Map a stat key and its raw value. Unknown keys yield `None`.
pub fn map_stat<'a>(catalog: &'a Catalog, key: &str, raw: &str) -> Option<Sample<'a>> {
    let descriptor = catalog.lookup(key)?;
    Some(Sample {
        descriptor,
        reading: read_value(descriptor.transform, raw),
    })
}

/// Build the availability sample.
pub fn availability(catalog: &Catalog, up: bool) -> Sample<'_> {
    Sample {
        descriptor: catalog.up(),
        reading: Reading::Parsed(if up { 1.0 } else { 0.0 }),
    }
}

fn read_value(transform: ValueTransform, raw: &str) -> Reading {
    match transform {
        ValueTransform::Duration => match duration::parse_duration(raw) {
            Ok(v) => Reading::Parsed(v),
            Err(error) => Reading::Unparsed {
                fallback: duration::duration_seconds(raw),
                error,
            },
        },
        ValueTransform::Numeric => match raw.parse::<f64>() {
            Ok(v) => Reading::Parsed(v),
            Err(e) => Reading::Unparsed {
                fallback: 0.0,
                error: PoolCounterError::value_parse(raw, format!("invalid number: {e}")),
            },
        },
    }
}
