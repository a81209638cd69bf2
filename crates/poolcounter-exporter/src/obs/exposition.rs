//! Prometheus text exposition (format 0.0.4) for scraped samples.

use std::collections::HashSet;
use std::fmt::Write;

use poolcounter_core::mapper::Sample;

use crate::scrape::SampleSink;

/// Content type of the rendered body.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Render a sample value the way Prometheus expects it.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        v.to_string()
    }
}

/// Sink that writes each sample as one metric family.
#[derive(Debug, Default)]
pub struct TextEncoder {
    out: String,
    seen: HashSet<String>,
}

impl TextEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl SampleSink for TextEncoder {
    fn emit(&mut self, sample: Sample<'_>) {
        let d = sample.descriptor;
        // a family may appear once per exposition
        if !self.seen.insert(d.name.clone()) {
            tracing::warn!(metric = %d.name, "duplicate sample in one scrape, keeping the first");
            return;
        }
        let _ = writeln!(self.out, "# HELP {} {}", d.name, escape_help(d.help));
        let _ = writeln!(self.out, "# TYPE {} {}", d.name, d.kind.as_str());
        let _ = writeln!(self.out, "{} {}", d.name, format_value(sample.value()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poolcounter_core::catalog::Catalog;
    use poolcounter_core::mapper::{availability, map_stat};

    #[test]
    fn renders_help_type_and_value() {
        let c = Catalog::standard();
        let mut enc = TextEncoder::new();
        enc.emit(map_stat(&c, "total_acquired", "42").unwrap());
        enc.emit(availability(&c, true));
        let body = enc.finish();

        assert_eq!(
            body,
            "# HELP poolcounter_total_acquired Total acquired locks count\n\
             # TYPE poolcounter_total_acquired counter\n\
             poolcounter_total_acquired 42\n\
             # HELP poolcounter_up Whether poolcounter is up and responding to the exporter\n\
             # TYPE poolcounter_up gauge\n\
             poolcounter_up 1\n"
        );
    }

    #[test]
    fn duplicate_family_is_dropped() {
        let c = Catalog::standard();
        let mut enc = TextEncoder::new();
        enc.emit(map_stat(&c, "waiting_workers", "1").unwrap());
        enc.emit(map_stat(&c, "waiting_workers", "2").unwrap());
        let body = enc.finish();
        assert!(body.contains("poolcounter_waiting_workers 1\n"));
        assert!(!body.contains("poolcounter_waiting_workers 2"));
    }

    #[test]
    fn special_values() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(0.957994), "0.957994");
        assert_eq!(format_value(67244608.0), "67244608");
    }
}
