//! Duration text vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use poolcounter_core::duration::{duration_seconds, parse_duration};


#[test]
fn duration_vectors() {
    let vectors = vector_loader::load_durations();
    assert!(!vectors.is_empty());

    for v in vectors {
        assert_eq!(duration_seconds(&v.input), v.seconds, "vector={}", v.description);

        let strict = parse_duration(&v.input);
        assert_eq!(strict.is_ok(), v.strict_ok, "vector={}", v.description);
        if let Ok(seconds) = strict {
            assert_eq!(seconds, v.seconds, "vector={}", v.description);
        }
    }
}

#[test]
fn parse_is_repeatable() {
    let text = "22h 14m 53.898438s";
    let first = duration_seconds(text);
    for _ in 0..100 {
        assert_eq!(duration_seconds(text).to_bits(), first.to_bits());
    }
}
