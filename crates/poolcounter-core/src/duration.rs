//! Elapsed-time text reported by the counter service.
//!
//! Two shapes are accepted:
//! - `389 days 9343h 3m 28.000000s` (day prefix + unit portion)
//! - `22h 14m 53.898438s` (unit portion alone)
//!
//! The unit portion is a run of `<decimal><unit>` tokens. Spaces inside it are
//! insignificant and stripped before parsing. Values accumulate in integer
//! nanoseconds and only become floating point at the very end, so the same
//! text always yields bit-identical seconds.

use crate::error::{PoolCounterError, Result};

const DAYS_SEPARATOR: &str = " days ";
const SECONDS_PER_DAY: f64 = 86_400.0;
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const MAX_NANOS: u64 = 1 << 63;

/// Strict parse: any malformed component is an error.
pub fn parse_duration(text: &str) -> Result<f64> {
    match text.split_once(DAYS_SEPARATOR) {
        Some((days, rest)) => {
            let days = parse_days(days)?;
            Ok(days + parse_unit_duration(rest)?)
        }
        None => parse_unit_duration(text),
    }
}

/// Lenient parse: a component that fails to parse contributes zero.
///
/// This is what ends up on the wire for a malformed value; a pull is never
/// aborted because of one bad field.
pub fn duration_seconds(text: &str) -> f64 {
    match text.split_once(DAYS_SEPARATOR) {
        Some((days, rest)) => {
            parse_days(days).unwrap_or(0.0) + parse_unit_duration(rest).unwrap_or(0.0)
        }
        None => parse_unit_duration(text).unwrap_or(0.0),
    }
}

fn parse_days(text: &str) -> Result<f64> {
    let days: i64 = text
        .parse()
        .map_err(|e| PoolCounterError::value_parse(text, format!("invalid day count: {e}")))?;
    Ok(days as f64 * SECONDS_PER_DAY)
}

/// Parse the hour/minute/second portion (whitespace removed) into seconds.
pub fn parse_unit_duration(text: &str) -> Result<f64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let nanos = parse_nanos(&compact).map_err(|reason| PoolCounterError::value_parse(text, reason))?;
    let whole = nanos / NANOS_PER_SECOND as i64;
    let frac = nanos % NANOS_PER_SECOND as i64;
    Ok(whole as f64 + frac as f64 / 1e9)
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60 * NANOS_PER_SECOND),
        "h" => Some(3_600 * NANOS_PER_SECOND),
        _ => None,
    }
}

fn parse_nanos(input: &str) -> std::result::Result<i64, String> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err("empty duration".into());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        if !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(format!("expected a number at {rest:?}"));
        }

        let (whole, after_whole) = leading_int(rest)?;
        let has_whole = after_whole.len() != rest.len();
        rest = after_whole;

        let mut fraction = 0u64;
        let mut scale = 1.0f64;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (f, s, after_fraction) = leading_fraction(after_dot);
            has_fraction = after_fraction.len() != after_dot.len();
            fraction = f;
            scale = s;
            rest = after_fraction;
        }
        if !has_whole && !has_fraction {
            return Err("number has no digits".into());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err("missing unit".into());
        }
        let unit_text = &rest[..unit_len];
        rest = &rest[unit_len..];
        let unit = unit_nanos(unit_text).ok_or_else(|| format!("unknown unit {unit_text:?}"))?;

        if whole > MAX_NANOS / unit {
            return Err("duration overflows".into());
        }
        let mut value = whole * unit;
        if fraction > 0 {
            // fraction is scaled in floating point, then truncated to whole nanos
            value += (fraction as f64 * (unit as f64 / scale)) as u64;
            if value > MAX_NANOS {
                return Err("duration overflows".into());
            }
        }
        total = total
            .checked_add(value)
            .filter(|t| *t <= MAX_NANOS)
            .ok_or("duration overflows")?;
    }

    if negative {
        Ok((total as i64).wrapping_neg())
    } else if total > i64::MAX as u64 {
        Err("duration overflows".into())
    } else {
        Ok(total as i64)
    }
}

fn leading_int(s: &str) -> std::result::Result<(u64, &str), String> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    let mut value: u64 = 0;
    for b in s[..digits].bytes() {
        if value > MAX_NANOS / 10 {
            return Err("duration overflows".into());
        }
        value = value * 10 + u64::from(b - b'0');
        if value > MAX_NANOS {
            return Err("duration overflows".into());
        }
    }
    Ok((value, &s[digits..]))
}

/// Digits past what fits in the accumulator are consumed but ignored.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    let mut value: u64 = 0;
    let mut scale = 1.0f64;
    let mut overflow = false;
    for b in s[..digits].bytes() {
        if overflow {
            continue;
        }
        if value > (i64::MAX as u64) / 10 {
            overflow = true;
            continue;
        }
        let next = value * 10 + u64::from(b - b'0');
        if next > MAX_NANOS {
            overflow = true;
            continue;
        }
        value = next;
        scale *= 10.0;
    }
    (value, scale, &s[digits..])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn days_prefix() {
        assert_eq!(duration_seconds("389 days 9343h 3m 28.000000s"), 67244608.0);
    }

    #[test]
    fn unit_only() {
        assert_eq!(duration_seconds("22h 14m 53.898438s"), 80093.898438);
        assert_eq!(duration_seconds("0.957994s"), 0.957994);
    }

    #[test]
    fn compact_and_spaced_agree() {
        assert_eq!(
            duration_seconds("9343h3m28.000000s"),
            duration_seconds("9343h 3m 28.000000s")
        );
    }

    #[test]
    fn small_units_and_bare_zero() {
        assert_eq!(parse_duration("0").unwrap(), 0.0);
        assert_eq!(parse_duration("1500ms").unwrap(), 1.5);
        assert_eq!(parse_duration("250us").unwrap(), 0.00025);
        assert_eq!(parse_duration(".5s").unwrap(), 0.5);
        assert_eq!(parse_duration("-1m").unwrap(), -60.0);
    }

    #[test]
    fn strict_rejects_bad_components() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("12").is_err());
        assert!(parse_duration("3 weeks").is_err());
        assert!(parse_duration("x days 1s").is_err());
        assert!(parse_duration("1 days 1y").is_err());
        assert!(parse_duration(".s").is_err());
    }

    #[test]
    fn lenient_zeroes_only_the_broken_component() {
        assert_eq!(duration_seconds("garbage"), 0.0);
        assert_eq!(duration_seconds("x days 10s"), 10.0);
        assert_eq!(duration_seconds("2 days bogus"), 172800.0);
    }

    #[test]
    fn error_names_the_input() {
        let err = parse_duration("5 parsecs").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ValueParse);
        assert!(err.to_string().contains("5 parsecs"));
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(parse_duration("99999999999999999999h").is_err());
        assert!(parse_duration("3000000h").is_err());
        assert!(parse_duration("9223372036854775808ns9223372036854775808ns").is_err());
        assert_eq!(duration_seconds("9223372036854775808ns9223372036854775808ns"), 0.0);
    }
}
