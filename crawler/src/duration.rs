//! Parses the small subset of Go's `time.ParseDuration` literal grammar that
//! this crate's `Config` relies on: a sequence of `<number><unit>` pairs
//! (e.g. `"100ms"`, `"1h30m"`), units `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`.
//!
//! Config values in this codebase are historically duration *literals*
//! rather than `Duration` values so that they round-trip cleanly through
//! JSON configuration files produced by external collaborators.

use std::time::Duration;

pub fn parse_duration(literal: &str) -> Option<Duration> {
    let mut nanos: u128 = 0;
    let mut rest = literal.trim();
    if rest.is_empty() {
        return None;
    }

    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        let (num_str, tail) = rest.split_at(digits_end);
        let num: f64 = num_str.parse().ok()?;

        let (unit, tail) = split_unit(tail)?;
        let unit_nanos: f64 = match unit {
            "ns" => 1.0,
            "us" | "µs" => 1_000.0,
            "ms" => 1_000_000.0,
            "s" => 1_000_000_000.0,
            "m" => 60.0 * 1_000_000_000.0,
            "h" => 3_600.0 * 1_000_000_000.0,
            _ => return None,
        };
        nanos += (num * unit_nanos) as u128;
        rest = tail;
    }

    Some(Duration::from_nanos(nanos.min(u64::MAX as u128) as u64))
}

/// Splits the longest recognized unit prefix off `s`, returning `(unit, remainder)`.
fn split_unit(s: &str) -> Option<(&str, &str)> {
    const UNITS: &[&str] = &["ns", "us", "µs", "ms", "s", "m", "h"];
    UNITS
        .iter()
        .filter(|u| s.starts_with(**u))
        .max_by_key(|u| u.len())
        .map(|u| s.split_at(u.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_literals() {
        assert_eq!(parse_duration("100ms"), Some(Duration::from_millis(100)));
        assert_eq!(parse_duration("1s"), Some(Duration::from_secs(1)));
        assert_eq!(parse_duration("1ms"), Some(Duration::from_millis(1)));
    }

    #[test]
    fn parses_compound_literals() {
        assert_eq!(
            parse_duration("1h30m"),
            Some(Duration::from_secs(3600 + 1800))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("100"), None);
    }
}
