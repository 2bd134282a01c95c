//! Replay offset parsing.
//!
//! A bare number is milliseconds (`"150"`, `"2.5"`). Anything else is a
//! sequence of `<number><unit>` groups (`"1.5s"`, `"2m30s"`, `"250us"`)
//! with units `ns`, `us`/`µs`, `ms`, `s`, `m` and `h`.

use crate::DomainError;
use std::time::Duration;

pub fn parse_offset(raw: &str) -> Result<Duration, DomainError> {
    let invalid = |reason: &str| DomainError::InvalidOffset(format!("'{}': {}", raw, reason));

    let text = raw.trim();
    if text.is_empty() {
        return Err(invalid("empty offset"));
    }
    if text.starts_with('-') {
        return Err(invalid("offset cannot be negative"));
    }
    let text = text.strip_prefix('+').unwrap_or(text);

    if text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        let millis = parse_number(text).ok_or_else(|| invalid("not a number"))?;
        return from_nanos_f64(millis * NANOS_PER_MILLI).ok_or_else(|| invalid("offset out of range"));
    }

    let mut total_nanos = 0.0_f64;
    let mut rest = text;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(invalid("expected a number before the unit"));
        }
        let value = parse_number(&rest[..number_len]).ok_or_else(|| invalid("not a number"))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        if unit.is_empty() {
            return Err(invalid("missing unit"));
        }
        let scale = unit_scale(unit).ok_or_else(|| invalid(&format!("unknown unit '{}'", unit)))?;
        total_nanos += value * scale;
        rest = &rest[unit_len..];
    }

    from_nanos_f64(total_nanos).ok_or_else(|| invalid("offset out of range"))
}

const NANOS_PER_MILLI: f64 = 1e6;

fn from_nanos_f64(nanos: f64) -> Option<Duration> {
    let nanos = nanos.round();
    if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(nanos as u64))
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn unit_scale(unit: &str) -> Option<f64> {
    match unit {
        "ns" => Some(1.0),
        "us" | "µs" | "μs" => Some(1e3),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(1e9),
        "m" => Some(60e9),
        "h" => Some(3_600e9),
        _ => None,
    }
}
