//! Duration parser for configuration values.
//!
//! Accepts the same notation MongoDB tooling (and Go) uses for intervals:
//! a sequence of decimal numbers, each with an optional fraction and a
//! unit suffix.
//!
//! | Unit | Meaning |
//! |------|---------|
//! | `ns` | nanoseconds |
//! | `us`, `µs` | microseconds |
//! | `ms` | milliseconds |
//! | `s` | seconds |
//! | `m` | minutes |
//! | `h` | hours |
//!
//! Examples: `500ms`, `1s`, `1.5s`, `1m30s`, `2h`.

use std::time::Duration;

use thiserror::Error;

/// Error type for duration parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse duration '{input}': {message}")]
pub struct DurationParseError {
    pub input: String,
    pub message: String,
}

impl DurationParseError {
    fn new(input: &str, message: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

/// Parse a duration string such as `1s` or `1m30s`.
///
/// A bare `0` is accepted and yields [`Duration::ZERO`]. Negative
/// durations are rejected.
///
/// ```
/// use std::time::Duration;
/// use mongospy::util::parse_duration;
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::new(input, "empty duration"));
    }
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }
    if trimmed.starts_with('-') {
        return Err(DurationParseError::new(
            input,
            "negative durations are not allowed",
        ));
    }

    let mut rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if rest.is_empty() {
        return Err(DurationParseError::new(input, "missing value"));
    }

    let mut total_nanos = 0.0_f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(DurationParseError::new(
                input,
                format!("expected a number at '{}'", rest),
            ));
        }
        let (number_str, after_number) = rest.split_at(number_len);
        let value: f64 = number_str.parse().map_err(|_| {
            DurationParseError::new(input, format!("invalid number '{}'", number_str))
        })?;

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        if unit_len == 0 {
            return Err(DurationParseError::new(
                input,
                format!("missing unit after '{}'", number_str),
            ));
        }
        let (unit, tail) = after_number.split_at(unit_len);
        total_nanos += value * unit_nanos(unit).ok_or_else(|| {
            DurationParseError::new(
                input,
                format!("unknown unit '{}' (use ns, us, ms, s, m, h)", unit),
            )
        })?;
        rest = tail;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(DurationParseError::new(input, "duration out of range"));
    }

    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

fn unit_nanos(unit: &str) -> Option<f64> {
    let nanos = match unit {
        "ns" => 1.0,
        "us" | "µs" | "μs" => 1_000.0,
        "ms" => 1_000_000.0,
        "s" => 1_000_000_000.0,
        "m" => 60.0 * 1_000_000_000.0,
        "h" => 3_600.0 * 1_000_000_000.0,
        _ => return None,
    };
    Some(nanos)
}
