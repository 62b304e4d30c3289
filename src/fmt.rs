//! Shared formatting helpers for legends and log output.
//!
//! All pure formatting functions (no ratatui styles, no layout) live here.

use std::time::Duration;

use crate::config::MetricSpec;

const BYTE_UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Format a byte count in binary units.
///
/// `"500 B"` below 1024, otherwise two decimals in KB/MB/GB/TB
/// (`2048` -> `"2.00 KB"`). Non-finite input renders as `"NaN"`.
pub fn human_bytes(bytes: f64) -> String {
    if !bytes.is_finite() {
        return "NaN".to_string();
    }
    if bytes < 1024.0 {
        return format!("{:.0} B", bytes);
    }
    let mut value = bytes / 1024.0;
    let mut unit = 0;
    while unit < BYTE_UNITS.len() - 1 && value >= 1024.0 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, BYTE_UNITS[unit])
}

/// Returns `true` if the metric's path or name mentions bytes.
pub fn is_byte_metric(spec: &MetricSpec) -> bool {
    spec.path.to_lowercase().contains("byte") || spec.name.to_lowercase().contains("byte")
}

/// Format the latest value of a metric for its legend.
///
/// Byte metrics use [`human_bytes`], everything else two decimals. Rate
/// metrics get a `/s` suffix.
pub fn format_value(spec: &MetricSpec, value: f64) -> String {
    let mut s = format_cumulative(spec, value);
    if spec.is_rate() {
        s.push_str("/s");
    }
    s
}

/// Format a cumulative total. Same as [`format_value`] without the rate suffix.
pub fn format_cumulative(spec: &MetricSpec, value: f64) -> String {
    if is_byte_metric(spec) {
        human_bytes(value)
    } else {
        format!("{:.2}", value)
    }
}

/// Format a comparison share as a percentage, `"N/A"` when undefined.
pub fn format_share(share_pct: Option<f64>) -> String {
    match share_pct {
        Some(pct) => format!("{:.2}%", pct),
        None => "N/A".to_string(),
    }
}

/// Format an elapsed duration compactly.
///
/// `"1h2m3s"`, `"2m3s"`, `"3s"`; fractional seconds are dropped. Durations
/// under a second keep their precision (`"250ms"`, `"0s"`).
pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        return format_subsecond(elapsed);
    }
    let secs = elapsed.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h{}m{}s", h, m, s)
    } else if m > 0 {
        format!("{}m{}s", m, s)
    } else {
        format!("{}s", s)
    }
}

fn format_subsecond(d: Duration) -> String {
    let nanos = d.subsec_nanos();
    if nanos == 0 {
        "0s".to_string()
    } else if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{}µs", trim_decimals(nanos as f64 / 1_000.0))
    } else {
        format!("{}ms", trim_decimals(nanos as f64 / 1_000_000.0))
    }
}

fn trim_decimals(value: f64) -> String {
    let s = format!("{:.3}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeriveMode;

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(0.0), "0 B");
        assert_eq!(human_bytes(500.0), "500 B");
        assert_eq!(human_bytes(1023.0), "1023 B");
        assert_eq!(human_bytes(1024.0), "1.00 KB");
        assert_eq!(human_bytes(2048.0), "2.00 KB");
        assert_eq!(human_bytes(1536.0 * 1024.0), "1.50 MB");
        assert_eq!(human_bytes(3.0 * 1024.0 * 1024.0 * 1024.0), "3.00 GB");
        assert_eq!(human_bytes(2.0 * 1024f64.powi(4)), "2.00 TB");
        // TB is the largest unit.
        assert_eq!(human_bytes(2048.0 * 1024f64.powi(4)), "2048.00 TB");
        assert_eq!(human_bytes(f64::NAN), "NaN");
        assert_eq!(human_bytes(f64::INFINITY), "NaN");
    }

    #[test]
    fn test_byte_heuristic() {
        assert!(is_byte_metric(&MetricSpec::new("net in", "network.bytesIn")));
        assert!(is_byte_metric(&MetricSpec::new("Bytes Out", "network.out")));
        assert!(is_byte_metric(&MetricSpec::new(
            "cache",
            "wiredTiger.cache.bytes currently in the cache"
        )));
        assert!(!is_byte_metric(&MetricSpec::new("inserts", "opcounters.insert")));
    }

    #[test]
    fn test_format_value() {
        let plain = MetricSpec::new("conns", "connections.current");
        assert_eq!(format_value(&plain, 12.0), "12.00");
        assert_eq!(format_value(&plain, 0.126), "0.13");

        let rate = MetricSpec::new("inserts", "opcounters.insert")
            .with_derive(DeriveMode::RatePerSec);
        assert_eq!(format_value(&rate, 10.0), "10.00/s");
        assert_eq!(format_cumulative(&rate, 10.0), "10.00");

        let bytes_rate =
            MetricSpec::new("in", "network.bytesIn").with_derive(DeriveMode::RatePerSec);
        assert_eq!(format_value(&bytes_rate, 2048.0), "2.00 KB/s");
        assert_eq!(format_cumulative(&bytes_rate, 2048.0), "2.00 KB");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(Some(30.0)), "30.00%");
        assert_eq!(format_share(Some(100.0 / 3.0)), "33.33%");
        assert_eq!(format_share(None), "N/A");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "0s");
        assert_eq!(format_elapsed(Duration::from_millis(250)), "250ms");
        assert_eq!(format_elapsed(Duration::from_micros(1500)), "1.5ms");
        assert_eq!(format_elapsed(Duration::from_micros(20)), "20µs");
        assert_eq!(format_elapsed(Duration::from_secs(3)), "3s");
        assert_eq!(format_elapsed(Duration::from_millis(3_900)), "3s");
        assert_eq!(format_elapsed(Duration::from_secs(123)), "2m3s");
        assert_eq!(format_elapsed(Duration::from_secs(3723)), "1h2m3s");
        assert_eq!(format_elapsed(Duration::from_secs(7200)), "2h0m0s");
    }
}
