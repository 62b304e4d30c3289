//! Rolling series state and display records.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::config::MetricSpec;
use crate::fmt::{format_cumulative, format_elapsed, format_share, format_value};
use crate::sampler::ValueMap;

use super::window::TimeSeriesWindow;

/// Cumulative share of one metric against its configured counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Name of the metric compared against.
    pub other: String,
    pub cumulative: f64,
    pub other_cumulative: f64,
    /// `cumulative / (cumulative + other_cumulative) * 100`, `None` when the
    /// combined total is zero.
    pub share_pct: Option<f64>,
    /// Time since this metric's window was created.
    pub elapsed: Duration,
    /// Pre-rendered legend line.
    pub line: String,
}

/// Everything the renderer needs for one metric panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub name: String,
    pub color: Option<String>,
    /// Window values in chronological order.
    pub values: Vec<f64>,
    /// Index -> time label for the x-axis.
    pub x_labels: BTreeMap<usize, String>,
    pub latest: f64,
    /// Latest value, formatted.
    pub value_text: String,
    pub comparison: Option<Comparison>,
}

impl DisplayRecord {
    /// Legend block: name, latest value and the optional comparison line.
    pub fn legend(&self) -> String {
        let mut legend = format!("{}\n{}\n", self.name, self.value_text);
        if let Some(cmp) = &self.comparison {
            legend.push_str(&cmp.line);
            legend.push('\n');
        }
        legend
    }
}

/// Computes the share of `a` in the combined total of `a` and `b`.
pub fn comparison_share(a: f64, b: f64) -> Option<f64> {
    let total = a + b;
    (total != 0.0).then(|| a / total * 100.0)
}

/// Owns every metric's window and turns ticks into display records.
pub struct SeriesStore {
    metrics: Vec<MetricSpec>,
    windows: HashMap<String, TimeSeriesWindow>,
    last_tick_at: Option<DateTime<Local>>,
    capacity: usize,
}

impl SeriesStore {
    pub fn new(metrics: Vec<MetricSpec>) -> Self {
        Self::with_capacity(metrics, super::WINDOW_CAPACITY)
    }

    /// Creates a store whose windows hold `capacity` samples.
    pub fn with_capacity(metrics: Vec<MetricSpec>, capacity: usize) -> Self {
        Self {
            metrics,
            windows: HashMap::new(),
            last_tick_at: None,
            capacity,
        }
    }

    pub fn metrics(&self) -> &[MetricSpec] {
        &self.metrics
    }

    pub fn window(&self, name: &str) -> Option<&TimeSeriesWindow> {
        self.windows.get(name)
    }

    pub fn cumulative_total(&self, name: &str) -> Option<f64> {
        self.windows.get(name).map(|w| w.cumulative_total())
    }

    /// Applies one tick and returns a display record for every metric that
    /// has been observed so far, in configuration order.
    ///
    /// Metrics missing from `values` keep their window untouched for this
    /// tick. Rate metrics contribute `value * interval` to their cumulative
    /// total so the total is in the counter's own units; the interval is the
    /// gap to the previous tick and zero on the first one.
    pub fn apply(&mut self, values: &ValueMap, observed_at: DateTime<Local>) -> Vec<DisplayRecord> {
        let interval_secs = self
            .last_tick_at
            .and_then(|prev| (observed_at - prev).to_std().ok())
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick_at = Some(observed_at);

        for spec in &self.metrics {
            let Some(&value) = values.get(&spec.name) else {
                continue;
            };
            let capacity = self.capacity;
            let window = self
                .windows
                .entry(spec.name.clone())
                .or_insert_with(|| TimeSeriesWindow::with_capacity(observed_at, capacity));
            window.push(observed_at, value);

            let contribution = if spec.is_rate() {
                value * interval_secs
            } else {
                value
            };
            window.accumulate(contribution);
        }

        self.metrics
            .iter()
            .filter_map(|spec| self.record(spec, observed_at))
            .collect()
    }

    fn record(&self, spec: &MetricSpec, now: DateTime<Local>) -> Option<DisplayRecord> {
        let window = self.windows.get(&spec.name)?;
        let latest = window.latest()?.value;

        Some(DisplayRecord {
            name: spec.name.clone(),
            color: spec.color.clone(),
            values: window.values(),
            x_labels: window.x_labels(),
            latest,
            value_text: format_value(spec, latest),
            comparison: self.comparison(spec, window, now),
        })
    }

    fn comparison(
        &self,
        spec: &MetricSpec,
        window: &TimeSeriesWindow,
        now: DateTime<Local>,
    ) -> Option<Comparison> {
        let other = spec.compare_to.as_deref()?;
        let other_window = self.windows.get(other)?;

        let cumulative = window.cumulative_total();
        let other_cumulative = other_window.cumulative_total();
        let share_pct = comparison_share(cumulative, other_cumulative);
        let elapsed = (now - window.first_observed_at())
            .to_std()
            .unwrap_or(Duration::ZERO);

        let line = format!(
            "vs {}: {} / {} ({}) since {}",
            other,
            format_cumulative(spec, cumulative),
            format_cumulative(spec, other_cumulative),
            format_share(share_pct),
            format_elapsed(elapsed)
        );

        Some(Comparison {
            other: other.to_string(),
            cumulative,
            other_cumulative,
            share_pct,
            elapsed,
            line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeriveMode, MetricKind};
    use chrono::TimeZone;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().unwrap()
    }

    fn at(secs: i64) -> DateTime<Local> {
        t0() + chrono::Duration::seconds(secs)
    }

    fn values(pairs: &[(&str, f64)]) -> ValueMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn rate(name: &str, path: &str) -> MetricSpec {
        MetricSpec::new(name, path)
            .with_kind(MetricKind::Counter)
            .with_derive(DeriveMode::RatePerSec)
    }

    #[test]
    fn test_comparison_share() {
        assert_eq!(comparison_share(30.0, 70.0), Some(30.0));
        assert_eq!(comparison_share(0.0, 0.0), None);
        assert_eq!(comparison_share(0.0, 5.0), Some(0.0));
        assert_eq!(comparison_share(5.0, 0.0), Some(100.0));
    }

    #[test]
    fn test_first_tick_creates_windows() {
        let mut store = SeriesStore::new(vec![
            MetricSpec::new("a", "x.a"),
            MetricSpec::new("b", "x.b"),
        ]);

        let records = store.apply(&values(&[("a", 1.0)]), t0());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "a");
        assert_eq!(records[0].legend(), "a\n1.00\n");
        assert!(store.window("b").is_none());
        assert_eq!(store.window("a").unwrap().first_observed_at(), t0());
    }

    #[test]
    fn test_missing_metric_keeps_window() {
        let mut store = SeriesStore::new(vec![MetricSpec::new("a", "x.a")]);
        store.apply(&values(&[("a", 1.0)]), at(0));
        let records = store.apply(&values(&[]), at(1));

        assert_eq!(store.window("a").unwrap().len(), 1);
        assert_eq!(records[0].latest, 1.0);
    }

    #[test]
    fn test_rate_cumulative_uses_tick_gap() {
        let mut store = SeriesStore::new(vec![rate("inserts", "opcounters.insert")]);

        // First tick has no interval, so it contributes nothing.
        store.apply(&values(&[("inserts", 4.0)]), at(0));
        assert_eq!(store.cumulative_total("inserts"), Some(0.0));

        store.apply(&values(&[("inserts", 10.0)]), at(5));
        assert_eq!(store.cumulative_total("inserts"), Some(50.0));

        store.apply(&values(&[("inserts", 2.0)]), at(7));
        assert_eq!(store.cumulative_total("inserts"), Some(54.0));
    }

    #[test]
    fn test_non_rate_cumulative_adds_values() {
        let mut store = SeriesStore::new(vec![
            MetricSpec::new("deletes", "opcounters.delete")
                .with_kind(MetricKind::Counter)
                .with_derive(DeriveMode::Delta),
        ]);
        for (i, v) in [0.0, 3.0, 4.0].into_iter().enumerate() {
            store.apply(&values(&[("deletes", v)]), at(i as i64 * 10));
        }
        assert_eq!(store.cumulative_total("deletes"), Some(7.0));
    }

    #[test]
    fn test_cumulative_is_monotonic_for_non_negative_values() {
        let mut store = SeriesStore::new(vec![rate("r", "x.r"), MetricSpec::new("g", "x.g")]);
        let mut previous = (0.0, 0.0);
        for i in 0..50 {
            let v = (i % 7) as f64;
            store.apply(&values(&[("r", v), ("g", v)]), at(i));
            let current = (
                store.cumulative_total("r").unwrap(),
                store.cumulative_total("g").unwrap(),
            );
            assert!(current.0 >= previous.0);
            assert!(current.1 >= previous.1);
            previous = current;
        }
    }

    #[test]
    fn test_comparison_line() {
        let mut store = SeriesStore::new(vec![
            MetricSpec::new("reads", "opcounters.query").compared_to("writes"),
            MetricSpec::new("writes", "opcounters.insert"),
        ]);

        store.apply(&values(&[("reads", 10.0), ("writes", 30.0)]), at(0));
        let records = store.apply(&values(&[("reads", 20.0), ("writes", 40.0)]), at(65));

        let cmp = records[0].comparison.as_ref().unwrap();
        assert_eq!(cmp.other, "writes");
        assert_eq!(cmp.cumulative, 30.0);
        assert_eq!(cmp.other_cumulative, 70.0);
        assert_eq!(cmp.share_pct, Some(30.0));
        assert_eq!(cmp.elapsed, Duration::from_secs(65));
        assert_eq!(cmp.line, "vs writes: 30.00 / 70.00 (30.00%) since 1m5s");
        assert_eq!(
            records[0].legend(),
            "reads\n20.00\nvs writes: 30.00 / 70.00 (30.00%) since 1m5s\n"
        );
        assert!(records[1].comparison.is_none());
    }

    #[test]
    fn test_comparison_with_zero_totals() {
        let mut store = SeriesStore::new(vec![
            MetricSpec::new("a", "x.a").compared_to("b"),
            MetricSpec::new("b", "x.b"),
        ]);
        let records = store.apply(&values(&[("a", 0.0), ("b", 0.0)]), at(0));

        let cmp = records[0].comparison.as_ref().unwrap();
        assert_eq!(cmp.share_pct, None);
        assert_eq!(cmp.line, "vs b: 0.00 / 0.00 (N/A) since 0s");
    }

    #[test]
    fn test_comparison_waits_for_other_window() {
        let mut store = SeriesStore::new(vec![
            MetricSpec::new("a", "x.a").compared_to("b"),
            MetricSpec::new("b", "x.b"),
        ]);
        let records = store.apply(&values(&[("a", 1.0)]), at(0));
        assert!(records[0].comparison.is_none());

        let records = store.apply(&values(&[("a", 1.0), ("b", 1.0)]), at(1));
        assert!(records[0].comparison.is_some());
    }

    #[test]
    fn test_byte_rate_record() {
        let mut store = SeriesStore::new(vec![
            rate("net in", "network.bytesIn").compared_to("net out"),
            rate("net out", "network.bytesOut"),
        ]);
        store.apply(&values(&[("net in", 0.0), ("net out", 0.0)]), at(0));
        let records = store.apply(&values(&[("net in", 2048.0), ("net out", 1024.0)]), at(2));

        assert_eq!(records[0].value_text, "2.00 KB/s");
        assert_eq!(
            records[0].comparison.as_ref().unwrap().line,
            "vs net out: 4.00 KB / 2.00 KB (66.67%) since 2s"
        );
        assert_eq!(records[1].value_text, "1.00 KB/s");
    }

    #[test]
    fn test_store_window_capacity() {
        let mut store = SeriesStore::with_capacity(vec![MetricSpec::new("a", "x.a")], 3);
        for i in 0..5 {
            store.apply(&values(&[("a", i as f64)]), at(i));
        }
        let records = store.apply(&values(&[("a", 5.0)]), at(5));
        assert_eq!(records[0].values, vec![3.0, 4.0, 5.0]);
        assert_eq!(records[0].x_labels.len(), 3);
        assert_eq!(store.cumulative_total("a"), Some(15.0));
    }
}
