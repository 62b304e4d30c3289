//! Bounded per-metric history.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Local};

/// Number of samples retained per metric.
pub const WINDOW_CAPACITY: usize = 200;

/// Time-of-day format for x-axis labels.
pub const LABEL_FORMAT: &str = "%H:%M:%S";

/// One observed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub at: DateTime<Local>,
    pub value: f64,
}

/// Fixed-capacity FIFO of samples plus the metric's running total.
#[derive(Debug, Clone)]
pub struct TimeSeriesWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
    cumulative_total: f64,
    first_observed_at: DateTime<Local>,
}

impl TimeSeriesWindow {
    pub fn new(first_observed_at: DateTime<Local>) -> Self {
        Self::with_capacity(first_observed_at, WINDOW_CAPACITY)
    }

    pub fn with_capacity(first_observed_at: DateTime<Local>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            cumulative_total: 0.0,
            first_observed_at,
        }
    }

    /// Appends a sample, returning the evicted oldest one when full.
    pub fn push(&mut self, at: DateTime<Local>, value: f64) -> Option<Sample> {
        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(Sample { at, value });
        evicted
    }

    /// Adds one sample's contribution to the running total.
    pub fn accumulate(&mut self, contribution: f64) {
        self.cumulative_total += contribution;
    }

    pub fn cumulative_total(&self) -> f64 {
        self.cumulative_total
    }

    pub fn first_observed_at(&self) -> DateTime<Local> {
        self.first_observed_at
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Values in chronological order.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// X-axis labels at the first, middle and last positions.
    ///
    /// The middle label appears from two samples on, the last from three
    /// (with two samples the middle position already is the last one).
    pub fn x_labels(&self) -> BTreeMap<usize, String> {
        let len = self.samples.len();
        let mut labels = BTreeMap::new();
        let mut label = |idx: usize| {
            labels.insert(idx, self.samples[idx].at.format(LABEL_FORMAT).to_string());
        };
        if len >= 1 {
            label(0);
        }
        if len >= 2 {
            label(len / 2);
        }
        if len >= 3 {
            label(len - 1);
        }
        labels
    }
}
