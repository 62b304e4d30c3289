//! Rolling time-series state feeding the renderer.
//!
//! [`SeriesStore`] consumes one [`ValueMap`](crate::sampler::ValueMap) per
//! tick, keeps a bounded [`TimeSeriesWindow`] and a cumulative total per
//! metric, and produces [`DisplayRecord`]s for the rendering side.

mod store;
mod window;

pub use store::{Comparison, DisplayRecord, SeriesStore, comparison_share};
pub use window::{LABEL_FORMAT, Sample, TimeSeriesWindow, WINDOW_CAPACITY};
