//! Terminal dashboard for mongospy.
//!
//! Draws one row per configured metric: a legend with the latest value and
//! an optional comparison line, next to a line chart of the recent window.

mod app;
mod event;
mod input;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use state::{BASE_TITLE, DashboardState, MetricPanel};
pub use style::series_color;
