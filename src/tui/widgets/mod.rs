//! TUI widgets for mongospy.

mod metric_panel;

pub use metric_panel::render_metric_panel;
