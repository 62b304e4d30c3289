//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::state::DashboardState;
use super::style::Styles;
use super::widgets::render_metric_panel;

/// Main render function.
pub fn render(frame: &mut Frame, state: &DashboardState) {
    let area = frame.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .title(Span::styled(state.title(), Styles::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.panels.is_empty() {
        frame.render_widget(Paragraph::new("no metrics configured").style(Styles::dim()), inner);
        return;
    }

    // One equal-height row per metric, in configuration order
    let n = state.panels.len() as u32;
    let rows = Layout::vertical(state.panels.iter().map(|_| Constraint::Ratio(1, n))).split(inner);

    for (panel, row) in state.panels.iter().zip(rows.iter()) {
        render_metric_panel(frame, *row, panel);
    }
}
