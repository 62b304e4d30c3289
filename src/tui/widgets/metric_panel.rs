//! One metric row: legend on the left, line chart on the right.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Wrap};

use crate::series::DisplayRecord;
use crate::tui::state::MetricPanel;
use crate::tui::style::Styles;

/// Renders a metric panel into `area`.
pub fn render_metric_panel(frame: &mut Frame, area: Rect, panel: &MetricPanel) {
    let [legend_area, chart_area] =
        Layout::horizontal([Constraint::Percentage(25), Constraint::Percentage(75)]).areas(area);

    frame.render_widget(legend(panel), legend_area);

    let Some(record) = &panel.record else {
        return;
    };
    if record.values.is_empty() {
        return;
    }

    let points = chart_points(&record.values);
    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Styles::metric_name(panel.color))
        .data(&points);

    let x_axis = Axis::default()
        .style(Styles::axis())
        .bounds(x_bounds(record))
        .labels(record.x_labels.values().map(|l| Span::raw(l.as_str())));
    let y_axis = Axis::default()
        .style(Styles::axis())
        .bounds(y_bounds(&record.values));

    let chart = Chart::new(vec![dataset]).x_axis(x_axis).y_axis(y_axis);
    frame.render_widget(chart, chart_area);
}

fn legend(panel: &MetricPanel) -> Paragraph<'static> {
    let mut lines = vec![Line::from(Span::styled(
        panel.name.clone(),
        Styles::metric_name(panel.color),
    ))];
    match &panel.record {
        Some(record) => {
            lines.push(Line::from(Span::styled(
                record.value_text.clone(),
                Styles::metric_value(),
            )));
            if let Some(cmp) = &record.comparison {
                lines.push(Line::from(Span::styled(
                    cmp.line.clone(),
                    Styles::comparison(),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled("waiting...", Styles::dim()))),
    }
    Paragraph::new(lines).wrap(Wrap { trim: true })
}

/// Plots each value at its slot index.
fn chart_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

fn x_bounds(record: &DisplayRecord) -> [f64; 2] {
    let last = record.values.len().saturating_sub(1).max(1);
    [0.0, last as f64]
}

/// Value range padded so a flat series sits mid-chart.
fn y_bounds(values: &[f64]) -> [f64; 2] {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if min == max {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        return [min - pad, max + pad];
    }
    [min, max]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_points_use_slot_index() {
        assert_eq!(
            chart_points(&[5.0, 7.0, 6.0]),
            vec![(0.0, 5.0), (1.0, 7.0), (2.0, 6.0)]
        );
    }

    #[test]
    fn test_y_bounds() {
        assert_eq!(y_bounds(&[3.0, 1.0, 2.0]), [1.0, 3.0]);
        assert_eq!(y_bounds(&[0.0, 0.0]), [-1.0, 1.0]);
        assert_eq!(y_bounds(&[10.0]), [9.0, 11.0]);
        assert_eq!(y_bounds(&[]), [0.0, 1.0]);
    }
}
