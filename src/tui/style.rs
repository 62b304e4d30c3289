//! Color scheme and styles.

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

/// Dashboard color palette.
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;

    pub const BORDER: Color = Color::White;
    pub const TITLE: Color = Color::Cyan;
    pub const AXIS: Color = Color::White;

    /// Series color when the metric has none or an unparsable one.
    pub const SERIES_DEFAULT: Color = Color::White;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Outer border.
    pub fn border() -> Style {
        Style::default().fg(Theme::BORDER)
    }

    /// Dashboard title.
    pub fn title() -> Style {
        Style::default()
            .fg(Theme::TITLE)
            .add_modifier(Modifier::BOLD)
    }

    /// Metric name in the legend.
    pub fn metric_name(color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Latest value in the legend.
    pub fn metric_value() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    /// Comparison line in the legend.
    pub fn comparison() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Chart axes and their labels.
    pub fn axis() -> Style {
        Style::default().fg(Theme::AXIS)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }
}

/// Parses a metric's color hint.
///
/// Accepts ratatui color names (`"green"`, `"light-blue"`), 256-color
/// indexes (`"2"`) and hex (`"#ff8800"`). Anything else falls back to
/// [`Theme::SERIES_DEFAULT`].
pub fn series_color(hint: Option<&str>) -> Color {
    hint.and_then(|h| Color::from_str(h.trim()).ok())
        .unwrap_or(Theme::SERIES_DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_color() {
        assert_eq!(series_color(Some("green")), Color::Green);
        assert_eq!(series_color(Some(" 123 ")), Color::Indexed(123));
        assert_eq!(series_color(Some("#ff8800")), Color::Rgb(0xff, 0x88, 0x00));
        assert_eq!(series_color(Some("not-a-color")), Theme::SERIES_DEFAULT);
        assert_eq!(series_color(None), Theme::SERIES_DEFAULT);
    }
}
