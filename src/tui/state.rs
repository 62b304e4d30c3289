//! Dashboard state: one panel per configured metric.

use ratatui::style::Color;

use crate::config::MetricSpec;
use crate::series::DisplayRecord;
use crate::sink::RenderSink;

use super::style::series_color;

/// Title shown until the server reports its host identity.
pub const BASE_TITLE: &str = "MongoDB serverStatus";

/// One metric row.
#[derive(Debug, Clone)]
pub struct MetricPanel {
    pub name: String,
    pub color: Color,
    /// Latest display record, `None` until the metric is first observed.
    pub record: Option<DisplayRecord>,
}

/// Everything the renderer draws.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub host: Option<String>,
    /// Panels in configuration order.
    pub panels: Vec<MetricPanel>,
    pub ticks: u64,
}

impl DashboardState {
    pub fn new(metrics: &[MetricSpec]) -> Self {
        Self {
            host: None,
            panels: metrics
                .iter()
                .map(|m| MetricPanel {
                    name: m.name.clone(),
                    color: series_color(m.color.as_deref()),
                    record: None,
                })
                .collect(),
            ticks: 0,
        }
    }

    pub fn title(&self) -> String {
        match &self.host {
            Some(host) => format!("{} for {}", BASE_TITLE, host),
            None => BASE_TITLE.to_string(),
        }
    }

    pub fn panel(&self, name: &str) -> Option<&MetricPanel> {
        self.panels.iter().find(|p| p.name == name)
    }
}

impl RenderSink for DashboardState {
    fn update_series(&mut self, record: &DisplayRecord) {
        if let Some(panel) = self.panels.iter_mut().find(|p| p.name == record.name) {
            panel.record = Some(record.clone());
        }
    }

    fn update_title(&mut self, host: &str) {
        self.host = Some(host.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ValueMap;
    use crate::series::SeriesStore;
    use chrono::Local;

    fn metrics() -> Vec<MetricSpec> {
        vec![
            MetricSpec::new("conns", "connections.current").with_color("green"),
            MetricSpec::new("resident", "mem.resident"),
        ]
    }

    #[test]
    fn test_panels_follow_config_order() {
        let state = DashboardState::new(&metrics());
        let names: Vec<&str> = state.panels.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["conns", "resident"]);
        assert_eq!(state.panels[0].color, Color::Green);
        assert_eq!(state.panels[1].color, Color::White);
        assert!(state.panels.iter().all(|p| p.record.is_none()));
    }

    #[test]
    fn test_title_update() {
        let mut state = DashboardState::new(&metrics());
        assert_eq!(state.title(), "MongoDB serverStatus");

        state.update_title("db-1:27017");
        assert_eq!(state.title(), "MongoDB serverStatus for db-1:27017");
    }

    #[test]
    fn test_update_series_fills_panel() {
        let mut state = DashboardState::new(&metrics());
        let mut store = SeriesStore::new(metrics());
        let values = ValueMap::from([("conns".to_string(), 4.0)]);

        for record in store.apply(&values, Local::now()) {
            state.update_series(&record);
        }

        let panel = state.panel("conns").unwrap();
        assert_eq!(panel.record.as_ref().unwrap().value_text, "4.00");
        assert!(state.panel("resident").unwrap().record.is_none());
    }
}
