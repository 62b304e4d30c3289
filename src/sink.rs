//! Rendering boundary and the headless consumer loop.

use chrono::Local;
use crossbeam::channel::{self, Receiver};
use tracing::info;

use crate::handoff::Shutdown;
use crate::sampler::ValueMap;
use crate::series::{DisplayRecord, SeriesStore};

/// Receiver of display updates.
///
/// Implemented by the TUI state and by [`LogSink`] for headless runs.
pub trait RenderSink {
    /// Replaces the series, x-axis labels and legend of one metric panel.
    fn update_series(&mut self, record: &DisplayRecord);

    /// Updates the dashboard title with the monitored host's identity.
    fn update_title(&mut self, host: &str);
}

/// Sink that writes every update to the log.
#[derive(Debug, Default)]
pub struct LogSink {
    updates: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl RenderSink for LogSink {
    fn update_series(&mut self, record: &DisplayRecord) {
        self.updates += 1;
        match &record.comparison {
            Some(cmp) => info!("{}: {} | {}", record.name, record.value_text, cmp.line),
            None => info!("{}: {}", record.name, record.value_text),
        }
    }

    fn update_title(&mut self, host: &str) {
        info!("Monitoring {}", host);
    }
}

/// Applies one tick to `store` and forwards the records to `sink`.
pub fn publish_tick<S: RenderSink + ?Sized>(
    store: &mut SeriesStore,
    values: &ValueMap,
    sink: &mut S,
) {
    for record in store.apply(values, Local::now()) {
        sink.update_series(&record);
    }
}

/// Consumes ticks until shutdown is requested or the sampler stops.
///
/// Returns the number of ticks applied.
pub fn run_consumer<S: RenderSink + ?Sized>(
    store: &mut SeriesStore,
    values: &Receiver<ValueMap>,
    hosts: &Receiver<String>,
    shutdown: &Shutdown,
    sink: &mut S,
) -> u64 {
    let closed = channel::never();
    let mut hosts_open = true;
    let mut ticks = 0;
    loop {
        let host_case = if hosts_open { hosts } else { &closed };
        channel::select! {
            recv(values) -> msg => match msg {
                Ok(map) => {
                    publish_tick(store, &map, sink);
                    ticks += 1;
                }
                Err(_) => break,
            },
            recv(host_case) -> msg => match msg {
                Ok(host) => sink.update_title(&host),
                Err(_) => hosts_open = false,
            },
            recv(shutdown.receiver()) -> _ => break,
        }
    }
    ticks
}
