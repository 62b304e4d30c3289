//! Main TUI application.

use std::io;
use std::time::Duration;

use crossbeam::channel::{self, Receiver};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::{debug, info};

use crate::handoff::{Shutdown, ShutdownTrigger};
use crate::sampler::ValueMap;
use crate::series::SeriesStore;
use crate::sink::{RenderSink, publish_tick};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::DashboardState;

/// Upper bound between redraws when nothing arrives.
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Main TUI application.
pub struct App {
    state: DashboardState,
    store: SeriesStore,
    values: Receiver<ValueMap>,
    hosts: Receiver<String>,
    shutdown: Shutdown,
    trigger: ShutdownTrigger,
}

impl App {
    pub fn new(
        store: SeriesStore,
        values: Receiver<ValueMap>,
        hosts: Receiver<String>,
        shutdown: Shutdown,
        trigger: ShutdownTrigger,
    ) -> Self {
        Self {
            state: DashboardState::new(store.metrics()),
            store,
            values,
            hosts,
            shutdown,
            trigger,
        }
    }

    /// Runs the dashboard until the user quits, shutdown is requested or the
    /// sampler stops. Always fires the shutdown trigger on the way out.
    pub fn run(mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(self.shutdown.clone());
        let result = self.event_loop(&mut terminal, events.receiver());
        self.trigger.fire();

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        info!("Dashboard closed after {} ticks", self.state.ticks);
        result
    }

    fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &Receiver<Event>,
    ) -> io::Result<()> {
        let values = self.values.clone();
        let hosts = self.hosts.clone();
        let shutdown = self.shutdown.clone();
        let closed = channel::never();
        let mut hosts_open = true;
        loop {
            terminal.draw(|frame| render(frame, &self.state))?;

            let host_case = if hosts_open { &hosts } else { &closed };
            channel::select! {
                recv(values) -> msg => match msg {
                    Ok(map) => self.apply(&map),
                    Err(_) => {
                        debug!("Sampler stopped, closing dashboard");
                        return Ok(());
                    }
                },
                recv(host_case) -> msg => match msg {
                    Ok(host) => self.state.update_title(&host),
                    Err(_) => hosts_open = false,
                },
                recv(events) -> msg => match msg {
                    Ok(Event::Key(key)) => {
                        if handle_key(key) == KeyAction::Quit {
                            return Ok(());
                        }
                    }
                    Ok(Event::Resize) => {}
                    Err(_) => return Ok(()),
                },
                recv(shutdown.receiver()) -> _ => return Ok(()),
                default(REDRAW_INTERVAL) => {}
            }
        }
    }

    fn apply(&mut self, values: &ValueMap) {
        publish_tick(&mut self.store, values, &mut self.state);
        self.state.ticks += 1;
    }
}
