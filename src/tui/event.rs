//! Event handling for TUI.
//!
//! Uses a separate thread to poll for terminal events.

use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};

use crate::handoff::Shutdown;

/// How long the input thread waits for an event before rechecking shutdown.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Terminal events.
#[derive(Debug)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize.
    Resize,
}

/// Event handler that polls for terminal events in a separate thread.
pub struct EventHandler {
    rx: Receiver<Event>,
}

impl EventHandler {
    /// Starts the input thread. It exits on shutdown or when the handler is
    /// dropped.
    pub fn new(shutdown: Shutdown) -> Self {
        let (tx, rx) = channel::unbounded();

        thread::spawn(move || {
            while !shutdown.is_requested() {
                if !event::poll(POLL_TIMEOUT).unwrap_or(false) {
                    continue;
                }
                let Ok(evt) = event::read() else {
                    continue;
                };
                let event = match evt {
                    CrosstermEvent::Key(key) => Event::Key(key),
                    CrosstermEvent::Resize(_, _) => Event::Resize,
                    _ => continue,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Receiver for use in `select!`.
    pub fn receiver(&self) -> &Receiver<Event> {
        &self.rx
    }
}
