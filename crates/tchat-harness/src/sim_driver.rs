//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`tchat_app::Runtime`] orchestration code runs in both production and
//! simulation. Input is injected and renders are observed through the
//! paired [`SimHandle`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tchat_app::{App, AppEvent, ConnectionState, Driver, Identity, KeyInput, LogLine};
use thiserror::Error;
use tokio::sync::mpsc;

/// Error type for simulation driver.
#[derive(Debug, Clone, Error)]
pub enum SimDriverError {
    /// Every [`SimHandle`] was dropped and no input is left.
    #[error("simulated input closed")]
    InputClosed,
}

/// What the last render would have drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    /// Lines shown in the chat area.
    pub lines: Vec<LogLine>,
    /// Current input text.
    pub input: String,
    /// Identity screen progress.
    pub identity: Identity,
    /// Connection state shown in the status bar.
    pub connection: ConnectionState,
}

impl RenderSnapshot {
    fn capture(app: &App) -> Self {
        Self {
            lines: app.display_lines(),
            input: app.input().buffer().to_owned(),
            identity: app.identity().clone(),
            connection: app.connection_state(),
        }
    }

    /// Number of lines whose text equals `text`.
    pub fn count(&self, text: &str) -> usize {
        self.lines.iter().filter(|line| line.text == text).count()
    }
}

#[derive(Default)]
struct Renders {
    count: usize,
    last: Option<RenderSnapshot>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
pub struct SimDriver {
    events: mpsc::UnboundedReceiver<AppEvent>,
    renders: Arc<Mutex<Renders>>,
}

/// Test-side control of a [`SimDriver`].
#[derive(Clone)]
pub struct SimHandle {
    events: mpsc::UnboundedSender<AppEvent>,
    renders: Arc<Mutex<Renders>>,
}

impl SimDriver {
    /// Create a driver and its handle.
    pub fn new() -> (Self, SimHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let renders = Arc::new(Mutex::new(Renders::default()));
        (Self { events: rx, renders: Arc::clone(&renders) }, SimHandle { events: tx, renders })
    }
}

impl SimHandle {
    /// Inject an event.
    pub fn inject_event(&self, event: AppEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("sim driver gone, event dropped");
        }
    }

    /// Inject a key press.
    pub fn key(&self, key: KeyInput) {
        self.inject_event(AppEvent::Key(key));
    }

    /// Type text without submitting it.
    pub fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.key(KeyInput::Char(c));
        }
    }

    /// Type text and press Enter.
    pub fn submit(&self, text: &str) {
        self.type_text(text);
        self.key(KeyInput::Enter);
    }

    /// Inject a terminal resize.
    pub fn resize(&self, cols: u16, rows: u16) {
        self.inject_event(AppEvent::Resize(cols, rows));
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.lock().count
    }

    /// Snapshot of the last render.
    pub fn last_render(&self) -> Option<RenderSnapshot> {
        self.lock().last.clone()
    }

    /// True once the runtime stopped the driver.
    pub fn stopped(&self) -> bool {
        self.lock().stopped
    }

    fn lock(&self) -> MutexGuard<'_, Renders> {
        self.renders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<AppEvent, Self::Error> {
        self.events.recv().await.ok_or(SimDriverError::InputClosed)
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let snapshot = RenderSnapshot::capture(app);
        let mut renders = self.renders.lock().unwrap_or_else(PoisonError::into_inner);
        renders.count += 1;
        renders.last = Some(snapshot);
        Ok(())
    }

    fn stop(&mut self) {
        self.renders.lock().unwrap_or_else(PoisonError::into_inner).stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn injected_events_arrive_in_order() {
        let (mut driver, handle) = SimDriver::new();
        handle.submit("hi");

        assert_eq!(driver.poll_event().await.unwrap(), AppEvent::Key(KeyInput::Char('h')));
        assert_eq!(driver.poll_event().await.unwrap(), AppEvent::Key(KeyInput::Char('i')));
        assert_eq!(driver.poll_event().await.unwrap(), AppEvent::Key(KeyInput::Enter));
    }

    #[tokio::test]
    async fn dropped_handle_closes_input() {
        let (mut driver, handle) = SimDriver::new();
        drop(handle);
        assert!(matches!(driver.poll_event().await, Err(SimDriverError::InputClosed)));
    }

    #[test]
    fn render_captures_snapshot() {
        let (mut driver, handle) = SimDriver::new();
        let app = App::new(false);
        driver.render(&app).unwrap();

        assert_eq!(handle.render_count(), 1);
        let snapshot = handle.last_render().unwrap();
        assert_eq!(snapshot.identity, Identity::Pending);
        assert_eq!(snapshot.connection, ConnectionState::Disconnected);
    }
}
