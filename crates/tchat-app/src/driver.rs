//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the runtime from the terminal. The
//! production frontend reads crossterm events and renders with ratatui; the
//! test harness feeds scripted events and records what would be drawn. The
//! relay connection is not part of the driver: it lives in the
//! [`tchat_client::Session`] owned by the [`crate::Runtime`].

use std::future::Future;

use crate::{App, AppEvent};

/// Abstracts user input and rendering for the application runtime.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input event.
    ///
    /// Must be cancel-safe: the runtime races it against the listener and
    /// drops it when the listener wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the input source fails or is closed. The runtime
    /// stops on error.
    fn poll_event(&mut self) -> impl Future<Output = Result<AppEvent, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release platform resources. Called once when the runtime exits.
    fn stop(&mut self);
}
