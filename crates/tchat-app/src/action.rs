//! Application side-effects and intents.
//!
//! [`AppAction`] values are instructions produced by the [`crate::App`] state
//! machine for the runtime to execute against the session and the driver.

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Commit the username, connect and send the handshake.
    Join {
        /// Display name chosen on the identity screen.
        username: String,
    },

    /// Send compose-box input as chat or as a command.
    Send {
        /// Raw compose-box text.
        content: String,
    },

    /// Gracefully close the connection, then quit if that succeeded.
    Close,
}
