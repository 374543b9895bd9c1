//! Resolved client configuration.

/// Relay used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "wss://multi-serve.onrender.com/api/chat";

/// Shared relay password used when none is configured.
pub const DEFAULT_PASSWORD: &str = "1234";

/// Settings the runtime needs to build the session and the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Relay WebSocket URL.
    pub endpoint: String,
    /// Shared password sent on every frame.
    pub password: String,
    /// Append timestamps to rendered chat lines.
    pub timestamps: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            password: DEFAULT_PASSWORD.to_owned(),
            timestamps: false,
        }
    }
}
