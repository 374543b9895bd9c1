//! Message envelope and protocol vocabularies.
//!
//! The wire representation of [`Direction`] and [`Config`] is a plain string.
//! Both enums convert losslessly from and into that string, keeping unknown
//! values in an `Other` variant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sender name reserved for relay-originated system messages.
pub const SERVER_SENDER: &str = "Server";

/// Routing intent of a frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    /// Client to server only (`client-to-server`).
    ClientToServer,
    /// Client to every connected client (`client-to-all`).
    ClientToAll,
    /// Server to a single client (`server-to-client`).
    ServerToClient,
    /// Server to every connected client (`server-to-all`).
    ServerToAll,
    /// Any other value, kept verbatim. The empty string means unset.
    Other(String),
}

impl Direction {
    /// Wire string for this direction.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClientToServer => "client-to-server",
            Self::ClientToAll => "client-to-all",
            Self::ServerToClient => "server-to-client",
            Self::ServerToAll => "server-to-all",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for Direction {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "client-to-server" => Self::ClientToServer,
            "client-to-all" => Self::ClientToAll,
            "server-to-client" => Self::ServerToClient,
            "server-to-all" => Self::ServerToAll,
            _ => Self::Other(raw),
        }
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control command carried in the `config` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Config {
    /// Plain chat, no control command (`""`).
    #[default]
    Chat,
    /// Handshake registering the sender name (`config-username`).
    Username,
    /// Presence query for online users (`config-list`).
    List,
    /// Graceful disconnect notice (`config-close`).
    Close,
    /// Any other value, kept verbatim.
    Other(String),
}

impl Config {
    /// Wire string for this command.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Chat => "",
            Self::Username => "config-username",
            Self::List => "config-list",
            Self::Close => "config-close",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Config {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "" => Self::Chat,
            "config-username" => Self::Username,
            "config-list" => Self::List,
            "config-close" => Self::Close,
            _ => Self::Other(raw),
        }
    }
}

impl From<Config> for String {
    fn from(config: Config) -> Self {
        match config {
            Config::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire envelope for every protocol exchange.
///
/// Serializes as a flat JSON object with exactly six string fields. Unset
/// fields are empty strings, never `null`. Missing fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    /// Display name of the originator. [`SERVER_SENDER`] for system messages.
    pub sender: String,
    /// Routing intent.
    pub direction: Direction,
    /// Control command, [`Config::Chat`] for plain chat.
    pub config: Config,
    /// Message body. Empty for pure control frames.
    pub content: String,
    /// Shared session secret, sent on every outbound frame.
    pub password: String,
    /// Wall-clock send time, see [`crate::TIMESTAMP_FORMAT`].
    pub timestamp: String,
}

impl Message {
    /// True if the relay itself sent this message.
    pub fn is_from_server(&self) -> bool {
        self.sender == SERVER_SENDER
    }
}
