//! Application layer for tchat
//!
//! Pure state machines and a generic runtime for the chat client, so the same
//! orchestration code runs against a real terminal and against the test
//! harness.
//!
//! # Components
//!
//! - [`App`]: UI state machine (identity screen, compose box, chat log)
//! - [`ListenSlot`]: holds the single in-flight listener read
//! - [`Driver`]: Trait for platform-specific input and rendering
//! - [`Runtime`]: Event loop tying App, Session and Driver together

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod config;
mod driver;
mod event;
pub mod format;
mod input;
mod runtime;
mod scheduler;
mod state;

pub use action::AppAction;
pub use app::App;
pub use config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_PASSWORD};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{InputState, KeyInput, MESSAGE_CHAR_LIMIT, USERNAME_CHAR_LIMIT};
pub use runtime::{CLOSE_TIMEOUT, Runtime};
pub use scheduler::ListenSlot;
pub use state::{Identity, LineKind, LogLine, NOT_CONNECTED, WELCOME};
pub use tchat_client::ConnectionState;
