//! Terminal UI for tchat
//!
//! A thin shell over [`tchat_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`tchat_app::Runtime`].
//!
//! This crate only handles configuration, logging setup, terminal input and
//! rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use cli::Args;
pub use tchat_app::{App, AppAction, AppEvent, ClientConfig, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
