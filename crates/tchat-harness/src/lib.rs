//! Deterministic test doubles for tchat.
//!
//! In-memory implementations of the client transport traits and of the app
//! [`tchat_app::Driver`], so session and runtime tests exercise the real
//! code paths without sockets or a terminal.
//!
//! - [`SimRelay`]: scriptable relay. Hands out [`SimConnector`]s, records
//!   every frame the client writes and counts concurrent reads.
//! - [`SimDriver`]: scripted keyboard input and captured renders, controlled
//!   through a [`SimHandle`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod sim_driver;
pub mod sim_relay;

use std::time::Duration;

pub use sim_driver::{RenderSnapshot, SimDriver, SimDriverError, SimHandle};
pub use sim_relay::{SimConnector, SimReader, SimRelay, SimWriter};

/// How long [`wait_until`] waits before giving up.
pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// Yield until `condition` holds.
///
/// Returns `false` if it did not hold within [`WAIT_LIMIT`]. Yielding lets
/// futures joined with the caller, such as a running runtime, make progress.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let poll = async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    };
    tokio::time::timeout(WAIT_LIMIT, poll).await.is_ok()
}
