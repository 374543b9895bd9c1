//! Wire protocol for tchat
//!
//! Every exchange with the relay is a single flat JSON object, the
//! [`Message`] envelope. This crate owns the envelope, the routing and
//! control vocabularies ([`Direction`], [`Config`]) and the codec that moves
//! envelopes on and off the wire.
//!
//! # Components
//!
//! - [`Message`]: six-field envelope carried by every frame
//! - [`Direction`]: routing intent (client/server to one/all)
//! - [`Config`]: control command distinguishing handshake, presence query and
//!   close notices from plain chat
//! - [`encode`] / [`decode`]: JSON codec, one message per logical frame
//!
//! The codec never validates vocabulary. Unknown `direction` and `config`
//! values decode into the `Other` variants and encode back unchanged, so only
//! the session layer decides what they mean.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod codec;
mod message;
mod time;

pub use codec::{CodecError, decode, decode_bytes, encode};
pub use message::{Config, Direction, Message, SERVER_SENDER};
pub use time::{TIMESTAMP_FORMAT, timestamp_now};
