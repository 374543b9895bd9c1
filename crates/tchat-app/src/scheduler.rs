//! Listener scheduling.
//!
//! The event loop owns one [`ListenSlot`]. After every handled event it asks
//! the slot to arm a listener; the slot refuses while a read is already in
//! flight and the session refuses while disconnected. A completed read
//! leaves the slot empty until the loop re-arms it, so reads are chained one
//! after another and never overlap.

use std::{future::Future, pin::Pin};

use tchat_client::{Connector, FrameReader, ListenOutcome, Session};

type ListenFuture<R> = Pin<Box<dyn Future<Output = ListenOutcome<R>> + Send>>;

/// Holder for at most one in-flight listener read.
pub struct ListenSlot<R> {
    pending: Option<ListenFuture<R>>,
    armed: u64,
}

impl<R: FrameReader> ListenSlot<R> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self { pending: None, armed: 0 }
    }

    /// Start a read if none is in flight and the session can listen.
    ///
    /// Returns `true` if a new read was started.
    pub fn arm<C>(&mut self, session: &mut Session<C>) -> bool
    where
        C: Connector<Reader = R>,
    {
        if self.pending.is_some() {
            return false;
        }
        let Some(listener) = session.arm_listener() else {
            return false;
        };

        tracing::trace!(epoch = listener.epoch(), "listener armed");
        self.pending = Some(Box::pin(listener.listen()));
        self.armed += 1;
        true
    }

    /// Wait for the in-flight read.
    ///
    /// Never resolves while the slot is empty. Cancel-safe: dropping the
    /// returned future keeps the read in the slot for the next call.
    pub async fn next(&mut self) -> ListenOutcome<R> {
        let Some(pending) = self.pending.as_mut() else {
            return std::future::pending().await;
        };
        let outcome = pending.await;
        self.pending = None;
        tracing::trace!(epoch = outcome.epoch(), message = outcome.is_message(), "listen completed");
        outcome
    }

    /// Number of reads in flight, 0 or 1.
    pub fn in_flight(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    /// Total reads started through this slot.
    pub fn armed_total(&self) -> u64 {
        self.armed
    }

    /// Abandon the in-flight read, if any.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl<R: FrameReader> Default for ListenSlot<R> {
    fn default() -> Self {
        Self::new()
    }
}
