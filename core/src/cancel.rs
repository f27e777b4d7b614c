//! Cancellation handles and the single-fire completion token.
//!
//! # Design
//! Each sent request owns one `CompletionToken`. Completion and cancellation
//! race on the same atomic: whichever moves it out of `PENDING` first wins.
//! A won cancellation means the completion callback never runs; a won
//! completion turns later `cancel()` calls into no-ops.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const PENDING: u8 = 0;
const COMPLETED: u8 = 1;
const CANCELLED: u8 = 2;

/// Anything that can be asked to stop. Calling `cancel` more than once is allowed.
pub trait Cancellable {
    fn cancel(&self);
}

/// Shared state between a `RequestHandle` and the pending completion.
#[derive(Debug, Default)]
pub(crate) struct CompletionToken {
    state: AtomicU8,
}

impl CompletionToken {
    /// Claim the right to invoke the completion callback.
    pub(crate) fn complete(&self) -> bool {
        self.transition(COMPLETED)
    }

    /// Claim cancellation. False if the request already completed or was cancelled.
    pub(crate) fn cancel(&self) -> bool {
        self.transition(CANCELLED)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELLED
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.state.load(Ordering::Acquire) == COMPLETED
    }

    fn transition(&self, to: u8) -> bool {
        self.state
            .compare_exchange(PENDING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Handle to an in-flight request returned by `GraphQLClient::send`.
///
/// Dropping the handle does not cancel the request.
#[derive(Debug)]
pub struct RequestHandle<H> {
    token: Arc<CompletionToken>,
    inner: H,
}

impl<H: Cancellable> RequestHandle<H> {
    pub(crate) fn new(token: Arc<CompletionToken>, inner: H) -> Self {
        Self { token, inner }
    }

    /// True once `cancel` won the race against completion.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the completion callback has been claimed.
    pub fn is_completed(&self) -> bool {
        self.token.is_completed()
    }

    /// The dispatcher's own handle.
    pub fn dispatch_handle(&self) -> &H {
        &self.inner
    }
}

impl<H: Cancellable> Cancellable for RequestHandle<H> {
    /// Suppress the completion callback and ask the dispatcher to abandon the
    /// request. No-op once the request completed or was already cancelled.
    fn cancel(&self) {
        if self.token.cancel() {
            tracing::debug!("GraphQL request cancelled");
            self.inner.cancel();
        }
    }
}
