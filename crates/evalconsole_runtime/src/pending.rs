//! Shareable results that may still be in flight.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use evalconsole_foundation::Rendered;
use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

/// The result of one history entry.
///
/// Synchronous outcomes are created already settled; asynchronous ones wrap
/// a shared future. Clones observe the same settlement.
#[derive(Clone)]
pub struct PendingResult {
    inner: Inner,
}

#[derive(Clone)]
enum Inner {
    Ready(Rendered),
    Waiting(Shared<LocalBoxFuture<'static, Rendered>>),
}

impl PendingResult {
    /// Wraps an in-flight evaluation.
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = Rendered> + 'static,
    {
        Self {
            inner: Inner::Waiting(fut.boxed_local().shared()),
        }
    }

    /// Creates an already-settled result.
    #[must_use]
    pub fn ready(rendered: Rendered) -> Self {
        Self {
            inner: Inner::Ready(rendered),
        }
    }

    /// Returns the rendered result if it has settled.
    #[must_use]
    pub fn peek(&self) -> Option<&Rendered> {
        match &self.inner {
            Inner::Ready(rendered) => Some(rendered),
            Inner::Waiting(shared) => shared.peek(),
        }
    }

    /// Returns true once the result has settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.peek().is_some()
    }
}

impl Future for PendingResult {
    type Output = Rendered;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Rendered> {
        match &mut self.inner {
            Inner::Ready(rendered) => Poll::Ready(rendered.clone()),
            Inner::Waiting(shared) => Pin::new(shared).poll(cx),
        }
    }
}

impl fmt::Debug for PendingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(rendered) => f.debug_tuple("Settled").field(rendered).finish(),
            None => f.write_str("Pending"),
        }
    }
}

impl From<Rendered> for PendingResult {
    fn from(rendered: Rendered) -> Self {
        Self::ready(rendered)
    }
}
