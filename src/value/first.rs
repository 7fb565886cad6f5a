//! First-item future over a stream.

use futures_core::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project_lite::pin_project! {
    /// A future that resolves to the first item of a stream.
    ///
    /// Resolves to `None` if the stream ends without producing an item.
    /// The stream is owned, so dropping the future tears the
    /// subscription down on every exit path.
    #[derive(Debug)]
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct FirstValue<S> {
        #[pin]
        stream: S,
    }
}

impl<S> FirstValue<S> {
    /// Wrap a stream, waiting for its first item.
    #[must_use]
    pub fn new(stream: S) -> Self {
        Self { stream }
    }
}

impl<S: Stream> Future for FirstValue<S> {
    type Output = Option<S::Item>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().stream.poll_next(cx)
    }
}
