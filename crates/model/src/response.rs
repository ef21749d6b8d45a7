use std::pin::Pin;
use std::task::{self, Poll};

use crate::provider::ChatProviderError;

/// A streaming reply from the chat provider.
///
/// The response is a finite and non-restartable sequence of text
/// fragments. Each fragment corresponds to one unit the transport has
/// delivered, after text decoding, and fragments are produced in the order
/// the underlying bytes arrived.
pub trait ChatResponse: Sized + Send + 'static {
    /// The error type that may be returned by the provider.
    type Error: ChatProviderError;

    /// Attempts to pull out the next fragment from the response.
    ///
    /// # Return value
    ///
    /// There are several possible return values, each indicating a
    /// distinct response state:
    ///
    /// - `Poll::Pending` means that this response is still waiting for
    ///   the next fragment. Implementations will ensure that the current
    ///   task will be notified when the next fragment may be ready.
    /// - `Poll::Ready(Ok(Some(fragment)))` means the response has a
    ///   fragment to deliver, and may produce further fragments on
    ///   subsequent `poll_next_fragment` calls.
    /// - `Poll::Ready(Ok(None))` means the response has completed.
    /// - `Poll::Ready(Err(error))` means an error occurred while
    ///   receiving or decoding the response.
    ///
    /// Calling this method after completion or after an error should
    /// always return `None`.
    fn poll_next_fragment(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<String>, Self::Error>>;
}
