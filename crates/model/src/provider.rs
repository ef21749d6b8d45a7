use std::error::Error;
use std::future::ready;

use crate::config::ChatConfig;
use crate::error::ErrorKind;
use crate::response::ChatResponse;

/// The error type for a chat provider.
pub trait ChatProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a chat backend, which accepts one user message
/// at a time and streams back the reply.
///
/// Once the provider is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the provider should be prepared for being dropped anytime.
pub trait ChatProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ChatProviderError;

    /// The response type for this provider.
    type Response: ChatResponse<Error = Self::Error>;

    /// Sends the user's text with the given configuration.
    ///
    /// Failures that happen before the reply starts (the backend is not
    /// reachable, or it rejects the request) must be reported here as a
    /// single error, never as an event of the returned response.
    fn send_request(
        &self,
        config: &ChatConfig,
        user_text: &str,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static;

    /// Checks whether the backend is reachable.
    ///
    /// The default implementation always succeeds, which suits providers
    /// that have nothing to probe.
    fn check_health(
        &self,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static {
        ready(Ok(()))
    }
}
