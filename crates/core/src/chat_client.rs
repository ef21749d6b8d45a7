use std::fmt::{self, Debug};
use std::future::poll_fn;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use little_chat_model::{
    ChatConfig, ChatProvider, ChatProviderError, ChatResponse,
};
use tracing::Instrument;

/// A provider error with its concrete type erased.
pub type BoxedError = Box<dyn ChatProviderError>;

type BoxedFuture<T> = Pin<Box<dyn Future<Output = Result<T, BoxedError>> + Send>>;
#[rustfmt::skip]
type SendFn = Arc<
    dyn Fn(&ChatConfig, &str) -> BoxedFuture<FragmentStream> + Send + Sync
>;
type HealthFn = Arc<dyn Fn() -> BoxedFuture<()> + Send + Sync>;

/// A wrapper around a chat provider that provides a type-erased interface
/// for the other modules.
#[derive(Clone)]
pub struct ChatClient {
    send_fn: SendFn,
    health_fn: HealthFn,
}

impl ChatClient {
    #[inline]
    pub fn new<P: ChatProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ChatClient` doesn't have a
        // generic parameter and we don't want it either.
        let provider = Arc::new(provider);
        let send_fn: SendFn = Arc::new({
            let provider = Arc::clone(&provider);
            move |config: &ChatConfig, user_text: &str| {
                let fut = provider.send_request(config, user_text);
                Box::pin(
                    async move {
                        trace!("waiting for the reply to start");
                        match fut.await {
                            Ok(resp) => Ok(FragmentStream::new(resp)),
                            Err(err) => {
                                error!("request failed: {err}");
                                Err(Box::new(err) as BoxedError)
                            }
                        }
                    }
                    .instrument(trace_span!("chat client req")),
                )
            }
        });
        let health_fn: HealthFn = Arc::new(move || {
            let fut = provider.check_health();
            Box::pin(async move {
                fut.await.map_err(|err| Box::new(err) as BoxedError)
            })
        });
        Self { send_fn, health_fn }
    }

    /// Sends the user's text and waits until the reply starts.
    #[inline]
    pub async fn send_request(
        &self,
        config: &ChatConfig,
        user_text: &str,
    ) -> Result<FragmentStream, BoxedError> {
        (self.send_fn)(config, user_text).await
    }

    /// Probes whether the backend is reachable.
    #[inline]
    pub async fn check_health(&self) -> Result<(), BoxedError> {
        (self.health_fn)().await
    }
}

impl Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient").finish_non_exhaustive()
    }
}

/// The reply of a request, yielding text fragments in arrival order.
///
/// Dropping the stream drops the underlying response, which stops
/// receiving any further data.
pub struct FragmentStream {
    inner: Pin<Box<dyn ErasedResponse>>,
}

impl FragmentStream {
    #[inline]
    fn new<R: ChatResponse>(resp: R) -> Self {
        Self {
            inner: Box::pin(resp),
        }
    }

    /// Waits for the next fragment. `None` means the reply has completed.
    #[inline]
    pub async fn next_fragment(&mut self) -> Result<Option<String>, BoxedError> {
        poll_fn(|cx| self.inner.as_mut().poll_next(cx)).await
    }
}

trait ErasedResponse: Send {
    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<String>, BoxedError>>;
}

impl<R: ChatResponse> ErasedResponse for R {
    #[inline]
    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<String>, BoxedError>> {
        self.poll_next_fragment(cx)
            .map_err(|err| Box::new(err) as BoxedError)
    }
}

#[cfg(test)]
mod tests {
    use little_chat_model::{ChatConfigBuilder, ErrorKind};
    use little_chat_test_model::{
        PresetFailure, PresetResponse, TestChatProvider,
    };

    use super::*;

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestChatProvider::default();
        for _ in 0..3 {
            provider.add_response(PresetResponse::with_fragments([
                "How ", "are ", "you?",
            ]));
        }
        let client = ChatClient::new(provider);
        let config = ChatConfigBuilder::with_credential("sk-test").build();

        for _ in 0..3 {
            let mut stream = client.send_request(&config, "Hi").await.unwrap();
            let mut transcript = String::new();
            while let Some(fragment) = stream.next_fragment().await.unwrap() {
                transcript.push_str(&fragment);
            }
            assert_eq!(transcript, "How are you?");
        }
    }

    #[tokio::test]
    async fn test_error_handling() {
        let mut provider = TestChatProvider::default();
        provider.add_response(PresetResponse::rejected(PresetFailure::Connect));
        provider.set_unhealthy();
        let client = ChatClient::new(provider);
        let config = ChatConfigBuilder::with_credential("sk-test").build();

        let err = client.send_request(&config, "Hi").await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Connect);
        let err = client.check_health().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connect);
    }
}
