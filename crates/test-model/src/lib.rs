//! A local fake chat backend for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use little_chat_model::{
    ChatConfig, ChatProvider, ChatProviderError, ChatResponse, ErrorKind,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ChatProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A request the provider has received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub config: ChatConfig,
    pub user_text: String,
}

pub struct TestChatResponse {
    events: VecDeque<PresetEvent>,
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
    finished: bool,
}

impl ChatResponse for TestChatResponse {
    type Error = crate::Error;

    fn poll_next_fragment(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<String>, Self::Error>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(Ok(None));
        }

        if let Some(sleep) = &mut this.sleep {
            ready!(sleep.as_mut().poll(cx));
            this.sleep = None;

            return match this.events.pop_front() {
                Some(PresetEvent::Fragment(fragment)) => {
                    Poll::Ready(Ok(Some(fragment)))
                }
                Some(PresetEvent::Failure(failure)) => {
                    this.finished = true;
                    Poll::Ready(Err(Error::new(
                        format!("simulated {failure:?} failure"),
                        failure.kind(),
                    )))
                }
                None => {
                    this.finished = true;
                    Poll::Ready(Ok(None))
                }
            };
        }
        this.sleep = Some(Box::pin(sleep(this.delay)));
        Pin::new(this).poll_next_fragment(cx)
    }
}

/// A local fake backend for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// backend should respond. Every request consumes the next preset response
/// in the order they were added. If the script runs out, the request fails
/// with [`ErrorKind::Other`].
///
/// Clones share the same script and request log, so a test can keep one
/// clone for inspection after handing the other to the code under test.
#[derive(Clone, Default)]
pub struct TestChatProvider {
    script: Arc<Mutex<VecDeque<PresetResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    delay: Option<Duration>,
    unhealthy: bool,
}

impl TestChatProvider {
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        lock(&self.script).push_back(preset);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    #[inline]
    pub fn set_unhealthy(&mut self) {
        self.unhealthy = true;
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }
}

impl Debug for TestChatProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestChatProvider")
            .field("remaining", &lock(&self.script).len())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl ChatProvider for TestChatProvider {
    type Error = crate::Error;
    type Response = TestChatResponse;

    fn send_request(
        &self,
        config: &ChatConfig,
        user_text: &str,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        lock(&self.requests).push(RecordedRequest {
            config: config.clone(),
            user_text: user_text.to_owned(),
        });

        let result = match lock(&self.script).pop_front() {
            None => Err(Error::new("no enough preset responses", ErrorKind::Other)),
            Some(PresetResponse {
                rejection: Some(failure),
                ..
            }) => Err(Error::new(
                format!("simulated {failure:?} rejection"),
                failure.kind(),
            )),
            Some(PresetResponse { events, .. }) => Ok(TestChatResponse {
                events: events.into(),
                delay: self.delay.unwrap_or(Duration::from_millis(1)),
                sleep: None,
                finished: false,
            }),
        };
        ready(result)
    }

    fn check_health(
        &self,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static {
        let result = if self.unhealthy {
            Err(Error::new("backend is down", ErrorKind::Connect))
        } else {
            Ok(())
        };
        ready(result)
    }
}

#[inline]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use little_chat_model::ChatConfigBuilder;

    use super::*;

    async fn collect_response(
        resp: TestChatResponse,
    ) -> (Vec<String>, Option<Error>) {
        let mut resp = pin!(resp);
        let mut fragments = Vec::new();
        loop {
            match poll_fn(|cx| resp.as_mut().poll_next_fragment(cx)).await {
                Ok(Some(fragment)) => fragments.push(fragment),
                Ok(None) => return (fragments, None),
                Err(err) => return (fragments, Some(err)),
            }
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestChatProvider::default();
        provider.add_response(PresetResponse::with_fragments([
            "Hello, ", "world!",
        ]));
        provider.add_response(
            PresetResponse::with_fragments(["Sure, "])
                .then_fail(PresetFailure::Interrupted),
        );
        provider.add_response(PresetResponse::rejected(PresetFailure::Status));

        let config = ChatConfigBuilder::with_credential("sk-test").build();

        let resp = provider.send_request(&config, "Hi").await.unwrap();
        let (fragments, err) = collect_response(resp).await;
        assert_eq!(fragments.concat(), "Hello, world!");
        assert!(err.is_none());

        let resp = provider.send_request(&config, "Again").await.unwrap();
        let (fragments, err) = collect_response(resp).await;
        assert_eq!(fragments, ["Sure, "]);
        assert_eq!(err.unwrap().kind(), ErrorKind::Interrupted);

        let err = provider.send_request(&config, "Once more").await.err();
        assert_eq!(err.unwrap().kind(), ErrorKind::Status);

        let err = provider.send_request(&config, "Too many").await.err();
        assert_eq!(err.unwrap().kind(), ErrorKind::Other);

        let requests = provider.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].user_text, "Hi");
        assert_eq!(requests[0].config, config);
    }

    #[tokio::test]
    async fn test_health() {
        let mut provider = TestChatProvider::default();
        assert!(provider.check_health().await.is_ok());
        provider.set_unhealthy();
        assert!(provider.check_health().await.is_err());
    }
}
