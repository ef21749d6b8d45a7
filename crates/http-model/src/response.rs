use std::pin::Pin;
use std::task::{Context, Poll, ready};

use little_chat_model::{ChatResponse, ErrorKind};
use pin_project_lite::pin_project;

use crate::Error;
use crate::io::{TextError, TextFragments};

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextFragment = Result<(Option<String>, TextFragments), Error>;

pin_project! {
    pub struct HttpResponse {
        next_fragment_fut: Option<PinnedFuture<NextFragment>>,
        received_len: usize,
    }
}

impl HttpResponse {
    #[inline]
    pub fn from_text(text: TextFragments) -> Self {
        Self {
            next_fragment_fut: Some(Box::pin(next_fragment(text))),
            received_len: 0,
        }
    }
}

impl ChatResponse for HttpResponse {
    type Error = crate::Error;

    fn poll_next_fragment(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<String>, Self::Error>> {
        let this = self.project();
        let Some(next_fragment_fut) = this.next_fragment_fut else {
            return Poll::Ready(Ok(None));
        };
        let (fragment, text) = match ready!(next_fragment_fut.as_mut().poll(cx))
        {
            Ok((Some(fragment), text)) => (fragment, text),
            Ok((None, _)) => {
                debug!("body finished after {} bytes", this.received_len);
                *this.next_fragment_fut = None;
                return Poll::Ready(Ok(None));
            }
            Err(err) => {
                warn!(
                    "body failed after {} bytes: {err}",
                    this.received_len
                );
                *this.next_fragment_fut = None;
                return Poll::Ready(Err(err));
            }
        };
        *this.received_len += fragment.len();

        // The body may still have more data to pull, create a new future
        // for the next fragment.
        *this.next_fragment_fut = Some(Box::pin(next_fragment(text)));

        Poll::Ready(Ok(Some(fragment)))
    }
}

async fn next_fragment(mut text: TextFragments) -> NextFragment {
    match text.next_fragment().await {
        Ok(fragment) => {
            trace!("got fragment: {fragment:?}");
            Ok((fragment, text))
        }
        Err(TextError::ChunksError(err)) => Err(Error::new(
            format!("connection lost while receiving the reply: {}", err.0),
            ErrorKind::Interrupted,
        )),
        Err(TextError::InvalidUtf8 { offset }) => Err(Error::new(
            format!("reply is not valid UTF-8 at byte {offset}"),
            ErrorKind::Decode,
        )),
        Err(TextError::Truncated) => Err(Error::new(
            "reply ended in the middle of a character",
            ErrorKind::Decode,
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use bytes::Bytes;
    use little_chat_model::ChatProviderError;

    use super::*;
    use crate::io::{Chunks, ChunksError};

    async fn collect(
        chunks: Chunks,
    ) -> (Vec<String>, Option<crate::Error>) {
        let mut resp = pin!(HttpResponse::from_text(TextFragments::new(chunks)));
        let mut fragments = Vec::new();
        loop {
            match poll_fn(|cx| resp.as_mut().poll_next_fragment(cx)).await {
                Ok(Some(fragment)) => fragments.push(fragment),
                Ok(None) => return (fragments, None),
                Err(err) => {
                    // Polling after an error reports completion.
                    let after =
                        poll_fn(|cx| resp.as_mut().poll_next_fragment(cx))
                            .await;
                    assert!(matches!(after, Ok(None)));
                    return (fragments, Some(err));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_simple_fragments() {
        let chunks = Chunks::from_vec_deque(
            vec![
                Bytes::from_static(b"Hi"),
                Bytes::from_static(b" there"),
                Bytes::from_static(b"!"),
            ]
            .into(),
        );
        let (fragments, err) = collect(chunks).await;
        assert_eq!(fragments, ["Hi", " there", "!"]);
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn test_error_kinds() {
        let chunks = Chunks::from_results(
            vec![
                Ok(Bytes::from_static(b"Hi")),
                Err(ChunksError("reset".to_owned())),
            ]
            .into(),
        );
        let (fragments, err) = collect(chunks).await;
        assert_eq!(fragments, ["Hi"]);
        assert_eq!(err.unwrap().kind(), ErrorKind::Interrupted);

        let chunks =
            Chunks::from_vec_deque(vec![Bytes::from_static(b"\xff")].into());
        let (fragments, err) = collect(chunks).await;
        assert!(fragments.is_empty());
        assert_eq!(err.unwrap().kind(), ErrorKind::Decode);
    }
}
