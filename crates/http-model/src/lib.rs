//! A chat provider that talks to the companion HTTP backend.
//!
//! The backend accepts a JSON request at `/api/chat` and streams the reply
//! back as a chunked plain-text body. Each body chunk is decoded as UTF-8
//! and surfaced as one fragment.

#[macro_use]
extern crate tracing;

mod config;
mod io;
mod proto;
mod response;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use little_chat_model::{ChatConfig, ChatProvider, ChatProviderError, ErrorKind};
use mime::Mime;
use reqwest::{Client, Response, header};

pub use config::{BackendConfig, BackendConfigBuilder, DEFAULT_BASE_URL};
use io::{Chunks, TextFragments};
pub use response::HttpResponse;

/// Error type for [`HttpProvider`].
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

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() || err.is_timeout() {
            ErrorKind::Connect
        } else if err.is_status() {
            ErrorKind::Status
        } else {
            ErrorKind::Other
        };
        Self::new(format!("{err}"), kind)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
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

/// Chat provider backed by the HTTP backend.
#[derive(Clone, Debug)]
pub struct HttpProvider {
    client: Client,
    config: Arc<BackendConfig>,
}

impl HttpProvider {
    /// Creates a new `HttpProvider` with the given configuration.
    #[inline]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ChatProvider for HttpProvider {
    type Error = Error;
    type Response = HttpResponse;

    fn send_request(
        &self,
        config: &ChatConfig,
        user_text: &str,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let body = proto::create_request(config, user_text);
        trace!("sending request: {body:?}");
        let resp_fut = self
            .client
            .post(self.config.chat_url())
            .header(header::ACCEPT, "text/plain")
            .json(&body)
            .send();

        async move {
            let resp = resp_fut
                .await
                .and_then(Response::error_for_status)
                .map_err(Error::from_reqwest)?;

            check_content_type(&resp)?;

            // Here we got a successful response.
            let chunks = Chunks::from_response(resp);
            Ok(HttpResponse::from_text(TextFragments::new(chunks)))
        }
    }

    fn check_health(
        &self,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static {
        let resp_fut = self.client.get(self.config.health_url()).send();
        async move {
            resp_fut
                .await
                .and_then(Response::error_for_status)
                .map_err(Error::from_reqwest)?;
            Ok(())
        }
    }
}

/// Accepts a missing content type, or any `text/*` type whose charset (if
/// given) is UTF-8.
fn check_content_type(resp: &Response) -> Result<(), Error> {
    let Some(content_type) = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(());
    };
    validate_content_type(content_type)
}

fn validate_content_type(content_type: &str) -> Result<(), Error> {
    let unexpected = || {
        Error::new(
            format!("Unexpected content type: {content_type:?}"),
            ErrorKind::Decode,
        )
    };
    let mime = content_type.parse::<Mime>().map_err(|_| unexpected())?;
    if mime.type_() != mime::TEXT {
        return Err(unexpected());
    }
    match mime.get_param(mime::CHARSET) {
        Some(charset) if charset != mime::UTF_8 => Err(Error::new(
            format!("Unsupported charset: {charset}"),
            ErrorKind::Decode,
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_type() {
        assert!(validate_content_type("text/plain").is_ok());
        assert!(validate_content_type("text/plain; charset=utf-8").is_ok());
        assert!(validate_content_type("text/event-stream").is_ok());

        let err = validate_content_type("application/json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        let err =
            validate_content_type("text/plain; charset=latin1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        let err = validate_content_type("not a mime").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
