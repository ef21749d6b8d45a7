use std::borrow::Cow;

use little_chat_model::{ChatProviderError, ErrorKind};

use crate::transcript::{MessageId, TranscriptError};

/// How a turn ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply arrived completely; the assistant message is sealed.
    Success(MessageId),
    /// The reply completed without any text; no assistant message is left.
    EmptyResponse,
    /// The turn failed.
    Error(TurnError),
}

impl TurnOutcome {
    /// Returns `true` if the turn succeeded.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, TurnOutcome::Success(_))
    }

    /// Returns the text to show to the user, or `None` on success.
    pub fn user_message(&self) -> Option<Cow<'static, str>> {
        match self {
            TurnOutcome::Success(_) => None,
            TurnOutcome::EmptyResponse => Some(Cow::Borrowed(
                "No response received from the AI. Please try again.",
            )),
            TurnOutcome::Error(err) => Some(err.user_message()),
        }
    }
}

/// Errors that end a turn.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// No credential was configured; nothing was sent or recorded.
    #[error("no credential is configured")]
    MissingCredential,
    /// The request failed before the reply started.
    #[error("request failed: {message}")]
    Transport {
        /// What went wrong.
        kind: ErrorKind,
        /// Description from the provider.
        message: String,
    },
    /// The reply broke off after it started.
    #[error("reply broke off: {message}")]
    Stream {
        /// What went wrong.
        kind: ErrorKind,
        /// Description from the provider.
        message: String,
        /// The assistant message holding the text received before the
        /// failure, if there was any.
        partial: Option<MessageId>,
    },
    /// The transcript refused a change.
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

impl TurnError {
    pub(crate) fn transport(err: &dyn ChatProviderError) -> Self {
        TurnError::Transport {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub(crate) fn stream(
        err: &dyn ChatProviderError,
        partial: Option<MessageId>,
    ) -> Self {
        TurnError::Stream {
            kind: err.kind(),
            message: err.to_string(),
            partial,
        }
    }

    /// Returns the text to show to the user.
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            TurnError::MissingCredential => {
                Cow::Borrowed("Please enter your API key in settings.")
            }
            TurnError::Transport {
                kind: ErrorKind::Connect,
                ..
            } => Cow::Borrowed(
                "Backend server is not reachable. Please make sure it is running.",
            ),
            TurnError::Transport { message, .. } => {
                Cow::Owned(format!("Failed to send message: {message}"))
            }
            TurnError::Stream { message, .. } => {
                Cow::Owned(format!("The reply was interrupted: {message}"))
            }
            TurnError::Transcript(err) => Cow::Owned(format!("{err}")),
        }
    }
}
