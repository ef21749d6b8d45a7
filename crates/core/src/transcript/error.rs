use super::MessageId;

/// Errors from mutating a [`TranscriptStore`](super::TranscriptStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum TranscriptError {
    /// No message has the given identifier.
    #[error("{0} is not in the transcript")]
    NotFound(MessageId),
    /// The message can no longer be changed.
    #[error("{0} is sealed")]
    Sealed(MessageId),
}
