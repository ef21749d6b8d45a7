use std::fmt::{self, Display};

use chrono::{DateTime, Utc};

/// Identifies a message within a transcript.
///
/// Identifiers are assigned in increasing order and are never reused by
/// the transcript that assigned them, even after the message is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub(crate) u64);

impl Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}

/// Who wrote a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person typing.
    User,
    /// The remote text generator.
    Assistant,
}

/// A message in the transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub(crate) id: MessageId,
    pub(crate) role: Role,
    pub(crate) content: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) streaming: bool,
}

impl Message {
    /// Returns the identifier of this message.
    #[inline]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the author of this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text received so far.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when this message was created.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns `true` while the reply for this message is still arriving.
    ///
    /// Only the placeholder of an unresolved turn is streaming.
    #[inline]
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }
}
