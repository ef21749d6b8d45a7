//! Core logic: the transcript, and the turn loop that streams replies
//! into it.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod chat_client;
pub mod conversation;
pub mod transcript;

pub use chat_client::BoxedError;
pub use conversation::{
    Conversation, ConversationBuilder, TurnError, TurnOutcome,
};
pub use transcript::{
    Message, MessageId, Role, TranscriptError, TranscriptEvent,
    TranscriptStore,
};
