use little_chat_model::ChatProvider;

use super::Conversation;
use crate::chat_client::ChatClient;
use crate::transcript::{Message, TranscriptEvent, TranscriptStore};

/// [`Conversation`] builder.
pub struct ConversationBuilder {
    pub(crate) client: ChatClient,
    pub(crate) transcript: TranscriptStore,
}

impl ConversationBuilder {
    /// Creates a new builder with the specified chat provider.
    #[inline]
    pub fn with_provider<P: ChatProvider + 'static>(provider: P) -> Self {
        Self {
            client: ChatClient::new(provider),
            transcript: TranscriptStore::new(),
        }
    }

    /// Attaches a callback to be invoked after every transcript change.
    #[inline]
    pub fn on_change(
        mut self,
        on_change: impl Fn(&TranscriptEvent<'_>, &[Message])
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.transcript.observe(on_change);
        self
    }

    /// Builds the conversation.
    #[inline]
    pub fn build(self) -> Conversation {
        Conversation {
            client: self.client,
            transcript: self.transcript,
            last_outcome: None,
        }
    }
}
