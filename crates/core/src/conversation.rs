//! Turn orchestration.

mod builder;
mod outcome;
mod turn;

use little_chat_model::{ChatConfig, ChatProvider};
use tracing::Instrument;

pub use builder::ConversationBuilder;
pub use outcome::{TurnError, TurnOutcome};
use turn::PendingTurn;

use crate::chat_client::{BoxedError, ChatClient};
use crate::transcript::{Message, MessageId, Role, TranscriptStore};

/// A conversation with a chat backend.
///
/// The conversation owns the transcript and runs one turn at a time: each
/// [`submit_turn`](Self::submit_turn) records the user's message, streams
/// the reply into a placeholder message and resolves it into a
/// [`TurnOutcome`].
#[derive(Debug)]
pub struct Conversation {
    client: ChatClient,
    transcript: TranscriptStore,
    last_outcome: Option<TurnOutcome>,
}

impl Conversation {
    /// Creates a conversation without any observers.
    #[inline]
    pub fn new<P: ChatProvider + 'static>(provider: P) -> Self {
        ConversationBuilder::with_provider(provider).build()
    }

    /// Returns the transcript.
    #[inline]
    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    /// Returns the messages in conversation order.
    #[inline]
    pub fn snapshot(&self) -> &[Message] {
        self.transcript.snapshot()
    }

    /// Returns the outcome of the most recently resolved turn.
    #[inline]
    pub fn last_outcome(&self) -> Option<&TurnOutcome> {
        self.last_outcome.as_ref()
    }

    /// Removes all messages and forgets the last outcome.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.last_outcome = None;
    }

    /// Probes whether the backend is reachable. The result doesn't affect
    /// how turns are handled.
    #[inline]
    pub async fn check_health(&self) -> Result<(), BoxedError> {
        self.client.check_health().await
    }

    /// Runs one turn: sends `user_text` and streams the reply into the
    /// transcript.
    ///
    /// The user's message is recorded before anything is sent, and it stays
    /// in the transcript whatever happens afterwards, unless the config has
    /// no credential, in which case the turn is rejected without touching
    /// the transcript. The reply is recorded in a placeholder message that
    /// grows with every fragment. It is removed if the request fails before
    /// the reply starts, or if the reply ends without any text; when the
    /// reply breaks off midway, the text received so far is kept.
    ///
    /// # Cancel safety
    ///
    /// Dropping the returned future stops receiving the reply. The
    /// placeholder is then kept with the text received so far, or removed if
    /// there was none.
    pub async fn submit_turn(
        &mut self,
        user_text: &str,
        config: &ChatConfig,
    ) -> TurnOutcome {
        let outcome = match self
            .run_turn(user_text, config)
            .instrument(debug_span!("turn", model = config.model()))
            .await
        {
            Ok(Some(id)) => TurnOutcome::Success(id),
            Ok(None) => TurnOutcome::EmptyResponse,
            Err(err) => TurnOutcome::Error(err),
        };
        debug!("turn resolved: {outcome:?}");
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    async fn run_turn(
        &mut self,
        user_text: &str,
        config: &ChatConfig,
    ) -> Result<Option<MessageId>, TurnError> {
        if !config.has_credential() {
            warn!("rejecting a turn without credential");
            return Err(TurnError::MissingCredential);
        }

        let user_id = self.transcript.append(Role::User, user_text);
        let mut turn = PendingTurn::start(&mut self.transcript);
        debug!("turn started: {user_id} -> {}", turn.placeholder());

        let mut stream = match self.client.send_request(config, user_text).await
        {
            Ok(stream) => stream,
            Err(err) => {
                turn.discard();
                return Err(TurnError::transport(&*err));
            }
        };

        loop {
            let fragment = match stream.next_fragment().await {
                Ok(Some(fragment)) => fragment,
                Ok(None) => break,
                Err(err) => {
                    error!("reply broke off: {err}");
                    let partial = turn.settle();
                    return Err(TurnError::stream(&*err, partial));
                }
            };
            trace!("got fragment: {fragment:?}");
            turn.append(&fragment)?;
        }

        Ok(turn.settle())
    }
}
