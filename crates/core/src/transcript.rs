//! The ordered record of a conversation.

mod error;
mod message;

use std::fmt::{self, Debug};

use chrono::Utc;

pub use error::TranscriptError;
pub use message::{Message, MessageId, Role};

type Observer = Box<dyn Fn(&TranscriptEvent<'_>, &[Message]) + Send + Sync>;

/// A change that has just been applied to a transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranscriptEvent<'a> {
    /// A message was added at the end.
    Appended(MessageId),
    /// Text was added to the end of a streaming message.
    ContentAppended {
        /// The message that grew.
        id: MessageId,
        /// The text that was added.
        fragment: &'a str,
    },
    /// A message stopped streaming.
    Sealed(MessageId),
    /// A message was removed.
    Removed(MessageId),
    /// All messages were removed.
    Cleared,
}

/// The store that owns every message of a conversation.
///
/// Messages are kept in insertion order, which is also the order of their
/// identifiers. Every mutation is visible to [`snapshot`](Self::snapshot)
/// as soon as the method returns, and observers are notified right after
/// the change with the updated snapshot.
pub struct TranscriptStore {
    messages: Vec<Message>,
    next_id: u64,
    observers: Vec<Observer>,
}

impl TranscriptStore {
    /// Creates an empty transcript.
    #[inline]
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            observers: Vec::new(),
        }
    }

    /// Registers a callback invoked after every mutation.
    pub fn observe(
        &mut self,
        observer: impl Fn(&TranscriptEvent<'_>, &[Message]) + Send + Sync + 'static,
    ) {
        self.observers.push(Box::new(observer));
    }

    /// Appends a complete message and returns its identifier.
    ///
    /// The content of the message can never change afterwards.
    pub fn append<S: Into<String>>(&mut self, role: Role, content: S) -> MessageId {
        self.push(role, content.into(), false)
    }

    /// Appends an empty assistant message whose content will grow with
    /// [`append_to_content`](Self::append_to_content) until sealed.
    pub fn append_placeholder(&mut self) -> MessageId {
        self.push(Role::Assistant, String::new(), true)
    }

    /// Appends `fragment` to the content of a streaming message.
    pub fn append_to_content(
        &mut self,
        id: MessageId,
        fragment: &str,
    ) -> Result<(), TranscriptError> {
        let msg = self.find_mut(id)?;
        if !msg.streaming {
            return Err(TranscriptError::Sealed(id));
        }
        msg.content.push_str(fragment);
        self.notify(&TranscriptEvent::ContentAppended { id, fragment });
        Ok(())
    }

    /// Freezes the content of a message. Sealing a message twice is fine.
    pub fn seal(&mut self, id: MessageId) -> Result<(), TranscriptError> {
        let msg = self.find_mut(id)?;
        if !msg.streaming {
            return Ok(());
        }
        msg.streaming = false;
        self.notify(&TranscriptEvent::Sealed(id));
        Ok(())
    }

    /// Removes a message, returning it if it was present.
    ///
    /// Removing an absent message does nothing.
    pub fn remove(&mut self, id: MessageId) -> Option<Message> {
        let idx = self.position(id)?;
        let msg = self.messages.remove(idx);
        self.notify(&TranscriptEvent::Removed(id));
        Some(msg)
    }

    /// Removes all messages. Identifiers are not reused afterwards.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.notify(&TranscriptEvent::Cleared);
    }

    /// Returns the messages in conversation order.
    #[inline]
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the message with the given identifier.
    #[inline]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.position(id).map(|idx| &self.messages[idx])
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if there are no messages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, role: Role, content: String, streaming: bool) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            role,
            content,
            timestamp: Utc::now(),
            streaming,
        });
        self.notify(&TranscriptEvent::Appended(id));
        id
    }

    #[inline]
    fn position(&self, id: MessageId) -> Option<usize> {
        // Identifiers grow with insertion order, and removal keeps order.
        self.messages.binary_search_by_key(&id, |msg| msg.id).ok()
    }

    #[inline]
    fn find_mut(&mut self, id: MessageId) -> Result<&mut Message, TranscriptError> {
        let idx = self.position(id).ok_or(TranscriptError::NotFound(id))?;
        Ok(&mut self.messages[idx])
    }

    fn notify(&self, event: &TranscriptEvent<'_>) {
        trace!("transcript changed: {event:?}");
        for observer in &self.observers {
            observer(event, &self.messages);
        }
    }
}

impl Default for TranscriptStore {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for TranscriptStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptStore")
            .field("messages", &self.messages)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_append_and_grow() {
        let mut store = TranscriptStore::new();
        let user = store.append(Role::User, "Hello");
        let reply = store.append_placeholder();
        assert!(user < reply);

        store.append_to_content(reply, "Hi").unwrap();
        store.append_to_content(reply, " there").unwrap();
        assert_eq!(store.get(reply).unwrap().content(), "Hi there");
        assert!(store.get(reply).unwrap().is_streaming());

        store.seal(reply).unwrap();
        assert!(!store.get(reply).unwrap().is_streaming());
        assert_eq!(
            store.append_to_content(reply, "!"),
            Err(TranscriptError::Sealed(reply))
        );
        assert_eq!(
            store.append_to_content(user, "!"),
            Err(TranscriptError::Sealed(user))
        );

        let roles: Vec<_> = store.snapshot().iter().map(Message::role).collect();
        assert_eq!(roles, [Role::User, Role::Assistant]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = TranscriptStore::new();
        let first = store.append(Role::User, "a");
        let second = store.append_placeholder();
        let third = store.append(Role::User, "b");

        assert_eq!(store.remove(second).map(|m| m.id()), Some(second));
        assert_eq!(store.remove(second), None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(first).unwrap().content(), "a");
        assert_eq!(store.get(third).unwrap().content(), "b");
        assert_eq!(
            store.append_to_content(second, "late"),
            Err(TranscriptError::NotFound(second))
        );
    }

    #[test]
    fn test_ids_survive_clear() {
        let mut store = TranscriptStore::new();
        let before = store.append(Role::User, "a");
        store.clear();
        assert!(store.is_empty());
        let after = store.append(Role::User, "b");
        assert!(after > before);
    }

    #[test]
    fn test_observers_see_every_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = TranscriptStore::new();
        store.observe({
            let seen = Arc::clone(&seen);
            move |event, messages| {
                let line = match event {
                    TranscriptEvent::Appended(id) => format!("+{id}"),
                    TranscriptEvent::ContentAppended { id, fragment } => {
                        format!("{id}<{fragment}")
                    }
                    TranscriptEvent::Sealed(id) => format!("#{id}"),
                    TranscriptEvent::Removed(id) => format!("-{id}"),
                    TranscriptEvent::Cleared => "clear".to_owned(),
                };
                seen.lock().unwrap().push((line, messages.len()));
            }
        });

        let reply = store.append_placeholder();
        store.append_to_content(reply, "x").unwrap();
        store.seal(reply).unwrap();
        store.seal(reply).unwrap();
        store.remove(reply);
        store.remove(reply);
        store.clear();

        assert_eq!(
            *seen.lock().unwrap(),
            [
                ("+msg:1".to_owned(), 1),
                ("msg:1<x".to_owned(), 1),
                ("#msg:1".to_owned(), 1),
                ("-msg:1".to_owned(), 0),
                ("clear".to_owned(), 0),
            ]
        );
    }
}
