use crate::transcript::{MessageId, TranscriptError, TranscriptStore};

/// The placeholder of a turn that has not resolved yet.
///
/// Holding the transcript exclusively for the whole turn is what keeps a
/// second turn from starting. If the turn is dropped without being
/// resolved (the caller abandoned the future), the placeholder is settled
/// the same way as after a broken reply.
pub(crate) struct PendingTurn<'a> {
    transcript: &'a mut TranscriptStore,
    placeholder: MessageId,
    has_content: bool,
    resolved: bool,
}

impl<'a> PendingTurn<'a> {
    #[inline]
    pub fn start(transcript: &'a mut TranscriptStore) -> Self {
        let placeholder = transcript.append_placeholder();
        Self {
            transcript,
            placeholder,
            has_content: false,
            resolved: false,
        }
    }

    #[inline]
    pub fn placeholder(&self) -> MessageId {
        self.placeholder
    }

    pub fn append(&mut self, fragment: &str) -> Result<(), TranscriptError> {
        if fragment.is_empty() {
            trace!("skipping empty fragment");
            return Ok(());
        }
        self.transcript.append_to_content(self.placeholder, fragment)?;
        self.has_content = true;
        Ok(())
    }

    /// Removes the placeholder unconditionally.
    pub fn discard(mut self) {
        self.resolved = true;
        self.transcript.remove(self.placeholder);
    }

    /// Seals the placeholder if it received any text, or removes it.
    /// Returns the identifier of the kept message.
    pub fn settle(mut self) -> Option<MessageId> {
        self.settle_in_place()
    }

    fn settle_in_place(&mut self) -> Option<MessageId> {
        self.resolved = true;
        if !self.has_content {
            self.transcript.remove(self.placeholder);
            return None;
        }
        if let Err(err) = self.transcript.seal(self.placeholder) {
            warn!("cannot seal the reply: {err}");
        }
        Some(self.placeholder)
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            debug!("turn abandoned with {} unresolved", self.placeholder);
            self.settle_in_place();
        }
    }
}
