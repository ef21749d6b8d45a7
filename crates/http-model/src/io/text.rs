use std::str;

use super::{Chunks, ChunksError};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ChunksError(ChunksError),
    /// Bytes that can never form valid UTF-8, at the given offset of the
    /// body.
    InvalidUtf8 { offset: usize },
    /// The body ended in the middle of a multi-byte character.
    Truncated,
}

/// A type for decoding UTF-8 text fragments from a chunk stream.
///
/// Every chunk becomes one fragment. When a multi-byte character is split
/// across two chunks, its leading bytes are held back and prepended to the
/// next chunk, so a chunk consisting only of such bytes yields nothing.
pub struct TextFragments {
    chunks: Chunks,
    // At most 3 bytes of an incomplete character.
    pending: Vec<u8>,
    consumed: usize,
    finished: bool,
}

impl TextFragments {
    #[inline]
    pub fn new(chunks: Chunks) -> Self {
        Self {
            chunks,
            pending: Vec::new(),
            consumed: 0,
            finished: false,
        }
    }

    pub async fn next_fragment(&mut self) -> Result<Option<String>, Error> {
        while !self.finished {
            let Some(bytes) =
                self.chunks.next_chunk().await.map_err(|err| {
                    self.finished = true;
                    Error::ChunksError(err)
                })?
            else {
                self.finished = true;
                if !self.pending.is_empty() {
                    return Err(Error::Truncated);
                }
                break;
            };

            self.pending.extend_from_slice(&bytes);
            if let Some(fragment) = self.take_decoded()? {
                return Ok(Some(fragment));
            }
        }
        Ok(None)
    }

    /// Decodes the longest valid prefix of the pending bytes.
    fn take_decoded(&mut self) -> Result<Option<String>, Error> {
        let valid = match str::from_utf8(&self.pending) {
            Ok(text) => text,
            // An incomplete character at the end waits for the next chunk.
            Err(err) if err.error_len().is_none() => {
                str::from_utf8(&self.pending[..err.valid_up_to()])
                    .unwrap_or_default()
            }
            Err(err) => {
                self.finished = true;
                return Err(Error::InvalidUtf8 {
                    offset: self.consumed + err.valid_up_to(),
                });
            }
        };
        if valid.is_empty() {
            return Ok(None);
        }

        let fragment = valid.to_owned();
        self.pending.drain(..fragment.len());
        self.consumed += fragment.len();
        Ok(Some(fragment))
    }
}
