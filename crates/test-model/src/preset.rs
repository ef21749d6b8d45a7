use little_chat_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// A failure that a preset response can simulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetFailure {
    /// The backend cannot be reached.
    Connect,
    /// The backend rejects the request.
    Status,
    /// The connection drops in the middle of the reply.
    Interrupted,
    /// The reply contains bytes that are not text.
    Decode,
}

impl PresetFailure {
    /// Returns the error kind the provider reports for this failure.
    #[inline]
    pub fn kind(self) -> ErrorKind {
        match self {
            PresetFailure::Connect => ErrorKind::Connect,
            PresetFailure::Status => ErrorKind::Status,
            PresetFailure::Interrupted => ErrorKind::Interrupted,
            PresetFailure::Decode => ErrorKind::Decode,
        }
    }
}

/// The events in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEvent {
    #[serde(rename = "fragment")]
    Fragment(String),
    #[serde(rename = "failure")]
    Failure(PresetFailure),
}

/// The preset response for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Events in this response.
    pub events: Vec<PresetEvent>,
    /// If set, the request itself fails and no response is produced.
    pub rejection: Option<PresetFailure>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` that streams the given fragments.
    #[inline]
    pub fn with_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: fragments
                .into_iter()
                .map(|f| PresetEvent::Fragment(f.into()))
                .collect(),
            rejection: None,
        }
    }

    /// Creates a `PresetResponse` whose request fails before streaming.
    #[inline]
    pub fn rejected(failure: PresetFailure) -> Self {
        Self {
            events: vec![],
            rejection: Some(failure),
        }
    }

    /// Appends a failure after the events added so far.
    #[inline]
    pub fn then_fail(mut self, failure: PresetFailure) -> Self {
        self.events.push(PresetEvent::Failure(failure));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let response = PresetResponse::with_fragments(["Hi", " there"])
            .then_fail(PresetFailure::Interrupted);

        let serialized = serde_json::to_string(&response).unwrap();
        let deserialized: PresetResponse =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(response, deserialized);
    }

    #[test]
    fn test_deserialize_script() {
        let response: PresetResponse = serde_json::from_str(
            r#"{
                "events": [
                    { "type": "fragment", "data": "Hello" },
                    { "type": "failure", "data": "decode" }
                ],
                "rejection": null
            }"#,
        )
        .unwrap();
        assert_eq!(
            response.events,
            [
                PresetEvent::Fragment("Hello".to_owned()),
                PresetEvent::Failure(PresetFailure::Decode),
            ]
        );
    }
}
