use std::fmt::{self, Debug, Formatter};

/// The model used when none is specified.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// The system instruction used when none is specified.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful AI assistant.";

/// Builder for [`ChatConfig`].
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ChatConfigBuilder {
    credential: String,
    model: Option<String>,
    system_instruction: Option<String>,
}

impl ChatConfigBuilder {
    /// Creates a builder with the given credential.
    #[inline]
    pub fn with_credential<S: Into<String>>(credential: S) -> Self {
        Self {
            credential: credential.into(),
            model: None,
            system_instruction: None,
        }
    }

    /// Sets the model to use.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the system instruction sent along with every message.
    #[inline]
    pub fn with_system_instruction<S: Into<String>>(
        mut self,
        instruction: S,
    ) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> ChatConfig {
        ChatConfig {
            credential: self.credential,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            system_instruction: self
                .system_instruction
                .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_owned()),
        }
    }
}

impl Debug for ChatConfigBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfigBuilder")
            .field("credential", &"<deducted>")
            .field("model", &self.model)
            .field("system_instruction", &self.system_instruction)
            .finish()
    }
}

/// The per-conversation configuration, assembled from user-editable
/// settings.
///
/// All fields are opaque strings. The credential is passed through to the
/// provider on every request and is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ChatConfig {
    credential: String,
    model: String,
    system_instruction: String,
}

impl ChatConfig {
    /// Returns the credential.
    #[inline]
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Returns `true` if a non-blank credential is set.
    #[inline]
    pub fn has_credential(&self) -> bool {
        !self.credential.trim().is_empty()
    }

    /// Returns the model identifier.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the system instruction.
    #[inline]
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Replaces the credential.
    #[inline]
    pub fn set_credential<S: Into<String>>(&mut self, credential: S) {
        self.credential = credential.into();
    }

    /// Replaces the model identifier.
    #[inline]
    pub fn set_model<S: Into<String>>(&mut self, model: S) {
        self.model = model.into();
    }

    /// Replaces the system instruction.
    #[inline]
    pub fn set_system_instruction<S: Into<String>>(&mut self, instruction: S) {
        self.system_instruction = instruction.into();
    }
}

impl Default for ChatConfig {
    #[inline]
    fn default() -> Self {
        ChatConfigBuilder::default().build()
    }
}

impl Debug for ChatConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("credential", &"<deducted>")
            .field("model", &self.model)
            .field("system_instruction", &self.system_instruction)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatConfigBuilder::with_credential("sk-test").build();
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.system_instruction(), DEFAULT_SYSTEM_INSTRUCTION);
        assert!(config.has_credential());
    }

    #[test]
    fn test_blank_credential() {
        let config = ChatConfigBuilder::with_credential("   ").build();
        assert!(!config.has_credential());
        assert!(!ChatConfig::default().has_credential());
    }

    #[test]
    fn test_debug_hides_credential() {
        let config = ChatConfigBuilder::with_credential("sk-secret")
            .with_model("gpt-4.1-nano")
            .build();
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("gpt-4.1-nano"));
    }
}
