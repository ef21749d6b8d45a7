//! User-editable settings.

use std::env;

use little_chat_http::{BackendConfig, BackendConfigBuilder};
use little_chat_model::{ChatConfig, ChatConfigBuilder};

/// Models offered to the user, with their display names.
pub const KNOWN_MODELS: &[(&str, &str)] = &[
    ("gpt-4.1-mini", "GPT-4.1 Mini"),
    ("gpt-4.1-nano", "GPT-4.1 Nano"),
    ("gpt-3.5-turbo", "GPT-3.5 Turbo"),
];

/// Everything the user can configure.
///
/// The credential only lives in memory for the duration of the process.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    /// Sent along with every turn.
    pub chat: ChatConfig,
    /// Where the backend lives.
    pub backend: BackendConfig,
}

impl Settings {
    /// Reads the initial settings from the environment.
    ///
    /// - `LITTLE_CHAT_API_KEY`, or `OPENAI_API_KEY` if unset
    /// - `LITTLE_CHAT_BASE_URL`
    /// - `LITTLE_CHAT_MODEL`
    /// - `LITTLE_CHAT_SYSTEM_PROMPT`
    ///
    /// Unset or empty variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let credential = var("LITTLE_CHAT_API_KEY")
            .or_else(|| var("OPENAI_API_KEY"))
            .unwrap_or_default();
        let mut chat = ChatConfigBuilder::with_credential(credential);
        if let Some(model) = var("LITTLE_CHAT_MODEL") {
            chat = chat.with_model(model);
        }
        if let Some(prompt) = var("LITTLE_CHAT_SYSTEM_PROMPT") {
            chat = chat.with_system_instruction(prompt);
        }

        let backend = match var("LITTLE_CHAT_BASE_URL") {
            Some(base_url) => BackendConfigBuilder::with_base_url(base_url),
            None => BackendConfigBuilder::default(),
        };

        Self {
            chat: chat.build(),
            backend: backend.build(),
        }
    }

    /// Returns the credential with everything but the last four
    /// characters hidden.
    pub fn masked_credential(&self) -> String {
        if !self.chat.has_credential() {
            return "(not set)".to_owned();
        }
        let credential = self.chat.credential();
        let len = credential.chars().count();
        // Short keys are hidden completely.
        let visible = if len > 8 { 4 } else { 0 };
        let tail: String = credential.chars().skip(len - visible).collect();
        format!("{}{tail}", "*".repeat(len - visible))
    }
}

/// Returns the display name of a known model.
pub fn model_display_name(model: &str) -> Option<&'static str> {
    KNOWN_MODELS
        .iter()
        .find(|(id, _)| *id == model)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use little_chat_http::DEFAULT_BASE_URL;
    use little_chat_model::{DEFAULT_MODEL, DEFAULT_SYSTEM_INSTRUCTION};

    use super::*;

    fn settings_from(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]);
        assert!(!settings.chat.has_credential());
        assert_eq!(settings.chat.model(), DEFAULT_MODEL);
        assert_eq!(
            settings.chat.system_instruction(),
            DEFAULT_SYSTEM_INSTRUCTION
        );
        assert_eq!(settings.backend.base_url(), DEFAULT_BASE_URL);
        assert_eq!(settings.masked_credential(), "(not set)");
    }

    #[test]
    fn test_from_env() {
        let settings = settings_from(&[
            ("OPENAI_API_KEY", "sk-fallback"),
            ("LITTLE_CHAT_MODEL", "gpt-4.1-nano"),
            ("LITTLE_CHAT_SYSTEM_PROMPT", "Be terse."),
            ("LITTLE_CHAT_BASE_URL", "http://10.0.0.2:9000/"),
        ]);
        assert_eq!(settings.chat.credential(), "sk-fallback");
        assert_eq!(settings.chat.model(), "gpt-4.1-nano");
        assert_eq!(settings.chat.system_instruction(), "Be terse.");
        assert_eq!(settings.backend.base_url(), "http://10.0.0.2:9000");

        let settings = settings_from(&[
            ("OPENAI_API_KEY", "sk-fallback"),
            ("LITTLE_CHAT_API_KEY", "sk-preferred"),
            ("LITTLE_CHAT_MODEL", " "),
        ]);
        assert_eq!(settings.chat.credential(), "sk-preferred");
        assert_eq!(settings.chat.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_masked_credential() {
        let settings =
            settings_from(&[("LITTLE_CHAT_API_KEY", "sk-abcdef123456")]);
        assert_eq!(settings.masked_credential(), "***********3456");

        let settings = settings_from(&[("LITTLE_CHAT_API_KEY", "short")]);
        assert_eq!(settings.masked_credential(), "*****");
    }

    #[test]
    fn test_model_display_name() {
        assert_eq!(model_display_name("gpt-4.1-nano"), Some("GPT-4.1 Nano"));
        assert_eq!(model_display_name("custom"), None);
    }
}
