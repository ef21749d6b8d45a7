use little_chat_model::ChatConfig;
use serde::Serialize;

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChatRequestBody<'a> {
    developer_message: &'a str,
    user_message: &'a str,
    model: &'a str,
    api_key: &'a str,
}

// Hand-written so that the key never shows up in traces.
impl std::fmt::Debug for ChatRequestBody<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRequestBody")
            .field("developer_message", &self.developer_message)
            .field("user_message", &self.user_message)
            .field("model", &self.model)
            .field("api_key", &"<deducted>")
            .finish()
    }
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request<'a>(
    config: &'a ChatConfig,
    user_text: &'a str,
) -> ChatRequestBody<'a> {
    ChatRequestBody {
        developer_message: config.system_instruction(),
        user_message: user_text,
        model: config.model(),
        api_key: config.credential(),
    }
}

#[cfg(test)]
mod tests {
    use little_chat_model::ChatConfigBuilder;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_request() {
        let config = ChatConfigBuilder::with_credential("xxx")
            .with_model("gpt-4.1-nano")
            .with_system_instruction("Answer briefly.")
            .build();
        let body = create_request(&config, "Hello");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "developer_message": "Answer briefly.",
                "user_message": "Hello",
                "model": "gpt-4.1-nano",
                "api_key": "xxx"
            })
        );
        assert!(!format!("{body:?}").contains("xxx"));
    }
}
