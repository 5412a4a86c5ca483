use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const INITIAL_MESSAGE_ID: &str = "initial-message";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Chatbot {
    #[serde(default)]
    pub live: bool,
    #[serde(default)]
    pub messages_initial: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Error,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Role::Error, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            id: None,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct CreateChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct CreateChatResponse {
    pub chat_id: String,
}

#[derive(Serialize)]
pub(crate) struct SendMessagesRequest<'a> {
    pub id: String,
    pub messages: &'a [&'a ChatMessage],
}

#[derive(Deserialize, Default)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub subscription_tier: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chatbot_keeps_unknown_fields() {
        let chatbot: Chatbot = serde_json::from_value(json!({
            "live": true,
            "messages_initial": "Hi!",
            "name": "Support bot"
        }))
        .unwrap();

        assert!(chatbot.live);
        assert_eq!(chatbot.messages_initial.as_deref(), Some("Hi!"));
        assert_eq!(chatbot.extra["name"], "Support bot");
    }

    #[test]
    fn chatbot_defaults_to_not_live() {
        let chatbot: Chatbot = serde_json::from_value(json!({})).unwrap();
        assert!(!chatbot.live);
        assert!(chatbot.messages_initial.is_none());
    }

    #[test]
    fn message_id_is_omitted_when_absent() {
        let value = serde_json::to_value(ChatMessage::user("hello")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hello"}));
    }
}
