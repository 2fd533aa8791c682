use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "system")]
    System,
}

/// One message in the upstream conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Who wrote a turn, as the chat front-end names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "bot", alias = "assistant")]
    Bot,
}

impl From<Sender> for Role {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => Role::User,
            Sender::Bot => Role::Assistant,
        }
    }
}

/// History entry in the client-facing shape. Clients that already send
/// `role`/`content` are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTurn {
    #[serde(alias = "role")]
    pub sender: Sender,
    #[serde(alias = "content")]
    pub text: String,
}

impl ClientTurn {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}

impl From<&ClientTurn> for ChatTurn {
    fn from(turn: &ClientTurn) -> Self {
        ChatTurn::new(turn.sender.into(), turn.text.clone())
    }
}

/// A validated inbound chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ClientTurn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Current time as an ISO-8601 UTC string with millisecond precision.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_turn_accepts_sender_and_text() {
        let turn: ClientTurn =
            serde_json::from_value(json!({"sender": "bot", "text": "hi"})).unwrap();
        assert_eq!(ChatTurn::from(&turn), ChatTurn::new(Role::Assistant, "hi"));
    }

    #[test]
    fn client_turn_accepts_role_and_content() {
        let turn: ClientTurn =
            serde_json::from_value(json!({"role": "assistant", "content": "hello"})).unwrap();
        assert_eq!(turn.sender, Sender::Bot);
        assert_eq!(turn.text, "hello");
    }

    #[test]
    fn client_turn_rejects_system_sender() {
        let result =
            serde_json::from_value::<ClientTurn>(json!({"role": "system", "content": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        let value = serde_json::to_value(ChatTurn::new(Role::System, "prompt")).unwrap();
        assert_eq!(value, json!({"role": "system", "content": "prompt"}));
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
