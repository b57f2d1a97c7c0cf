use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Message role in LLM conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// Tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmToolCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub arguments: HashMap<String, Value>,
}

/// Message in LLM conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    #[serde(default = "default_role")]
    pub role: MessageRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<LlmToolCall>>,
}

fn default_role() -> MessageRole {
    MessageRole::User
}

/// Response from LLM gateway
#[derive(Debug, Clone, Default)]
pub struct LlmGatewayResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<LlmToolCall>,
}

impl LlmGatewayResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: vec![],
        }
    }
}

impl LlmMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    /// Assistant turn that only requests tool calls.
    pub fn tool_request(calls: Vec<LlmToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: None,
            tool_calls: Some(calls),
        }
    }

    /// Tool output answering `call`.
    pub fn tool_result(call: &LlmToolCall, output: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: Some(output.into()),
            tool_calls: Some(vec![call.clone()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_role_serialization() {
        assert_eq!(serde_json::to_string(&MessageRole::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&MessageRole::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(serde_json::to_string(&MessageRole::Tool).unwrap(), "\"tool\"");
    }

    #[test]
    fn test_constructors_set_roles() {
        let msg = LlmMessage::system("Tu es un agronome");
        assert_eq!(msg.role, MessageRole::System);
        assert_eq!(msg.content.as_deref(), Some("Tu es un agronome"));

        let msg = LlmMessage::user("Quand semer le maïs ?");
        assert_eq!(msg.role, MessageRole::User);
        assert!(msg.tool_calls.is_none());

        assert_eq!(LlmMessage::assistant("En mars").role, MessageRole::Assistant);
    }

    #[test]
    fn test_tool_request_and_result() {
        let call = LlmToolCall {
            id: Some("call_7".to_string()),
            name: "calculate_roi".to_string(),
            arguments: HashMap::from([("investment".to_string(), json!(500000))]),
        };

        let request = LlmMessage::tool_request(vec![call.clone()]);
        assert_eq!(request.role, MessageRole::Assistant);
        assert!(request.content.is_none());

        let result = LlmMessage::tool_result(&call, "{\"roi\":0.4}");
        assert_eq!(result.role, MessageRole::Tool);
        assert_eq!(result.tool_calls, Some(vec![call]));
    }

    #[test]
    fn test_tool_call_without_id_omits_field() {
        let tool_call = LlmToolCall {
            id: None,
            name: "diagnose_disease".to_string(),
            arguments: HashMap::new(),
        };

        let json = serde_json::to_string(&tool_call).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(json.contains("diagnose_disease"));
    }

    #[test]
    fn test_message_default_role() {
        let msg: LlmMessage = serde_json::from_str(r#"{"content":"test"}"#).unwrap();
        assert_eq!(msg.role, MessageRole::User);
    }

    #[test]
    fn test_gateway_response_text() {
        let response = LlmGatewayResponse::text("Bonjour");
        assert_eq!(response.content.as_deref(), Some("Bonjour"));
        assert!(response.tool_calls.is_empty());
    }
}
