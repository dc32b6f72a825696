//! Tool-call and response envelope shared by the handlers and transport
//! crates: every tool call returns `{isError, content, structuredContent}`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of `SuggestedParameterValues`: a single `{parameterName: text}`
/// pair the caller can retry with.
pub type Suggestion = HashMap<String, String>;

/// Build a single-entry suggestion keyed by the parameter it targets.
pub fn suggestion(parameter: &str, text: impl Into<String>) -> Suggestion {
    let mut map = HashMap::with_capacity(1);
    map.insert(parameter.to_string(), text.into());
    map
}

/// An incoming tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// A single content block in a tool response (the transport-facing
/// representation of the outcome; always `text` for this server).
#[derive(Debug, Clone, Serialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ContentBlock {
    fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// The structured half of a tool response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredContent {
    pub message: String,
    #[serde(rename = "SuggestedParameterValues", skip_serializing_if = "Option::is_none")]
    pub suggested_parameter_values: Option<Vec<Suggestion>>,
}

/// The full response envelope returned by the dispatcher for every tool
/// call, success or failure. No Rust error ever escapes the dispatcher —
/// it is always converted into one of these.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub is_error: bool,
    pub content: Vec<ContentBlock>,
    pub structured_content: StructuredContent,
}

impl ToolResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self::from_structured(
            false,
            StructuredContent {
                message: message.into(),
                suggested_parameter_values: None,
            },
        )
    }

    pub fn error(message: impl Into<String>, suggestions: Option<Vec<Suggestion>>) -> Self {
        Self::from_structured(
            true,
            StructuredContent {
                message: message.into(),
                suggested_parameter_values: suggestions,
            },
        )
    }

    /// Build the envelope from its structured half, serializing it into the
    /// `content` text block so the two halves of the response never diverge.
    fn from_structured(is_error: bool, structured_content: StructuredContent) -> Self {
        let text = serde_json::to_string(&structured_content)
            .unwrap_or_else(|_| structured_content.message.clone());
        Self {
            is_error,
            content: vec![ContentBlock::text(text)],
            structured_content,
        }
    }
}
