//! Message and tool-execution structs.
//!
//! These mirror the wire shapes loosely on purpose: the backend emits several
//! generations of encodings (structured envelopes, string-encoded JSON, raw
//! XML-ish tags), so every field that can be absent or polymorphic is modeled
//! as such and tightened later by the extraction layer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Synthetic id for the transient streaming placeholder message. Replaced by
/// the real persisted message once the backend finalizes the turn.
pub const STREAMING_MESSAGE_ID: &str = "streaming-temp";

/// Message kinds seen on the thread endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    User,
    Assistant,
    Tool,
    System,
    BrowserState,
    #[serde(untagged)]
    Other(String),
}

/// One chat turn. Append-only and immutable once persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message_id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// String or structured JSON, polymorphic per kind.
    #[serde(default)]
    pub content: Value,
    /// Milliseconds since epoch. The wire carries either ISO-8601 strings or
    /// integer timestamps; both are normalized at deserialization time.
    #[serde(default, deserialize_with = "de_timestamp")]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub metadata: Value,
}

fn de_timestamp<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(crate::parse::parse_timestamp))
}

impl Message {
    /// Build the synthetic placeholder carrying in-flight stream text.
    pub fn streaming(text: impl Into<String>) -> Self {
        Self {
            message_id: STREAMING_MESSAGE_ID.to_string(),
            kind: MessageKind::Assistant,
            content: Value::String(text.into()),
            created_at: None,
            metadata: Value::Null,
        }
    }

    /// Best-effort plain text of this message's content.
    ///
    /// Assistant/tool content is either a bare string or an object wrapping
    /// the text under a `content` key; both forms are accepted.
    pub fn text(&self) -> Option<String> {
        match &self.content {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj
                .get("content")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            _ => None,
        }
    }

    pub fn is_streaming_placeholder(&self) -> bool {
        self.message_id == STREAMING_MESSAGE_ID
    }
}

/// An agent-issued tool invocation, parsed out of an assistant message.
/// Immutable after parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub function_name: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Alternate textual encoding of the same call; consulted as a fallback
    /// parameter source when the structured map is missing a field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_xml: Option<String>,
}

impl ToolCall {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// The `tool_execution` envelope embedded in a tool message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolExecution {
    #[serde(default)]
    pub function_name: String,
    #[serde(default)]
    pub xml_tag_name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    #[serde(default)]
    pub result: ToolResult,
}

/// Reported outcome of a tool call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Absence implies success.
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    /// String, object, or a JSON-encoded string needing a second parse pass.
    #[serde(default)]
    pub output: Value,
}

impl ToolResult {
    /// `success == false` or a present error both count as failure.
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true) && self.error.is_none()
    }
}

/// Point-in-time binding of a tool call to its (possibly pending) result.
/// An ordered sequence of these drives the timeline panel.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallSnapshot {
    pub call: ToolCall,
    /// Id of the assistant message the call was parsed from, when known.
    pub assistant_message_id: Option<String>,
    /// The tool message carrying this call's execution result, once seen.
    pub result_message: Option<Message>,
    /// Timestamp of the originating assistant message, milliseconds.
    pub timestamp_ms: Option<i64>,
}

impl ToolCallSnapshot {
    pub fn is_resolved(&self) -> bool {
        self.result_message.is_some()
    }
}
