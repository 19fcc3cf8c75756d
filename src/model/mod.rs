//! Typed data model for chat threads and tool execution payloads.

pub mod types;

use std::path::Path;

use thiserror::Error;

pub use types::{
    Message, MessageKind, ToolCall, ToolCallSnapshot, ToolExecution, ToolResult,
    STREAMING_MESSAGE_ID,
};

/// Failure to load an exported thread file. The only typed error this crate
/// surfaces; everything below the CLI degrades instead of failing.
#[derive(Debug, Error)]
pub enum ThreadLoadError {
    #[error("read thread file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("thread file {path} is not a JSON message array: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a `Message[]` export from disk.
///
/// Accepts either a bare JSON array or an object with a `messages` array
/// (the shape the backend's thread endpoint returns).
pub fn load_thread(path: &Path) -> Result<Vec<Message>, ThreadLoadError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ThreadLoadError::Io {
        path: display.clone(),
        source,
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| ThreadLoadError::Json {
            path: display.clone(),
            source,
        })?;

    let array = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut obj) => obj
            .remove("messages")
            .unwrap_or(serde_json::Value::Array(Vec::new())),
        _ => serde_json::Value::Array(Vec::new()),
    };

    serde_json::from_value(array).map_err(|source| ThreadLoadError::Json {
        path: display,
        source,
    })
}
