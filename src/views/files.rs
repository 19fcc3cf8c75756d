//! File operation views: create, rewrite, edit/str-replace, delete, read.
//! Success renders a diff for string replacement and syntax-highlighted
//! source otherwise; both selections key off the payload fields.

use serde::Serialize;
use serde_json::Value;

use crate::parse::{canonical_tool_name, envelope};

use super::{fallback_error, ToolView, ViewBody, ViewContext, ViewState};

/// Operation kind, derived from the tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOperation {
    Create,
    Rewrite,
    Edit,
    Delete,
    Read,
}

pub fn operation_for(tool_name: &str) -> FileOperation {
    let name = canonical_tool_name(tool_name);
    if name.contains("create") {
        FileOperation::Create
    } else if name.contains("rewrite") {
        FileOperation::Rewrite
    } else if name.contains("delete") {
        FileOperation::Delete
    } else if name.contains("read") {
        FileOperation::Read
    } else {
        FileOperation::Edit
    }
}

/// Normalized file-operation payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOpPayload {
    pub file_path: Option<String>,
    pub file_content: Option<String>,
    pub operation: FileOperation,
    /// Replacement pair, present for str-replace edits; drives the diff view.
    pub old_str: Option<String>,
    pub new_str: Option<String>,
    /// Result text, e.g. the backend's "file created" confirmation.
    pub message: Option<String>,
    pub is_success: bool,
    pub error_message: Option<String>,
}

pub fn extract_file_op(ctx: &ViewContext) -> FileOpPayload {
    let exec = ctx.execution();
    let mut payload = FileOpPayload {
        file_path: ctx.argument_with(&["file_path", "target_file", "path"], exec.as_ref()),
        file_content: ctx.argument_with(
            &["file_contents", "code_edit", "contents", "content", "text"],
            exec.as_ref(),
        ),
        operation: operation_for(&ctx.call.function_name),
        old_str: ctx.argument_with(&["old_str"], exec.as_ref()),
        new_str: ctx.argument_with(&["new_str"], exec.as_ref()),
        message: None,
        is_success: true,
        error_message: None,
    };

    let Some(exec) = exec else {
        return payload;
    };
    payload.is_success = exec.result.is_success();
    payload.error_message = exec.result.error.clone();

    let decoded = envelope::decode_output(&exec.result.output);
    match &decoded {
        Value::Object(obj) => {
            payload.message = obj.get("message").and_then(crate::parse::value_text);
            if payload.file_path.is_none() {
                payload.file_path = obj.get("file_path").and_then(crate::parse::value_text);
            }
            // Read results carry the file body in the output.
            if payload.operation == FileOperation::Read && payload.file_content.is_none() {
                payload.file_content = obj.get("content").and_then(crate::parse::value_text);
            }
        }
        _ => {
            let text = envelope::output_text(&exec.result);
            if payload.operation == FileOperation::Read && payload.file_content.is_none() {
                payload.file_content = text;
            } else {
                payload.message = text;
            }
        }
    }

    payload
}

pub struct FileView;

impl ToolView for FileView {
    fn resolve(&self, ctx: &ViewContext) -> ViewState {
        let exec_seen = ctx.execution().is_some();
        let payload = extract_file_op(ctx);
        if let Some(message) = &payload.error_message {
            return ViewState::Error {
                message: message.clone(),
            };
        }
        if exec_seen && !payload.is_success {
            return ViewState::Error {
                message: fallback_error(&ctx.call.function_name),
            };
        }
        if ctx.is_streaming && !exec_seen {
            return ViewState::Loading {
                label: payload.file_path.clone(),
            };
        }
        if payload.file_path.is_none() && payload.file_content.is_none() {
            return ViewState::Empty;
        }
        ViewState::Success {
            body: ViewBody::File(payload),
        }
    }
}
