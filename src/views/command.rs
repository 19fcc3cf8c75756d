//! Command execution views: `execute-command`, `check-command-output`,
//! `terminate-command`. Renders a terminal-style scrollback on success.

use serde::Serialize;
use serde_json::Value;

use crate::parse::envelope;

use super::{fallback_error, ToolView, ViewBody, ViewContext, ViewState};

/// Normalized command-execution payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandPayload {
    pub command: Option<String>,
    pub output: Option<String>,
    pub exit_code: Option<i64>,
    pub session_name: Option<String>,
    pub cwd: Option<String>,
    /// A terminal result has been seen for this call.
    pub completed: bool,
    pub is_success: bool,
    pub error_message: Option<String>,
}

/// Extraction order per field: call parameters, envelope arguments, raw XML
/// tags, then the decoded result output. The output object form carries
/// `{output, exit_code}` and sometimes echoes session/cwd.
pub fn extract_command(ctx: &ViewContext) -> CommandPayload {
    let exec = ctx.execution();
    let mut payload = CommandPayload {
        command: ctx.argument_with(&["command", "text"], exec.as_ref()),
        session_name: ctx.argument_with(&["session_name"], exec.as_ref()),
        cwd: ctx.argument_with(&["cwd", "folder"], exec.as_ref()),
        is_success: true,
        ..CommandPayload::default()
    };

    let Some(exec) = exec else {
        return payload;
    };
    payload.completed = true;
    payload.is_success = exec.result.is_success();
    payload.error_message = exec.result.error.clone();

    let decoded = envelope::decode_output(&exec.result.output);
    match &decoded {
        Value::Object(obj) => {
            payload.output = obj.get("output").and_then(crate::parse::value_text);
            payload.exit_code = obj.get("exit_code").and_then(Value::as_i64);
            if payload.command.is_none() {
                payload.command = obj.get("command").and_then(crate::parse::value_text);
            }
            if payload.session_name.is_none() {
                payload.session_name = obj.get("session_name").and_then(crate::parse::value_text);
            }
            if payload.cwd.is_none() {
                payload.cwd = obj.get("cwd").and_then(crate::parse::value_text);
            }
        }
        _ => {
            payload.output = envelope::output_text(&exec.result);
        }
    }

    // A nonzero exit code is a failure even when the envelope forgot to say so.
    if payload.exit_code.map(|c| c != 0).unwrap_or(false) && exec.result.error.is_none() {
        payload.is_success = exec.result.success.unwrap_or(false);
    }

    payload
}

pub struct CommandView;

impl ToolView for CommandView {
    fn resolve(&self, ctx: &ViewContext) -> ViewState {
        let payload = extract_command(ctx);
        if let Some(message) = &payload.error_message {
            return ViewState::Error {
                message: message.clone(),
            };
        }
        if payload.completed && !payload.is_success {
            return ViewState::Error {
                message: fallback_error(&ctx.call.function_name),
            };
        }
        if ctx.is_streaming && !payload.completed {
            return ViewState::Loading {
                label: payload.command.clone(),
            };
        }
        if payload.command.is_none() && payload.output.is_none() {
            return ViewState::Empty;
        }
        ViewState::Success {
            body: ViewBody::Terminal(payload),
        }
    }
}
