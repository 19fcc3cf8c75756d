//! Fallback view for tool names with no dedicated renderer. Shows the call
//! arguments as a key/value table and the raw result text. Registered under
//! the reserved `"default"` key.

use serde::Serialize;

use crate::parse::envelope;

use super::{fallback_error, ToolView, ViewBody, ViewContext, ViewState};

/// Normalized catch-all payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenericPayload {
    pub tool_name: String,
    /// Call arguments as displayable key/value pairs, key-sorted.
    pub fields: Vec<(String, String)>,
    pub output: Option<String>,
    pub is_success: bool,
    pub error_message: Option<String>,
}

pub fn extract_generic(ctx: &ViewContext) -> GenericPayload {
    let exec = ctx.execution();
    let mut payload = GenericPayload {
        tool_name: crate::parse::canonical_tool_name(&ctx.call.function_name),
        is_success: true,
        ..GenericPayload::default()
    };

    for (key, value) in &ctx.call.parameters {
        if let Some(text) = crate::parse::value_text(value) {
            payload.fields.push((key.clone(), text));
        }
    }
    if payload.fields.is_empty() {
        if let Some(xml) = &ctx.call.raw_xml {
            payload.fields = crate::parse::xml::parameters(xml);
        }
    }
    if payload.fields.is_empty() {
        if let Some(exec) = &exec {
            for (key, value) in &exec.arguments {
                if let Some(text) = crate::parse::value_text(value) {
                    payload.fields.push((key.clone(), text));
                }
            }
        }
    }

    if let Some(exec) = &exec {
        payload.is_success = exec.result.is_success();
        payload.error_message = exec.result.error.clone();
        payload.output = envelope::output_text(&exec.result);
    }

    payload
}

pub struct GenericView;

impl ToolView for GenericView {
    fn resolve(&self, ctx: &ViewContext) -> ViewState {
        let exec_seen = ctx.execution().is_some();
        let payload = extract_generic(ctx);
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
                label: Some(crate::parse::display_name(&ctx.call.function_name)),
            };
        }
        if payload.fields.is_empty() && payload.output.is_none() {
            return ViewState::Empty;
        }
        ViewState::Success {
            body: ViewBody::Generic(payload),
        }
    }
}
