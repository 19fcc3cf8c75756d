//! Deployment views: `deploy` and `expose-port`. The one field that matters
//! is the resulting URL; logs are shown as secondary detail.

use serde::Serialize;
use serde_json::Value;

use crate::parse::envelope;

use super::{fallback_error, ToolView, ViewBody, ViewContext, ViewState};

/// Normalized deployment payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeployPayload {
    pub name: Option<String>,
    pub url: Option<String>,
    pub logs: Option<String>,
    pub is_success: bool,
    pub error_message: Option<String>,
}

pub fn extract_deploy(ctx: &ViewContext) -> DeployPayload {
    let exec = ctx.execution();
    let mut payload = DeployPayload {
        name: ctx.argument_with(&["name", "directory_path", "port"], exec.as_ref()),
        is_success: true,
        ..DeployPayload::default()
    };

    let Some(exec) = exec else {
        return payload;
    };
    payload.is_success = exec.result.is_success();
    payload.error_message = exec.result.error.clone();

    let decoded = envelope::decode_output(&exec.result.output);
    if let Value::Object(obj) = &decoded {
        payload.url = obj
            .get("url")
            .or_else(|| obj.get("uri"))
            .and_then(crate::parse::value_text);
        payload.logs = obj
            .get("message")
            .or_else(|| obj.get("output"))
            .and_then(crate::parse::value_text);
    } else {
        payload.logs = envelope::output_text(&exec.result);
    }

    // Provider CLIs print the deployed URL in their log tail; fish it out
    // when the structured field is absent.
    if payload.url.is_none() {
        payload.url = payload.logs.as_deref().and_then(crate::parse::first_url);
    }

    payload
}

pub struct DeployView;

impl ToolView for DeployView {
    fn resolve(&self, ctx: &ViewContext) -> ViewState {
        let exec_seen = ctx.execution().is_some();
        let payload = extract_deploy(ctx);
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
                label: payload.name.clone(),
            };
        }
        if payload.url.is_none() && payload.logs.is_none() && payload.name.is_none() {
            return ViewState::Empty;
        }
        ViewState::Success {
            body: ViewBody::Deploy(payload),
        }
    }
}
