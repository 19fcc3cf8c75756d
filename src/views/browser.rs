//! Browser automation views.
//!
//! Screenshots usually arrive out-of-band: the tool's own result reports the
//! action, and a sibling `browser_state` message carries the screenshot and
//! URL snapshot. The two are correlated by timestamp proximity inside a
//! fixed tolerance window since the transport has no explicit link (a known
//! backend limitation, preserved here).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{Message, MessageKind};
use crate::parse::{canonical_tool_name, envelope, loosely_parsed};

use super::{fallback_error, ToolView, ViewBody, ViewContext, ViewState};

/// Tools that never produce a screenshot; exempt from the sibling-message
/// search so a stale nearby `browser_state` is not misattributed.
const NO_SCREENSHOT_TOOLS: &[&str] = &["browser-wait", "browser-go-back"];

/// Screenshot source, either inline image bytes or a fetchable URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Screenshot {
    Base64(String),
    Url(String),
}

/// Normalized browser-action payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BrowserPayload {
    /// Canonical tool name, e.g. `browser-navigate-to`.
    pub operation: String,
    pub url: Option<String>,
    pub message: Option<String>,
    pub screenshot: Option<Screenshot>,
    pub is_success: bool,
    pub error_message: Option<String>,
}

pub fn extract_browser(ctx: &ViewContext) -> BrowserPayload {
    let operation = canonical_tool_name(&ctx.call.function_name);
    let exec = ctx.execution();
    let mut payload = BrowserPayload {
        operation: operation.clone(),
        url: ctx.argument_with(&["url"], exec.as_ref()),
        is_success: true,
        ..BrowserPayload::default()
    };

    if let Some(exec) = &exec {
        payload.is_success = exec.result.is_success();
        payload.error_message = exec.result.error.clone();

        let decoded = envelope::decode_output(&exec.result.output);
        match &decoded {
            Value::Object(obj) => {
                payload.message = obj
                    .get("message")
                    .or_else(|| obj.get("content"))
                    .and_then(crate::parse::value_text);
                if payload.url.is_none() {
                    payload.url = obj.get("url").and_then(crate::parse::value_text);
                }
                payload.screenshot = screenshot_from(obj);
            }
            _ => {
                payload.message = envelope::output_text(&exec.result);
            }
        }
    }

    if payload.screenshot.is_none() && !NO_SCREENSHOT_TOOLS.contains(&operation.as_str()) {
        if let Some(state) = nearest_browser_state(
            ctx.messages,
            ctx.call_timestamp_ms(),
            ctx.tuning.correlation_window_ms,
        ) {
            debug!(operation = %operation, state_id = %state.message_id, "correlated browser_state by proximity");
            if let Value::Object(obj) = loosely_parsed(&state.content) {
                payload.screenshot = screenshot_from(&obj);
                if payload.url.is_none() {
                    payload.url = obj.get("url").and_then(crate::parse::value_text);
                }
            }
        }
    }

    payload
}

/// Nearest `browser_state` message within `window_ms` of the call time.
/// Smallest absolute delta wins; ties keep the first encountered in
/// chronological scan order. A miss means "no screenshot", not an error.
pub fn nearest_browser_state<'a>(
    messages: &'a [Message],
    call_ts_ms: Option<i64>,
    window_ms: i64,
) -> Option<&'a Message> {
    let t0 = call_ts_ms?;
    let mut best: Option<(i64, &Message)> = None;
    for msg in messages {
        if msg.kind != MessageKind::BrowserState {
            continue;
        }
        let Some(ts) = msg.created_at else {
            continue;
        };
        let delta = (ts - t0).abs();
        if delta > window_ms {
            continue;
        }
        let closer = match best {
            None => true,
            Some((best_delta, _)) => delta < best_delta,
        };
        if closer {
            best = Some((delta, msg));
        }
    }
    best.map(|(_, msg)| msg)
}

fn screenshot_from(obj: &Map<String, Value>) -> Option<Screenshot> {
    for key in ["screenshot_base64", "screenshot", "image"] {
        if let Some(raw) = obj.get(key).and_then(|v| v.as_str()) {
            if let Some(shot) = classify_screenshot(raw) {
                return Some(shot);
            }
        }
    }
    obj.get("image_url")
        .and_then(|v| v.as_str())
        .map(|s| Screenshot::Url(s.to_string()))
}

/// Distinguish URL references from inline base64 (with or without the
/// `data:image/...;base64,` prefix). Undecodable blobs are dropped rather
/// than handed to an image widget that would fail on them.
fn classify_screenshot(raw: &str) -> Option<Screenshot> {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(Screenshot::Url(raw.to_string()));
    }
    let encoded = match raw.split_once("base64,") {
        Some((_, rest)) => rest,
        None => raw,
    };
    if BASE64.decode(encoded).is_ok() {
        Some(Screenshot::Base64(encoded.to_string()))
    } else {
        None
    }
}

pub struct BrowserView;

impl ToolView for BrowserView {
    fn resolve(&self, ctx: &ViewContext) -> ViewState {
        let exec_seen = ctx.execution().is_some();
        let payload = extract_browser(ctx);
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
                label: payload.url.clone().or_else(|| {
                    Some(crate::parse::display_name(&ctx.call.function_name))
                }),
            };
        }
        if payload.url.is_none() && payload.screenshot.is_none() && payload.message.is_none() {
            return ViewState::Empty;
        }
        ViewState::Success {
            body: ViewBody::Browser(payload),
        }
    }
}
