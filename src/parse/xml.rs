//! Legacy XML-ish tag parsing.
//!
//! Assistant messages embed tool calls as tags in running text, in two
//! forms: paired (`<create-file file_path="a.py">print(1)</create-file>`)
//! and self-closing (`<browser-wait seconds="2"/>`). Call arguments appear
//! as tag attributes, as nested `<parameter name="...">` tags, or as the
//! bare tag body. An unclosed tag is a call still being streamed; its
//! attributes are extracted and the body is left empty.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::model::ToolCall;

static OPEN_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<([a-z][a-z0-9_-]*)((?:\s+[a-zA-Z_][a-zA-Z0-9_-]*\s*=\s*"[^"]*")*)\s*(/)?>"#)
        .expect("open tag regex")
});

static ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([a-zA-Z_][a-zA-Z0-9_-]*)\s*=\s*"([^"]*)""#).expect("attr regex"));

static PARAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<parameter\s+name="([^"]+)"\s*>(.*?)</parameter>"#).expect("param regex")
});

/// Tag names that look like tool invocations rather than markup. Almost all
/// tool names carry a separator; the bare ones are listed explicitly.
fn is_tool_like(name: &str) -> bool {
    const BARE_TOOL_NAMES: &[&str] = &["deploy", "ask", "complete"];
    name != "parameter"
        && (name.contains('-') || name.contains('_') || BARE_TOOL_NAMES.contains(&name))
}

/// Value of a single `<parameter name="...">` tag inside raw tag text.
pub fn parameter_value(xml: &str, name: &str) -> Option<String> {
    PARAM_RE
        .captures_iter(xml)
        .find(|caps| &caps[1] == name)
        .map(|caps| caps[2].to_string())
}

/// All `<parameter>` tags in document order.
pub fn parameters(xml: &str) -> Vec<(String, String)> {
    PARAM_RE
        .captures_iter(xml)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Extract every tool call embedded in a blob of assistant text, in
/// document order. Non-tool markup is skipped; nothing here errors.
pub fn parse_tool_calls(text: &str) -> Vec<ToolCall> {
    let mut calls = Vec::new();
    let mut consumed = 0usize;

    for caps in OPEN_TAG_RE.captures_iter(text) {
        let open = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        // Skip tags inside an already-consumed paired body.
        if open.start() < consumed {
            continue;
        }
        let name = &caps[1];
        if !is_tool_like(name) {
            continue;
        }

        let mut call = ToolCall::new(name);
        if let Some(attrs) = caps.get(2) {
            for attr in ATTR_RE.captures_iter(attrs.as_str()) {
                call.parameters
                    .insert(attr[1].to_string(), Value::String(attr[2].to_string()));
            }
        }

        let self_closing = caps.get(3).is_some();
        if self_closing {
            call.raw_xml = Some(open.as_str().to_string());
            consumed = open.end();
            calls.push(call);
            continue;
        }

        let closing = format!("</{name}>");
        match text[open.end()..].find(&closing) {
            Some(rel) => {
                let body = &text[open.end()..open.end() + rel];
                let end = open.end() + rel + closing.len();
                call.raw_xml = Some(text[open.start()..end].to_string());

                let nested = parameters(body);
                if nested.is_empty() {
                    let trimmed = body.trim();
                    if !trimmed.is_empty() {
                        call.parameters
                            .insert("text".to_string(), Value::String(trimmed.to_string()));
                    }
                } else {
                    for (key, value) in nested {
                        call.parameters.insert(key, Value::String(value));
                    }
                }
                consumed = end;
            }
            None => {
                // Unclosed: a call still streaming in. Keep what we have.
                call.raw_xml = Some(open.as_str().to_string());
                consumed = open.end();
            }
        }
        calls.push(call);
    }

    calls
}
