//! `tool_execution` envelope extraction and output decoding.
//!
//! The envelope travels in a tool message's content, in the content's nested
//! `content` string, or in the message metadata, depending on backend
//! version. `result.output` adds its own wrinkle: it may be double-encoded
//! (a JSON string containing more JSON) or wrapped in a legacy
//! `ToolResult(output='...')` textual form.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::model::{Message, ToolExecution, ToolResult};

/// Pull a `tool_execution` envelope out of a JSON value, if present.
pub fn from_value(val: &Value) -> Option<ToolExecution> {
    let envelope = val.get("tool_execution")?;
    serde_json::from_value(envelope.clone()).ok()
}

/// Locate the execution envelope for a tool message.
///
/// Candidate locations, in order: the content itself, the content's nested
/// `content` string (older exports string-encode the inner payload), and the
/// message metadata.
pub fn from_message(msg: &Message) -> Option<ToolExecution> {
    let content = crate::parse::loosely_parsed(&msg.content);
    if let Some(exec) = from_value(&content) {
        return Some(exec);
    }
    if let Some(inner) = content.get("content") {
        let inner = crate::parse::loosely_parsed(inner);
        if let Some(exec) = from_value(&inner) {
            return Some(exec);
        }
    }
    let metadata = crate::parse::loosely_parsed(&msg.metadata);
    if let Some(exec) = from_value(&metadata) {
        return Some(exec);
    }
    debug!(message_id = %msg.message_id, "no tool_execution envelope found");
    None
}

/// Unwrap double-encoded output.
///
/// If the output is a string that itself serializes JSON (it starts with
/// `{`, `[` or `"`), parse it and recurse; a string that fails to parse is
/// the final value, not an error. Plain prose, numbers-as-text and similar
/// are left untouched so command output like `"0"` keeps its type.
pub fn decode_output(output: &Value) -> Value {
    let mut current = output.clone();
    loop {
        let next = match &current {
            Value::String(s) => {
                let trimmed = s.trim_start();
                if !(trimmed.starts_with('{')
                    || trimmed.starts_with('[')
                    || trimmed.starts_with('"'))
                {
                    break;
                }
                match serde_json::from_str::<Value>(s) {
                    Ok(parsed) if parsed != current => parsed,
                    _ => break,
                }
            }
            _ => break,
        };
        current = next;
    }
    current
}

static TOOL_RESULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)ToolResult\s*\(.*?output\s*=\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")"#)
        .expect("ToolResult regex")
});

/// Unwrap the legacy `ToolResult(output='...')` textual wrapper.
pub fn unwrap_tool_result_literal(text: &str) -> Option<String> {
    let caps = TOOL_RESULT_RE.captures(text)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    Some(unescape_literal(raw))
}

fn unescape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Final display text for a result, after structural decoding and legacy
/// unwrapping. `None` when the output carries nothing.
pub fn output_text(result: &ToolResult) -> Option<String> {
    let decoded = decode_output(&result.output);
    let text = crate::parse::value_text(&decoded)?;
    if let Some(unwrapped) = unwrap_tool_result_literal(&text) {
        return Some(unwrapped);
    }
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn double_encoded_output_round_trips() {
        let once = json!({"output": "hello", "exit_code": 0});
        let twice = Value::String(serde_json::to_string(&once).unwrap());
        assert_eq!(decode_output(&twice), once);

        let thrice = Value::String(serde_json::to_string(&twice).unwrap());
        assert_eq!(decode_output(&thrice), once);
    }

    #[test]
    fn prose_strings_survive_decoding() {
        let v = json!("hello\nworld");
        assert_eq!(decode_output(&v), v);
        let v = json!("0");
        assert_eq!(decode_output(&v), v);
    }

    #[test]
    fn tool_result_literal_single_and_double_quotes() {
        assert_eq!(
            unwrap_tool_result_literal(r"ToolResult(success=True, output='line1\nline2')"),
            Some("line1\nline2".to_string())
        );
        assert_eq!(
            unwrap_tool_result_literal(r#"ToolResult(output="it\'s done")"#),
            Some("it's done".to_string())
        );
        assert_eq!(unwrap_tool_result_literal("no wrapper"), None);
    }
}
