//! Best-effort decoding of loosely-typed payloads.
//!
//! Everything here returns `Option` or degrades to a weaker strategy; parse
//! failures are never surfaced as errors. The renderers translate an
//! all-empty extraction into an explicit "no data" state instead.

pub mod envelope;
pub mod xml;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Parse a timestamp from either an integer or an ISO-8601 string.
/// Returns milliseconds since the Unix epoch.
///
/// Integer inputs are disambiguated by magnitude: values below 1e11 are
/// seconds (that bound is year 5138 in seconds but 1973 in millis), larger
/// values are already millis.
pub fn parse_timestamp(val: &Value) -> Option<i64> {
    const MILLIS_BOUND: i64 = 100_000_000_000;

    if let Some(n) = val.as_i64() {
        let ms = if (0..MILLIS_BOUND).contains(&n) {
            n.saturating_mul(1000)
        } else {
            n
        };
        return Some(ms);
    }

    let s = val.as_str()?;
    if let Ok(n) = s.parse::<i64>() {
        let ms = if (0..MILLIS_BOUND).contains(&n) {
            n.saturating_mul(1000)
        } else {
            n
        };
        return Some(ms);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    // Some emitters drop the offset entirely; assume UTC.
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    None
}

/// Render a JSON value as display text.
///
/// Strings pass through unchanged, scalars stringify, structured values
/// re-serialize. `Null` carries no text.
pub fn value_text(val: &Value) -> Option<String> {
    match val {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(val).ok(),
    }
}

// Trailing commas and closing brackets are prose punctuation, not URL.
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"'<>\)\],]+"#).expect("url regex"));

/// First http(s) URL in a blob of text. The lossy last-resort strategy for
/// payloads that carry a link but no structure.
pub fn first_url(text: &str) -> Option<String> {
    URL_RE.find(text).map(|m| m.as_str().to_string())
}

/// All http(s) URLs in document order, deduplicated.
pub fn all_urls(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

/// If a string value holds serialized JSON structure, parse it; otherwise
/// return the value unchanged. Used to normalize `content` fields that are
/// sometimes objects and sometimes string-encoded objects.
pub fn loosely_parsed(val: &Value) -> Value {
    if let Value::String(s) = val {
        let trimmed = s.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            if let Ok(parsed) = serde_json::from_str::<Value>(s) {
                return parsed;
            }
        }
    }
    val.clone()
}

/// Canonical tool-name form: lowercase, underscores folded to hyphens.
/// Backends emit both `execute_command` and `execute-command`.
pub fn canonical_tool_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}

/// Human-readable title for a tool name: `execute-command` becomes
/// `Execute Command`. Used for loading labels and panel headers.
pub fn display_name(tool_name: &str) -> String {
    canonical_tool_name(tool_name)
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamp_seconds_and_millis() {
        assert_eq!(parse_timestamp(&json!(1_700_000_000)), Some(1_700_000_000_000));
        assert_eq!(
            parse_timestamp(&json!(1_700_000_000_000i64)),
            Some(1_700_000_000_000)
        );
        assert_eq!(parse_timestamp(&json!("1700000000")), Some(1_700_000_000_000));
    }

    #[test]
    fn timestamp_iso8601() {
        let ms = parse_timestamp(&json!("2025-11-12T18:31:20.000Z")).unwrap();
        assert_eq!(ms % 1000, 0);
        assert!(parse_timestamp(&json!("2025-11-12T18:31:20.5")).is_some());
        assert!(parse_timestamp(&json!("not a date")).is_none());
    }

    #[test]
    fn first_url_stops_at_delimiters() {
        assert_eq!(
            first_url("deployed to https://foo.example/app) and more"),
            Some("https://foo.example/app".to_string())
        );
        assert_eq!(first_url("no links here"), None);
    }

    #[test]
    fn loosely_parsed_only_unwraps_structure() {
        assert_eq!(
            loosely_parsed(&json!("{\"a\":1}")),
            json!({"a": 1})
        );
        assert_eq!(loosely_parsed(&json!("plain text")), json!("plain text"));
        assert_eq!(loosely_parsed(&json!("123")), json!("123"));
    }

    #[test]
    fn display_names() {
        assert_eq!(display_name("execute-command"), "Execute Command");
        assert_eq!(display_name("web_search"), "Web Search");
        assert_eq!(display_name("deploy"), "Deploy");
    }
}
