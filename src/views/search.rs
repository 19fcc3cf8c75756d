//! Web search and scrape views. Success renders a result table plus an
//! image strip when the provider returned one.

use serde::Serialize;
use serde_json::Value;

use crate::parse::envelope;

use super::{fallback_error, ToolView, ViewBody, ViewContext, ViewState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub title: Option<String>,
    pub url: String,
    pub snippet: Option<String>,
}

/// Normalized search/scrape payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchPayload {
    pub query: Option<String>,
    pub results: Vec<SearchHit>,
    pub images: Vec<String>,
    pub is_success: bool,
    pub error_message: Option<String>,
}

pub fn extract_search(ctx: &ViewContext) -> SearchPayload {
    let exec = ctx.execution();
    let mut payload = SearchPayload {
        query: ctx.argument_with(&["query", "url"], exec.as_ref()),
        is_success: true,
        ..SearchPayload::default()
    };

    let Some(exec) = exec else {
        return payload;
    };
    payload.is_success = exec.result.is_success();
    payload.error_message = exec.result.error.clone();

    let decoded = envelope::decode_output(&exec.result.output);
    match &decoded {
        Value::Array(items) => payload.results = hits_from_array(items),
        Value::Object(obj) => {
            if let Some(Value::Array(items)) = obj.get("results") {
                payload.results = hits_from_array(items);
            }
            if let Some(Value::Array(images)) = obj.get("images") {
                payload.images = images
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.to_string())
                    .collect();
            }
        }
        _ => {
            // Malformed or legacy text output: salvage bare links.
            if let Some(text) = envelope::output_text(&exec.result) {
                payload.results = crate::parse::all_urls(&text)
                    .into_iter()
                    .map(|url| SearchHit {
                        title: None,
                        url,
                        snippet: None,
                    })
                    .collect();
            }
        }
    }

    payload
}

fn hits_from_array(items: &[Value]) -> Vec<SearchHit> {
    let mut hits = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(obj) => {
                let Some(url) = obj.get("url").and_then(crate::parse::value_text) else {
                    continue;
                };
                hits.push(SearchHit {
                    title: obj.get("title").and_then(crate::parse::value_text),
                    url,
                    snippet: obj
                        .get("snippet")
                        .or_else(|| obj.get("content"))
                        .and_then(crate::parse::value_text),
                });
            }
            Value::String(s) if s.starts_with("http") => hits.push(SearchHit {
                title: None,
                url: s.clone(),
                snippet: None,
            }),
            _ => {}
        }
    }
    hits
}

pub struct SearchView;

impl ToolView for SearchView {
    fn resolve(&self, ctx: &ViewContext) -> ViewState {
        let exec_seen = ctx.execution().is_some();
        let payload = extract_search(ctx);
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
                label: payload.query.clone(),
            };
        }
        if payload.query.is_none() && payload.results.is_empty() && payload.images.is_empty() {
            return ViewState::Empty;
        }
        ViewState::Success {
            body: ViewBody::Search(payload),
        }
    }
}
