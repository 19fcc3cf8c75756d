//! Tool view dispatch.
//!
//! Each tool family gets one module holding its normalized payload struct,
//! the extractor that fills it from raw call/result data, and the `ToolView`
//! impl that maps the payload to a presentation state. The registry is a
//! flat name-keyed table: adding a tool type is one map entry, not a type
//! hierarchy.

pub mod browser;
pub mod command;
pub mod deploy;
pub mod files;
pub mod generic;
pub mod search;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::config::Tuning;
use crate::model::{Message, ToolCall, ToolExecution};
use crate::parse::{canonical_tool_name, envelope};

pub use browser::{BrowserPayload, BrowserView, Screenshot};
pub use command::{CommandPayload, CommandView};
pub use deploy::{DeployPayload, DeployView};
pub use files::{FileOpPayload, FileOperation, FileView};
pub use generic::{GenericPayload, GenericView};
pub use search::{SearchHit, SearchPayload, SearchView};

/// Registry key of the mandatory fallback renderer.
pub const DEFAULT_VIEW: &str = "default";

/// Resolved presentation state. Mutually exclusive; recomputed from current
/// inputs on every call, no memory between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    /// Streaming with no terminal result. Carries the best-known partial
    /// identifier (file path, command text) for the progress row.
    Loading { label: Option<String> },
    /// Not streaming, nothing usable extracted. Distinct from an error.
    Empty,
    /// Tool-reported failure; the message is surfaced verbatim.
    Error { message: String },
    Success { body: ViewBody },
}

/// Tool-specific success body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewBody {
    Terminal(CommandPayload),
    File(FileOpPayload),
    Browser(BrowserPayload),
    Search(SearchPayload),
    Deploy(DeployPayload),
    Generic(GenericPayload),
}

/// Everything an extractor may consult, borrowed from the thread view.
/// Extraction is synchronous and side-effect-free; payloads are derived
/// fresh on every call and never cached.
pub struct ViewContext<'a> {
    pub call: &'a ToolCall,
    /// The tool message carrying this call's execution result, if any.
    pub tool_message: Option<&'a Message>,
    /// The assistant message the call was parsed from, if known.
    pub assistant_message: Option<&'a Message>,
    /// Full thread, chronological. Used for sibling-message correlation.
    pub messages: &'a [Message],
    pub is_streaming: bool,
    pub tuning: &'a Tuning,
}

impl<'a> ViewContext<'a> {
    /// The execution envelope for this call, when the tool message carries
    /// one. Re-parsed on each call by design.
    pub fn execution(&self) -> Option<ToolExecution> {
        self.tool_message.and_then(envelope::from_message)
    }

    /// First non-empty argument under any of `keys`, searching the strongest
    /// source first: structured call parameters, then the envelope's
    /// call-time arguments, then raw XML parameter tags.
    pub fn argument(&self, keys: &[&str]) -> Option<String> {
        self.argument_with(keys, self.execution().as_ref())
    }

    /// Same as [`argument`](Self::argument) with a pre-parsed envelope, for
    /// extractors that already hold one.
    pub fn argument_with(&self, keys: &[&str], exec: Option<&ToolExecution>) -> Option<String> {
        for key in keys {
            if let Some(text) = self
                .call
                .parameters
                .get(*key)
                .and_then(crate::parse::value_text)
            {
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        if let Some(exec) = exec {
            for key in keys {
                if let Some(text) = exec.arguments.get(*key).and_then(crate::parse::value_text) {
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
        }
        if let Some(xml) = &self.call.raw_xml {
            for key in keys {
                if let Some(text) = crate::parse::xml::parameter_value(xml, key) {
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
        }
        None
    }

    /// Timestamp used for sibling-message correlation: the tool message's
    /// when present, else the originating assistant message's.
    pub fn call_timestamp_ms(&self) -> Option<i64> {
        self.tool_message
            .and_then(|m| m.created_at)
            .or_else(|| self.assistant_message.and_then(|m| m.created_at))
    }
}

/// One renderer per tool family: a pure function of the context.
pub trait ToolView: Send + Sync {
    fn resolve(&self, ctx: &ViewContext) -> ViewState;
}

/// Name-keyed renderer table with a mandatory `"default"` entry.
///
/// Names are canonicalized (lowercased, `_` folded to `-`) on both insert
/// and lookup, since backends emit both spellings of every tool name.
pub struct ViewRegistry {
    entries: HashMap<String, Arc<dyn ToolView>>,
}

impl ViewRegistry {
    /// A registry seeded with every known tool family.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
        };
        registry.register(DEFAULT_VIEW, Arc::new(GenericView));

        let command: Arc<dyn ToolView> = Arc::new(CommandView);
        for name in ["execute-command", "check-command-output", "terminate-command"] {
            registry.register(name, command.clone());
        }

        let file: Arc<dyn ToolView> = Arc::new(FileView);
        for name in [
            "create-file",
            "delete-file",
            "full-file-rewrite",
            "str-replace",
            "edit-file",
            "read-file",
        ] {
            registry.register(name, file.clone());
        }

        let browser: Arc<dyn ToolView> = Arc::new(BrowserView);
        for name in [
            "browser-navigate-to",
            "browser-go-back",
            "browser-wait",
            "browser-click-element",
            "browser-click-coordinates",
            "browser-input-text",
            "browser-send-keys",
            "browser-switch-tab",
            "browser-close-tab",
            "browser-scroll-down",
            "browser-scroll-up",
            "browser-scroll-to-text",
            "browser-get-dropdown-options",
            "browser-select-dropdown-option",
            "browser-drag-drop",
        ] {
            registry.register(name, browser.clone());
        }

        let search: Arc<dyn ToolView> = Arc::new(SearchView);
        for name in ["web-search", "scrape-webpage"] {
            registry.register(name, search.clone());
        }

        let deploy: Arc<dyn ToolView> = Arc::new(DeployView);
        for name in ["deploy", "expose-port"] {
            registry.register(name, deploy.clone());
        }

        registry
    }

    /// Insert or overwrite; last write wins.
    pub fn register(&mut self, name: &str, view: Arc<dyn ToolView>) {
        self.entries.insert(canonical_tool_name(name), view);
    }

    /// Resolve a renderer. Never absent: unregistered names fall back to the
    /// `"default"` entry, which is seeded at construction and can only be
    /// replaced, not removed.
    pub fn get(&self, name: &str) -> Arc<dyn ToolView> {
        let canonical = canonical_tool_name(name);
        if let Some(view) = self.entries.get(&canonical) {
            return view.clone();
        }
        self.entries
            .get(DEFAULT_VIEW)
            .cloned()
            .unwrap_or_else(|| Arc::new(GenericView))
    }

    /// Presence without the fallback.
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(&canonical_tool_name(name))
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Error text for a failed result that carried no message of its own.
pub(crate) fn fallback_error(tool_name: &str) -> String {
    format!("{} failed", crate::parse::display_name(tool_name))
}
