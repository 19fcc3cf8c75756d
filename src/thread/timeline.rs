//! Navigable tool-call timeline for the side panel.
//!
//! Snapshots are derived by scanning the thread chronologically: assistant
//! messages contribute calls, tool messages resolve them. The transport has
//! no call↔result key, so a result attaches to the earliest unresolved call
//! with a matching function name, falling back to plain scan order.

use crate::model::{Message, MessageKind, ToolCallSnapshot, ToolExecution};
use crate::parse::{canonical_tool_name, envelope, xml};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Follow the newest snapshot as calls stream in.
    Live,
    /// User navigated away; the index holds until jump-to-latest.
    Manual,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    snapshots: Vec<ToolCallSnapshot>,
    index: usize,
    mode: NavigationMode,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
            index: 0,
            mode: NavigationMode::Live,
        }
    }

    /// Build a timeline from a chronological message list.
    pub fn from_messages(messages: &[Message]) -> Self {
        let mut timeline = Self::new();
        for msg in messages {
            match &msg.kind {
                MessageKind::Assistant => {
                    let Some(text) = msg.text() else {
                        continue;
                    };
                    for call in xml::parse_tool_calls(&text) {
                        let assistant_message_id = if msg.message_id.is_empty() {
                            None
                        } else {
                            Some(msg.message_id.clone())
                        };
                        timeline.push(ToolCallSnapshot {
                            call,
                            assistant_message_id,
                            result_message: None,
                            timestamp_ms: msg.created_at,
                        });
                    }
                }
                MessageKind::Tool => {
                    let exec = envelope::from_message(msg);
                    timeline.attach_result(exec.as_ref(), msg.clone());
                }
                _ => {}
            }
        }
        timeline
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn current(&self) -> Option<&ToolCallSnapshot> {
        self.snapshots.get(self.index)
    }

    pub fn snapshots(&self) -> &[ToolCallSnapshot] {
        &self.snapshots
    }

    /// Append a snapshot. In live mode the panel follows it.
    pub fn push(&mut self, snapshot: ToolCallSnapshot) {
        self.snapshots.push(snapshot);
        if self.mode == NavigationMode::Live {
            self.index = self.snapshots.len() - 1;
        }
    }

    /// Attach a result message to the earliest unresolved call it plausibly
    /// belongs to. Name matching uses the envelope's function name or xml
    /// tag when available.
    pub fn attach_result(&mut self, exec: Option<&ToolExecution>, msg: Message) {
        let names: Vec<String> = exec
            .map(|e| {
                [e.function_name.as_str(), e.xml_tag_name.as_str()]
                    .into_iter()
                    .filter(|n| !n.is_empty())
                    .map(canonical_tool_name)
                    .collect()
            })
            .unwrap_or_default();

        let by_name = self.snapshots.iter().position(|s| {
            !s.is_resolved() && names.contains(&canonical_tool_name(&s.call.function_name))
        });
        let slot = by_name.or_else(|| self.snapshots.iter().position(|s| !s.is_resolved()));

        if let Some(i) = slot {
            self.snapshots[i].result_message = Some(msg);
        }
    }

    pub fn previous(&mut self) {
        self.mode = NavigationMode::Manual;
        self.index = self.index.saturating_sub(1);
    }

    pub fn next(&mut self) {
        self.mode = NavigationMode::Manual;
        if self.index + 1 < self.snapshots.len() {
            self.index += 1;
        }
    }

    /// Jump to the newest snapshot and resume following new ones.
    pub fn jump_to_latest(&mut self) {
        self.mode = NavigationMode::Live;
        self.index = self.snapshots.len().saturating_sub(1);
    }

    /// Direct jump (slider). Clamped; switches to manual mode.
    pub fn set_index(&mut self, index: usize) {
        self.mode = NavigationMode::Manual;
        self.index = index.min(self.snapshots.len().saturating_sub(1));
    }
}
