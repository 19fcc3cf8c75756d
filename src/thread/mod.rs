//! Streaming-vs-persisted message reconciliation and the auto-scroll
//! contract. Pure state logic; the UI layer only executes the directives.

pub mod timeline;

use crate::config::Tuning;
use crate::model::Message;

/// Decide what the thread view should display while a response may be in
/// flight.
///
/// If nothing is streaming the persisted list is returned untouched.
/// Otherwise the leading words of the stream are compared against the newest
/// persisted assistant message: when that message already contains the
/// stream's prefix, the backend's persisted copy has landed mid-stream and
/// the synthetic placeholder is suppressed to avoid rendering the same turn
/// twice. Short streams are never suppressed; the prefix check is too noisy
/// on a few characters.
pub fn reconcile(
    messages: &[Message],
    is_generating: bool,
    stream_text: &str,
    tuning: &Tuning,
) -> Vec<Message> {
    let mut out = messages.to_vec();
    if !is_generating || stream_text.trim().is_empty() {
        return out;
    }

    if stream_text.len() > tuning.stream_min_chars {
        let prefix = first_words(stream_text, tuning.stream_prefix_words);
        if !prefix.is_empty() {
            let newest_assistant = messages
                .iter()
                .rev()
                .find(|m| m.kind == crate::model::MessageKind::Assistant);
            if let Some(text) = newest_assistant.and_then(|m| m.text()) {
                if text.contains(&prefix) {
                    return out;
                }
            }
        }
    }

    out.push(Message::streaming(stream_text));
    out
}

/// First `n` whitespace-separated words, rejoined with single spaces.
pub fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// Side effects the UI must perform after a scroll-state event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollDirectives {
    pub dismiss_keyboard: bool,
    pub scroll_to_newest: bool,
}

impl ScrollDirectives {
    const NONE: Self = Self {
        dismiss_keyboard: false,
        scroll_to_newest: false,
    };
}

/// Auto-scroll contract for the thread view.
///
/// Starting a generation dismisses the keyboard and pins the view to the
/// newest message; stream updates keep it pinned. A manual scroll-up
/// suspends auto-scroll until the user returns to the bottom or jumps to
/// latest. Events arrive serialized through the UI thread, so plain
/// last-write-wins fields suffice.
#[derive(Debug, Clone, Copy)]
pub struct ScrollState {
    generating: bool,
    pinned: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            generating: false,
            pinned: true,
        }
    }
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn on_generation_started(&mut self) -> ScrollDirectives {
        self.generating = true;
        self.pinned = true;
        ScrollDirectives {
            dismiss_keyboard: true,
            scroll_to_newest: true,
        }
    }

    pub fn on_generation_finished(&mut self) {
        self.generating = false;
    }

    pub fn on_stream_delta(&mut self) -> ScrollDirectives {
        if self.generating && self.pinned {
            ScrollDirectives {
                dismiss_keyboard: false,
                scroll_to_newest: true,
            }
        } else {
            ScrollDirectives::NONE
        }
    }

    pub fn on_user_scrolled_up(&mut self) {
        self.pinned = false;
    }

    pub fn on_reached_bottom(&mut self) {
        self.pinned = true;
    }

    pub fn on_jump_to_latest(&mut self) -> ScrollDirectives {
        self.pinned = true;
        ScrollDirectives {
            dismiss_keyboard: false,
            scroll_to_newest: true,
        }
    }
}
