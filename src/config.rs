//! Tuning knobs for the heuristic parts of extraction and reconciliation.
//!
//! The defaults mirror the backend's observed behavior. They are exposed as
//! configuration because the constants are empirical, not load-bearing: the
//! correlation window and the stream-duplicate prefix check both tolerate a
//! range of values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable pointing at an alternate tuning file.
pub const CONFIG_ENV: &str = "SUNA_VIEWS_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Maximum distance, in milliseconds, between a tool call and a
    /// `browser_state` message for the two to be considered related.
    pub correlation_window_ms: i64,
    /// Number of leading words of the in-flight stream compared against the
    /// newest persisted assistant message when suppressing duplicates.
    pub stream_prefix_words: usize,
    /// Streams shorter than this many characters are never suppressed; the
    /// prefix comparison is too noisy on tiny fragments.
    pub stream_min_chars: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            correlation_window_ms: 10_000,
            stream_prefix_words: 10,
            stream_min_chars: 20,
        }
    }
}

impl Tuning {
    /// Load tuning from an explicit path, the `SUNA_VIEWS_CONFIG` env var,
    /// or the platform config dir, in that order of precedence.
    ///
    /// A missing file yields defaults. A file that exists but does not parse
    /// is an error: silently ignoring a typo'd config is worse than failing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let candidate = explicit
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(default_config_path);

        let Some(path) = candidate else {
            return Ok(Self::default());
        };
        if explicit.is_none() && !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("read tuning file {}", path.display()))?;
        let tuning: Tuning = toml::from_str(&raw)
            .with_context(|| format!("parse tuning file {}", path.display()))?;
        Ok(tuning)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("suna-views").join("tuning.toml"))
}
