//! Controller events, options, and debounce state

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::format::Formatter;

/// Debounce window in milliseconds. Every event inside the window resets
/// it, so a burst settles into a single regeneration.
pub const DEBOUNCE_MS: u64 = 50;

/// Event-loop tick in milliseconds (upper bound on debounce latency)
pub(crate) const TICK_MS: u64 = 25;

/// What to do with events that arrive before the initial scan finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryWritePolicy {
    /// No writes until ready; the ready-triggered write covers the full
    /// initial set. This is the primary contract.
    #[default]
    SuppressUntilReady,
    /// Debounce through discovery; intermediate writes are allowed and
    /// superseded by the ready-triggered write.
    DebounceThrough,
}

/// Immutable configuration captured at start
#[derive(Debug, Clone)]
pub struct GenOptions {
    /// Glob pattern selecting the source files
    pub glob: String,
    /// Barrel file to (re)generate
    pub out_file: PathBuf,
    /// Explicit formatter; when absent one is picked from the output
    /// file's extension
    pub formatter: Option<Formatter>,
    /// Passed through to the watch primitive untouched
    pub watch_config: notify::Config,
    /// Stop after the first stable write instead of keeping the watch alive
    pub one_shot: bool,
    /// Write policy during initial discovery
    pub discovery_writes: DiscoveryWritePolicy,
}

impl GenOptions {
    pub fn new(glob: impl Into<String>, out_file: impl Into<PathBuf>) -> Self {
        Self {
            glob: glob.into(),
            out_file: out_file.into(),
            formatter: None,
            watch_config: notify::Config::default(),
            one_shot: false,
            discovery_writes: DiscoveryWritePolicy::default(),
        }
    }
}

/// Controller event types for NDJSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GenEvent {
    WatchStarted {
        glob: String,
        out_file: String,
    },
    Ready {
        files: usize,
    },
    FileAdded {
        path: String,
    },
    FileRemoved {
        path: String,
    },
    OutputWritten {
        path: String,
        bytes: usize,
        writes: u64,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl GenEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Debounce timer: armed by events, checked on loop ticks
pub(crate) struct DebounceState {
    last_event: Option<Instant>,
}

impl DebounceState {
    pub(crate) fn new() -> Self {
        Self { last_event: None }
    }

    /// Arm (or re-arm) the window. Called on every add/remove event.
    pub(crate) fn mark(&mut self) {
        self.last_event = Some(Instant::now());
    }

    /// True once the window has elapsed with no further events.
    pub(crate) fn due(&self) -> bool {
        self.last_event
            .map(|last| last.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
            .unwrap_or(false)
    }

    pub(crate) fn clear(&mut self) {
        self.last_event = None;
    }
}
