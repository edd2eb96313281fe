//! Watch primitive: glob subscription over the file system
//!
//! [`GlobSource::subscribe`] splits a glob pattern into a literal root
//! directory and a root-anchored match pattern, registers a `notify`
//! watcher on the root, and spawns a scan thread that reports every
//! already-existing match followed by a single [`FsEvent::Ready`]. All
//! events are delivered over one mpsc channel so the controller sees a
//! single ordered stream.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use globset::Glob;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::WalkBuilder;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{GenError, GenResult};

/// Event emitted by a watch subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    /// A file matching the glob exists (initial scan or live create/rename)
    Added(PathBuf),
    /// A previously-matching file is gone
    Removed(PathBuf),
    /// Initial scan complete; fired exactly once, after all initial adds
    Ready,
    /// Failure inside the watch primitive
    Error(String),
}

/// Glob matcher for a single root-anchored pattern.
///
/// Built on the `ignore` crate's gitignore machinery: the pattern is added
/// with a leading `/` so `*.ts` matches direct children only while
/// `**/*.ts` matches at any depth, mirroring ordinary glob semantics.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    inner: Gitignore,
}

impl GlobMatcher {
    pub fn new(pattern: &str) -> GenResult<Self> {
        // The gitignore builder quietly drops malformed globs, so compile
        // the pattern with globset first to fail fast.
        Glob::new(pattern).map_err(|e| GenError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let mut builder = GitignoreBuilder::new("");
        let anchored = if pattern.starts_with('/') {
            pattern.to_string()
        } else {
            format!("/{pattern}")
        };
        builder
            .add_line(None, &anchored)
            .map_err(|e| GenError::Pattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            inner: builder.build().map_err(|e| GenError::Pattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?,
        })
    }

    /// `rel` must be relative to the pattern's root.
    pub fn is_match(&self, rel: &Path) -> bool {
        self.inner.matched(rel, false).is_ignore()
    }
}

/// Split a glob pattern into its literal directory prefix (the watch root)
/// and the remaining pattern, which is matched relative to that root.
///
/// A pattern with no glob metacharacters is treated as a literal file path:
/// the root is its parent directory.
pub fn split_pattern(pattern: &str) -> GenResult<(PathBuf, String)> {
    if pattern.is_empty() {
        return Err(GenError::Pattern {
            pattern: pattern.to_string(),
            message: "empty pattern".to_string(),
        });
    }

    let mut literal: Vec<&str> = Vec::new();
    let mut rest: Vec<&str> = Vec::new();
    for part in pattern.split('/') {
        if !rest.is_empty() || part.contains(['*', '?', '[', '{']) {
            rest.push(part);
        } else {
            literal.push(part);
        }
    }

    if rest.is_empty() {
        // literal file path: watch the parent, match the file name
        match literal.pop() {
            Some(name) if !name.is_empty() => rest.push(name),
            _ => {
                return Err(GenError::Pattern {
                    pattern: pattern.to_string(),
                    message: "pattern names no file".to_string(),
                })
            }
        }
    }

    let root = if literal.is_empty() || literal.iter().all(|p| p.is_empty()) {
        PathBuf::from(".")
    } else {
        PathBuf::from(literal.join("/"))
    };

    Ok((root, rest.join("/")))
}

/// A running glob subscription. Dropping (or closing) it stops the
/// underlying watcher; the scan thread ends on its own.
pub struct Subscription {
    events: Receiver<FsEvent>,
    watcher: Option<RecommendedWatcher>,
}

impl Subscription {
    pub fn recv_timeout(&self, timeout: Duration) -> Result<FsEvent, RecvTimeoutError> {
        self.events.recv_timeout(timeout)
    }

    /// Stop the underlying watch. No further live events are delivered.
    pub fn close(&mut self) {
        self.watcher = None;
    }

    /// Subscription fed from a bare channel, with no live watcher behind it.
    #[cfg(test)]
    pub(crate) fn from_channel(events: Receiver<FsEvent>) -> Self {
        Self {
            events,
            watcher: None,
        }
    }
}

/// The notify-backed watch source.
pub struct GlobSource;

impl GlobSource {
    /// Subscribe to `pattern`. The watch root (the pattern's literal
    /// directory prefix) must exist.
    pub fn subscribe(pattern: &str, config: notify::Config) -> GenResult<Subscription> {
        let (root, rest) = split_pattern(pattern)?;
        let matcher = GlobMatcher::new(&rest)?;

        // Live notify events carry absolute paths; events are reported in
        // the same base form as the pattern so downstream relative-path
        // math lines up with the output file path.
        let canonical_root = root.canonicalize().map_err(|e| GenError::Watch {
            message: format!("cannot watch '{}': {e}", root.display()),
        })?;

        let (tx, rx) = channel();

        let watcher = spawn_watcher(
            &root,
            canonical_root,
            matcher.clone(),
            config,
            tx.clone(),
        )?;
        spawn_scan(root, matcher, tx);

        Ok(Subscription {
            events: rx,
            watcher: Some(watcher),
        })
    }
}

fn spawn_watcher(
    root: &Path,
    canonical_root: PathBuf,
    matcher: GlobMatcher,
    config: notify::Config,
    tx: Sender<FsEvent>,
) -> GenResult<RecommendedWatcher> {
    let given_root = root.to_path_buf();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                for path in event.paths {
                    let Ok(rel) = path.strip_prefix(&canonical_root) else {
                        continue;
                    };
                    if !matcher.is_match(rel) {
                        continue;
                    }
                    let local = given_root.join(rel);
                    let fs_event = if path.exists() {
                        FsEvent::Added(local)
                    } else {
                        FsEvent::Removed(local)
                    };
                    let _ = tx.send(fs_event);
                }
            }
            Err(e) => {
                let _ = tx.send(FsEvent::Error(e.to_string()));
            }
        },
        config,
    )
    .map_err(|e| GenError::Watch {
        message: e.to_string(),
    })?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(|e| GenError::Watch {
            message: e.to_string(),
        })?;

    Ok(watcher)
}

fn spawn_scan(root: PathBuf, matcher: GlobMatcher, tx: Sender<FsEvent>) {
    thread::spawn(move || {
        let walk = WalkBuilder::new(&root).standard_filters(false).build();
        for entry in walk.flatten() {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let path = entry.path();
            let Ok(rel) = path.strip_prefix(&root) else {
                continue;
            };
            if matcher.is_match(rel) {
                let _ = tx.send(FsEvent::Added(path.to_path_buf()));
            }
        }
        let _ = tx.send(FsEvent::Ready);
    });
}
