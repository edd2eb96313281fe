//! The regeneration controller
//!
//! State machine: INITIALIZING -> DISCOVERING -> STABLE -> [CLOSED | FAILED].
//!
//! [`start`] validates the options, subscribes to the glob, and drives the
//! discovery phase on the caller's thread: it returns only after the watch
//! primitive signals readiness and the complete initial file set has been
//! rendered and written. In watch mode the steady-state loop then continues
//! on a background thread behind the returned [`GenHandle`]; in one-shot
//! mode the subscription is closed and no handle is returned.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::{GenError, GenResult};
use crate::fileset::FileSet;
use crate::format::{formatter_for, render, Formatter};
use crate::fs::{FileSystem, LocalFs};
use crate::source::{FsEvent, GlobSource, Subscription};

use super::event::{DebounceState, DiscoveryWritePolicy, GenEvent, GenOptions, TICK_MS};

/// Handle to a running watch. Closing (or dropping) it cancels any pending
/// debounced regeneration and stops the watch.
pub struct GenHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    writes: Arc<AtomicU64>,
}

impl GenHandle {
    /// Number of completed writes so far. Observable per instance; there is
    /// no process-wide counter.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Stop watching. Pending debounced regenerations are discarded.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for GenHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start generating the barrel file described by `options`.
///
/// Returns once the initial file set has been fully discovered and the
/// first output written. Configuration problems are reported synchronously,
/// before any watch subscription is made.
pub fn start(
    options: GenOptions,
    callback: impl Fn(GenEvent) + Send + Sync + 'static,
) -> GenResult<Option<GenHandle>> {
    let formatter = resolve_formatter(&options)?;
    let subscription = GlobSource::subscribe(&options.glob, options.watch_config.clone())?;
    run(
        options,
        formatter,
        subscription,
        Arc::new(LocalFs::new()),
        Arc::new(callback),
    )
}

/// Same as [`start`] but with an injected event source and file system.
#[cfg(test)]
pub(crate) fn start_with(
    options: GenOptions,
    subscription: Subscription,
    fs: Arc<dyn FileSystem>,
    callback: Arc<dyn Fn(GenEvent) + Send + Sync>,
) -> GenResult<Option<GenHandle>> {
    let formatter = resolve_formatter(&options)?;
    run(options, formatter, subscription, fs, callback)
}

/// Validate options and pick the formatter. Runs before any subscription.
fn resolve_formatter(options: &GenOptions) -> GenResult<Formatter> {
    if options.glob.is_empty() {
        return Err(GenError::Config {
            message: "no glob pattern provided".to_string(),
        });
    }
    if options.out_file.as_os_str().is_empty() {
        return Err(GenError::Config {
            message: "no output file provided".to_string(),
        });
    }
    options
        .formatter
        .or_else(|| formatter_for(&options.out_file))
        .ok_or_else(|| GenError::Config {
            message: format!(
                "no formatter matches output file '{}'",
                options.out_file.display()
            ),
        })
}

fn run(
    options: GenOptions,
    formatter: Formatter,
    mut subscription: Subscription,
    fs: Arc<dyn FileSystem>,
    callback: Arc<dyn Fn(GenEvent) + Send + Sync>,
) -> GenResult<Option<GenHandle>> {
    let mut controller = Controller {
        out_file: options.out_file.clone(),
        formatter,
        files: FileSet::new(),
        last_output: String::new(),
        writes: Arc::new(AtomicU64::new(0)),
        fs,
        callback,
    };

    controller.emit(GenEvent::WatchStarted {
        glob: options.glob.clone(),
        out_file: options.out_file.display().to_string(),
    });

    // DISCOVERING: build up the initial set. Under the default policy no
    // writes happen here; DebounceThrough arms the debounce as in steady
    // state and the ready-triggered write supersedes whatever it produced.
    let mut debounce = DebounceState::new();
    loop {
        match subscription.recv_timeout(Duration::from_millis(TICK_MS)) {
            Ok(FsEvent::Added(path)) => {
                controller.apply_add(path);
                if options.discovery_writes == DiscoveryWritePolicy::DebounceThrough {
                    debounce.mark();
                }
            }
            Ok(FsEvent::Removed(path)) => {
                controller.apply_remove(&path);
                if options.discovery_writes == DiscoveryWritePolicy::DebounceThrough {
                    debounce.mark();
                }
            }
            Ok(FsEvent::Ready) => break,
            Ok(FsEvent::Error(message)) => {
                subscription.close();
                return Err(GenError::Watch { message });
            }
            Err(RecvTimeoutError::Timeout) => {
                if debounce.due() {
                    debounce.clear();
                    controller.regenerate();
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                subscription.close();
                return Err(GenError::Watch {
                    message: "watch source disconnected before ready".to_string(),
                });
            }
        }
    }

    // STABLE: forced regeneration of the complete initial set, bypassing
    // the debounce. After this point the caller's start() returns.
    controller.emit(GenEvent::Ready {
        files: controller.files.len(),
    });
    controller.regenerate();

    if options.one_shot {
        subscription.close();
        controller.emit(GenEvent::Shutdown);
        return Ok(None);
    }

    let stop = Arc::new(AtomicBool::new(false));
    let writes = controller.writes.clone();
    let thread = {
        let stop = stop.clone();
        std::thread::spawn(move || steady_loop(controller, subscription, stop))
    };

    Ok(Some(GenHandle {
        stop,
        thread: Some(thread),
        writes,
    }))
}

fn steady_loop(mut controller: Controller, mut subscription: Subscription, stop: Arc<AtomicBool>) {
    let mut debounce = DebounceState::new();

    while !stop.load(Ordering::SeqCst) {
        match subscription.recv_timeout(Duration::from_millis(TICK_MS)) {
            Ok(FsEvent::Added(path)) => {
                controller.apply_add(path);
                debounce.mark();
            }
            Ok(FsEvent::Removed(path)) => {
                controller.apply_remove(&path);
                debounce.mark();
            }
            // Readiness fires once; replays are ignored.
            Ok(FsEvent::Ready) => {}
            Ok(FsEvent::Error(message)) => {
                // Post-readiness failures leave the controller degraded: no
                // further regenerations are guaranteed.
                controller.emit(GenEvent::Error { message });
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if debounce.due() {
            debounce.clear();
            controller.regenerate();
        }
    }

    subscription.close();
    controller.emit(GenEvent::Shutdown);
}

/// Owns the file set and output state; all mutation happens on whichever
/// thread is currently driving the event loop, never concurrently.
struct Controller {
    out_file: PathBuf,
    formatter: Formatter,
    files: FileSet,
    /// Text of the most recent completed write; empty before any write.
    last_output: String,
    writes: Arc<AtomicU64>,
    fs: Arc<dyn FileSystem>,
    callback: Arc<dyn Fn(GenEvent) + Send + Sync>,
}

impl Controller {
    fn emit(&self, event: GenEvent) {
        (self.callback)(event);
    }

    /// The output file can match its own glob (a barrel in the watched
    /// directory); it must never import itself or re-trigger regeneration.
    fn is_out_file(&self, path: &Path) -> bool {
        let normalize = |p: &Path| {
            p.components()
                .filter(|c| !matches!(c, std::path::Component::CurDir))
                .map(|c| c.as_os_str().to_os_string())
                .collect::<Vec<_>>()
        };
        normalize(path) == normalize(&self.out_file)
    }

    fn apply_add(&mut self, path: PathBuf) {
        if self.is_out_file(&path) {
            return;
        }
        let display = path.display().to_string();
        if self.files.add(path) {
            self.emit(GenEvent::FileAdded { path: display });
        }
    }

    fn apply_remove(&mut self, path: &Path) {
        if self.is_out_file(path) {
            return;
        }
        if self.files.remove(path) {
            self.emit(GenEvent::FileRemoved {
                path: path.display().to_string(),
            });
        }
    }

    /// Render, compare, maybe write. Shared by the ready transition and the
    /// debounced steady-state path.
    fn regenerate(&mut self) {
        let (output, skipped) = render(self.files.as_slice(), self.formatter, &self.out_file);
        for err in skipped {
            self.emit(GenEvent::Error {
                message: err.to_string(),
            });
        }

        if output == self.last_output {
            return;
        }

        match self.fs.write(&self.out_file, &output) {
            Ok(()) => {
                let writes = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
                self.emit(GenEvent::OutputWritten {
                    path: self.out_file.display().to_string(),
                    bytes: output.len(),
                    writes,
                });
                self.last_output = output;
            }
            Err(err) => {
                // A failed write is not fatal. The output state is left
                // untouched so the next regeneration retries the write.
                self.emit(GenEvent::Error {
                    message: err.to_string(),
                });
            }
        }
    }
}
