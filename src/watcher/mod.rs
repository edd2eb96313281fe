//! Watch-driven barrel regeneration
//!
//! The controller here is the core of the crate:
//! - startup determinism (the first write reflects the full initial scan)
//! - debounced regeneration (50ms window, reset by every event)
//! - content-equality write suppression
//! - one-shot mode for build scripts

mod engine;
mod event;

pub use engine::{start, GenHandle};
pub use event::{DiscoveryWritePolicy, GenEvent, GenOptions, DEBOUNCE_MS};
