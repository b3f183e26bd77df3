//! Status-change notifications
//!
//! Students report every assignment status change to a [`NotificationSink`].
//! Sinks are shared (`Arc<dyn NotificationSink>`) and pluggable:
//!
//! - [`ConsoleSink`] renders a human-readable line per change
//! - [`JsonLinesSink`] writes one JSON object per change
//! - [`MemorySink`] keeps every change for replay and live subscription

mod console;
mod json;
mod memory;
mod sink;

pub use console::{ConsoleSink, describe_status, render};
pub use json::JsonLinesSink;
pub use memory::{MemorySink, NotificationSeq};
pub use sink::{Notification, NotificationSink};
