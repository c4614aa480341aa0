//! Background Tasks Module
//!
//! Contains background tasks that keep the in-process backend tidy.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
