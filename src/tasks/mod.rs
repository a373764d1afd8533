//! Background Tasks Module
//!
//! # Tasks
//! - Expired listing sweep: drops cached listings past their TTL

mod cleanup;

pub use cleanup::spawn_cleanup_task;
