//! Background Tasks Module
//!
//! Contains background tasks that run periodically during service operation.
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries and prunes tag memberships at
//!   configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
