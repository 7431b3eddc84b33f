//! Watchdog library for container CPU supervision
//!
//! This crate provides the core functionality for:
//! - Resolving containers by name fragment
//! - Computing CPU utilization from runtime stats snapshots
//! - Restarting a container when a tracked container runs hot
//! - Structured logging of every watchdog decision

pub mod error;
pub mod models;
pub mod monitor;
pub mod observability;
pub mod runtime;

pub use error::{Result, WatchdogError};
pub use models::*;
pub use observability::StructuredLogger;
