//! Watchdog control loop
//!
//! The loop itself lives in [`Monitor`]; the pieces it is made of
//! (name resolution, utilization and threshold policy) are plain functions so
//! they can be tested without a container runtime.

mod policy;
mod resolve;
mod r#loop;


pub use policy::{cpu_utilization, decide, exceeds_threshold, Decision};
pub use r#loop::{IterationOutcome, Monitor, MonitorBuilder, MonitorConfig};
pub use resolve::resolve_container_id;
