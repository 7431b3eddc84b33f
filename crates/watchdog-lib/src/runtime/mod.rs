//! Container runtime access
//!
//! The monitor only talks to the runtime through [`ContainerRuntime`], so the
//! loop can run against Docker in production and an in-memory runtime in
//! tests.

mod docker;

pub use docker::{cpu_stats_from_response, DockerRuntime};

use crate::error::Result;
use crate::models::{ContainerSummary, CpuStats};

pub use async_trait::async_trait;

/// Trait for the three runtime operations the watchdog needs
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// List running containers in runtime-defined order
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>>;

    /// Fetch a one-shot CPU snapshot carrying both samples
    async fn cpu_stats(&self, container_id: &str) -> Result<CpuStats>;

    /// Restart a container with the runtime's default stop timeout
    async fn restart(&self, container_id: &str) -> Result<()>;
}
