//! Error types for the watchdog

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WatchdogError>;

#[derive(Debug, Error)]
pub enum WatchdogError {
    /// No running container has a name containing the fragment
    #[error("container {0} not found")]
    ContainerNotFound(String),

    #[error("container runtime error: {0}")]
    Runtime(#[from] bollard::errors::Error),

    /// Stats snapshot did not carry a usable CPU section
    #[error("stats snapshot for {container_id} is missing {field}")]
    MissingStats {
        container_id: String,
        field: &'static str,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
