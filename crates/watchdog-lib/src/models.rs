//! Core data models for the watchdog

/// A running container as reported by the runtime listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    /// Runtime names, usually with a leading `/`
    pub names: Vec<String>,
}

impl ContainerSummary {
    pub fn new(id: impl Into<String>, names: &[&str]) -> Self {
        Self {
            id: id.into(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// CPU counters taken from one stats snapshot
///
/// Deltas are signed because cumulative counters can go backwards when the
/// container is recreated between the two samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuStats {
    /// Container CPU time consumed between the two samples (ns)
    pub cpu_delta: i128,
    /// Host CPU time elapsed between the two samples (ns)
    pub system_delta: i128,
    pub online_cpus: u32,
}

impl CpuStats {
    pub fn new(cpu_delta: i128, system_delta: i128, online_cpus: u32) -> Self {
        Self {
            cpu_delta,
            system_delta,
            online_cpus,
        }
    }

    /// Build from raw cumulative counters (current and previous sample)
    pub fn from_counters(
        total_usage: u64,
        pre_total_usage: u64,
        system_usage: u64,
        pre_system_usage: u64,
        online_cpus: u32,
    ) -> Self {
        Self {
            cpu_delta: total_usage as i128 - pre_total_usage as i128,
            system_delta: system_usage as i128 - pre_system_usage as i128,
            online_cpus,
        }
    }
}
