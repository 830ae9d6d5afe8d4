use serde::Serialize;

use crate::cgroup::CgroupFs;

/// Resource limits the launcher sizes the JVM against.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContainerLimits {
    /// Effective memory ceiling in bytes. `None` means unbounded.
    pub memory_bytes: Option<u64>,
    /// Total host memory in bytes, when known.
    pub host_memory_bytes: Option<u64>,
    /// CPU quota in whole cores. `None` means unbounded.
    pub cpu_cores: Option<u32>,
}

/// Explicit values that replace the filesystem probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitOverrides {
    /// Raw memory limit in bytes (still cross-checked against host memory).
    pub memory_bytes: Option<u64>,
    pub cpu_cores: Option<u32>,
}

impl ContainerLimits {
    pub fn detect(fs: &CgroupFs, overrides: LimitOverrides) -> Self {
        let host_memory_bytes = fs.host_memory_bytes();
        let raw_limit = match overrides.memory_bytes {
            Some(bytes) => Some(bytes),
            None => fs.memory_limit_bytes(),
        };
        let memory_bytes = effective_memory_ceiling(raw_limit, host_memory_bytes);
        let cpu_cores = match overrides.cpu_cores.filter(|cores| *cores > 0) {
            Some(cores) => Some(cores),
            None => fs.cpu_limit_cores(),
        };

        tracing::debug!(
            target: "jrun.memory",
            raw_limit = ?raw_limit,
            host_memory_bytes = ?host_memory_bytes,
            memory_bytes = ?memory_bytes,
            cpu_cores = ?cpu_cores,
            "detected container limits"
        );

        Self {
            memory_bytes,
            host_memory_bytes,
            cpu_cores,
        }
    }

    /// Limits with a known memory ceiling and nothing else.
    pub fn with_memory_ceiling(bytes: u64) -> Self {
        Self {
            memory_bytes: Some(bytes),
            ..Self::default()
        }
    }

    pub fn memory_ceiling(&self) -> Option<u64> {
        self.memory_bytes
    }
}

/// A limit counts only if it is non-zero and strictly below host memory.
///
/// Unknown host memory means the limit cannot be validated, so it is dropped.
pub fn effective_memory_ceiling(limit: Option<u64>, host_memory: Option<u64>) -> Option<u64> {
    let limit = limit?;
    let host_memory = host_memory?;
    (limit > 0 && limit < host_memory).then_some(limit)
}
