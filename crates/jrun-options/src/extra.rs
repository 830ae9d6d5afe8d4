use crate::user::{FlagKind, UserOptions};

/// JDWP agent settings (`JAVA_DEBUG`, `JAVA_DEBUG_PORT`, `JAVA_DEBUG_SUSPEND`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugSettings {
    pub port: u16,
    pub suspend: bool,
}

impl DebugSettings {
    pub const DEFAULT_PORT: u16 = 5005;
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            port: Self::DEFAULT_PORT,
            suspend: false,
        }
    }
}

/// Size the JVM's thread pools to the CPU quota instead of the host's cores.
pub fn cpu_options(user: &UserOptions, cpu_cores: Option<u32>) -> Vec<String> {
    let Some(cores) = cpu_cores else {
        return Vec::new();
    };

    [
        (FlagKind::ParallelGcThreads, "-XX:ParallelGCThreads="),
        (FlagKind::ConcGcThreads, "-XX:ConcGCThreads="),
        (
            FlagKind::ForkJoinParallelism,
            "-Djava.util.concurrent.ForkJoinPool.common.parallelism=",
        ),
    ]
    .into_iter()
    .filter(|(kind, _)| !user.contains(*kind))
    .map(|(_, prefix)| format!("{prefix}{cores}"))
    .collect()
}

pub fn debug_options(user: &UserOptions, debug: Option<&DebugSettings>) -> Vec<String> {
    let Some(debug) = debug else {
        return Vec::new();
    };
    if user.contains(FlagKind::JdwpAgent) {
        tracing::debug!(target: "jrun.options", "user options configure jdwp; skipping debug agent");
        return Vec::new();
    }

    let suspend = if debug.suspend { "y" } else { "n" };
    vec![format!(
        "-agentlib:jdwp=transport=dt_socket,server=y,suspend={suspend},address={}",
        debug.port
    )]
}

pub fn diagnostics_options(enabled: bool) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    [
        "-XX:+UnlockDiagnosticVMOptions",
        "-XX:NativeMemoryTracking=summary",
        "-XX:+PrintNMTStatistics",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
