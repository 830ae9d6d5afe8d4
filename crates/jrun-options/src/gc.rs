use crate::user::{FlagKind, UserOptions};

/// Java major version that predates `-XX:+ExitOnOutOfMemoryError`.
pub const LEGACY_JAVA_MAJOR_VERSION: u32 = 7;

// Parallel collector tuned to shrink the heap eagerly and grow it
// conservatively, so idle memory goes back to the container.
const PARALLEL_GC_OPTIONS: [&str; 5] = [
    "-XX:+UseParallelGC",
    "-XX:MinHeapFreeRatio=20",
    "-XX:MaxHeapFreeRatio=40",
    "-XX:GCTimeRatio=4",
    "-XX:AdaptiveSizePolicyWeight=90",
];

const EXIT_ON_OOM_OPTION: &str = "-XX:+ExitOnOutOfMemoryError";

/// Decides the garbage-collector tuning flags.
#[derive(Debug, Clone, Copy)]
pub struct GcOptionPolicy<'a> {
    user: &'a UserOptions,
    java_major_version: Option<u32>,
}

impl<'a> GcOptionPolicy<'a> {
    pub fn new(user: &'a UserOptions, java_major_version: Option<u32>) -> Self {
        Self {
            user,
            java_major_version,
        }
    }

    /// Empty when the user picked a collector; the parallel-GC bundle
    /// otherwise, ending with exit-on-OOM unless running on Java 7.
    pub fn gc_options(&self) -> Vec<String> {
        if self.user.contains(FlagKind::GarbageCollector) {
            tracing::debug!(
                target: "jrun.options",
                "user options select a collector; skipping GC tuning"
            );
            return Vec::new();
        }

        let mut options: Vec<String> = PARALLEL_GC_OPTIONS.iter().map(|s| s.to_string()).collect();
        if self.java_major_version != Some(LEGACY_JAVA_MAJOR_VERSION) {
            options.push(EXIT_ON_OOM_OPTION.to_string());
        }
        options
    }
}
