use jrun_memory::MB;

use crate::ratio::{compute_option, HeapKind, Ratio};
use crate::user::{FlagKind, UserOptions};

/// Size-based defaults for the maximum heap when no ratio is configured.
///
/// The 300 MiB threshold and the 25%/50% ratios follow the JVM's own
/// historical heap-sizing heuristic for small machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapDefaults {
    /// Ceilings at or below this many bytes use `small_heap_ratio`.
    pub small_heap_threshold: u64,
    pub small_heap_ratio: Ratio,
    pub large_heap_ratio: Ratio,
}

impl Default for HeapDefaults {
    fn default() -> Self {
        Self {
            small_heap_threshold: 300 * MB,
            small_heap_ratio: Ratio::QUARTER,
            large_heap_ratio: Ratio::HALF,
        }
    }
}

impl HeapDefaults {
    pub fn ratio_for(&self, ceiling_bytes: u64) -> Ratio {
        if ceiling_bytes <= self.small_heap_threshold {
            self.small_heap_ratio
        } else {
            self.large_heap_ratio
        }
    }
}

/// Configured heap ratios (`JAVA_MAX_MEM_RATIO`, `JAVA_INIT_MEM_RATIO`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapSettings {
    pub max_ratio: Option<Ratio>,
    pub init_ratio: Option<Ratio>,
    pub defaults: HeapDefaults,
}

/// Decides the `-Xmx` / `-Xms` flags for a given ceiling.
#[derive(Debug, Clone, Copy)]
pub struct MemoryOptionPolicy<'a> {
    user: &'a UserOptions,
    ceiling: Option<u64>,
    settings: &'a HeapSettings,
}

impl<'a> MemoryOptionPolicy<'a> {
    pub fn new(user: &'a UserOptions, ceiling: Option<u64>, settings: &'a HeapSettings) -> Self {
        Self {
            user,
            ceiling,
            settings,
        }
    }

    /// The derived `-Xmx` flag.
    ///
    /// The first matching rule wins:
    /// 1. the user already sets `-Xmx`: nothing;
    /// 2. no ceiling: nothing;
    /// 3. a configured ratio of `0`: nothing;
    /// 4. a configured ratio: that share of the ceiling;
    /// 5. otherwise the size-based default from [`HeapDefaults`].
    pub fn max_heap_option(&self) -> Option<String> {
        if self.user.contains(FlagKind::MaxHeap) {
            tracing::debug!(target: "jrun.options", "user options set -Xmx; not deriving one");
            return None;
        }
        let ceiling = self.ceiling?;
        let ratio = match self.settings.max_ratio {
            Some(ratio) if ratio.is_disabled() => return None,
            Some(ratio) => ratio,
            None => self.settings.defaults.ratio_for(ceiling),
        };
        Some(compute_option(ceiling, ratio.percent(), HeapKind::Max.suffix()))
    }

    /// The derived `-Xms` flag. Opt-in only: without a non-zero configured
    /// ratio the JVM picks the initial heap itself.
    pub fn init_heap_option(&self) -> Option<String> {
        if self.user.contains(FlagKind::InitialHeap) {
            tracing::debug!(target: "jrun.options", "user options set -Xms; not deriving one");
            return None;
        }
        let ratio = self.settings.init_ratio.filter(|ratio| !ratio.is_disabled())?;
        let ceiling = self.ceiling?;
        Some(compute_option(
            ceiling,
            ratio.percent(),
            HeapKind::Initial.suffix(),
        ))
    }

    /// Derived heap flags, maximum first.
    pub fn options(&self) -> Vec<String> {
        self.max_heap_option()
            .into_iter()
            .chain(self.init_heap_option())
            .collect()
    }
}
