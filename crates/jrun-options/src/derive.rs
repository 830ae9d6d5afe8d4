use jrun_memory::ContainerLimits;
use serde::Serialize;

use crate::assemble::assemble;
use crate::extra::{cpu_options, debug_options, diagnostics_options, DebugSettings};
use crate::gc::GcOptionPolicy;
use crate::memory::{HeapSettings, MemoryOptionPolicy};
use crate::user::UserOptions;

/// Everything the option policies need apart from the detected limits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JvmOptionSettings {
    pub user_options: UserOptions,
    pub heap: HeapSettings,
    pub java_major_version: Option<u32>,
    pub debug: Option<DebugSettings>,
    pub diagnostics: bool,
}

impl JvmOptionSettings {
    /// The final option string: user options followed by every derived flag.
    pub fn jvm_options(&self, limits: &ContainerLimits) -> String {
        DerivedOptions::derive(self, limits).assemble(&self.user_options)
    }
}

/// Derived flags grouped by the policy that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedOptions {
    pub memory: Vec<String>,
    pub gc: Vec<String>,
    pub cpu: Vec<String>,
    pub debug: Vec<String>,
    pub diagnostics: Vec<String>,
}

impl DerivedOptions {
    pub fn derive(settings: &JvmOptionSettings, limits: &ContainerLimits) -> Self {
        let user = &settings.user_options;
        let derived = Self {
            memory: MemoryOptionPolicy::new(user, limits.memory_ceiling(), &settings.heap)
                .options(),
            gc: GcOptionPolicy::new(user, settings.java_major_version).gc_options(),
            cpu: cpu_options(user, limits.cpu_cores),
            debug: debug_options(user, settings.debug.as_ref()),
            diagnostics: diagnostics_options(settings.diagnostics),
        };
        tracing::debug!(target: "jrun.options", derived = ?derived, "derived jvm options");
        derived
    }

    /// All derived flags in emission order.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.memory
            .iter()
            .chain(&self.gc)
            .chain(&self.cpu)
            .chain(&self.debug)
            .chain(&self.diagnostics)
            .map(String::as_str)
    }

    pub fn assemble(&self, user: &UserOptions) -> String {
        assemble(user.raw(), self.flags())
    }
}
