//! Derivation of JVM startup flags from container limits.
//!
//! Every policy here is a pure function of three inputs: the user's own
//! `JAVA_OPTIONS` (as [`UserOptions`]), the launcher settings
//! ([`JvmOptionSettings`]) and the [`jrun_memory::ContainerLimits`] detected at
//! startup. An explicit user flag always wins over a derived one.

mod assemble;
mod derive;
mod extra;
mod gc;
mod memory;
mod ratio;
mod user;

pub use assemble::{assemble, normalize_whitespace};
pub use derive::{DerivedOptions, JvmOptionSettings};
pub use extra::{cpu_options, debug_options, diagnostics_options, DebugSettings};
pub use gc::{GcOptionPolicy, LEGACY_JAVA_MAJOR_VERSION};
pub use memory::{HeapDefaults, HeapSettings, MemoryOptionPolicy};
pub use ratio::{compute_option, heap_mebibytes, HeapKind, Ratio, RatioError};
pub use user::{FlagKind, UserOptions};
