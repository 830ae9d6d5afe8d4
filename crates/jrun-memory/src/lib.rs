//! Container resource-limit detection for `jrun`.
//!
//! Everything here is "best-effort": a cgroup or `/proc` file that cannot be
//! read or parsed means "no constraint", never an error. The launcher computes
//! a [`ContainerLimits`] once at startup and passes it by value to the option
//! policies in `jrun-options`.

mod cgroup;
mod cpu;
mod limits;
mod meminfo;
mod size;

pub use cgroup::{
    parse_cgroup_memory_limit_bytes, parse_proc_self_cgroup, CgroupFs, ProcSelfCgroup,
};
pub use cpu::{parse_cfs_quota_cores, parse_cpu_max_cores};
pub use limits::{effective_memory_ceiling, ContainerLimits, LimitOverrides};
pub use meminfo::parse_meminfo_total_bytes;
pub use size::{parse_byte_size, ByteSizeError, GB, KB, MB, TB};
