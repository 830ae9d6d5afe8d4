use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::cpu::{parse_cfs_quota_cores, parse_cpu_max_cores};
use crate::limits::effective_memory_ceiling;
use crate::meminfo::{parse_meminfo_total_bytes, system_total_memory_bytes};

/// Parsed cgroup paths from `/proc/self/cgroup`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcSelfCgroup {
    /// cgroup v2 unified hierarchy entry (e.g. `0::/some/path`).
    pub v2_path: Option<String>,
    /// cgroup v1 memory controller entry (e.g. `5:memory:/some/path`).
    pub v1_memory_path: Option<String>,
    /// cgroup v1 cpu controller entry (e.g. `4:cpu,cpuacct:/some/path`).
    pub v1_cpu_path: Option<String>,
}

/// Parse `/proc/self/cgroup` contents and extract the controller paths the
/// launcher cares about.
pub fn parse_proc_self_cgroup(contents: &str) -> ProcSelfCgroup {
    let mut parsed = ProcSelfCgroup::default();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.splitn(3, ':');
        let (Some(hierarchy_id), Some(controllers), Some(path)) =
            (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        let path = path.trim();
        if path.is_empty() {
            continue;
        }

        if parsed.v2_path.is_none() && hierarchy_id == "0" && controllers.is_empty() {
            parsed.v2_path = Some(path.to_string());
            continue;
        }

        let has_controller = |name: &str| controllers.split(',').any(|c| c.trim() == name);
        if parsed.v1_memory_path.is_none() && has_controller("memory") {
            parsed.v1_memory_path = Some(path.to_string());
        }
        if parsed.v1_cpu_path.is_none() && has_controller("cpu") {
            parsed.v1_cpu_path = Some(path.to_string());
        }
    }

    parsed
}

const UNLIMITED_THRESHOLD_BYTES: u64 = 1 << 60; // 1 EiB; above this is treated as "unlimited".

/// Parse a cgroup memory limit value.
///
/// - cgroup v2: `memory.max` is either `max` or a byte count.
/// - cgroup v1: `memory.limit_in_bytes` is a byte count; `-1` and very large
///   values (`9223372036854771712` on most kernels) mean "no limit".
///
/// Returns `None` for unlimited/unknown values.
pub fn parse_cgroup_memory_limit_bytes(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "max" || raw == "-1" {
        return None;
    }

    let value = match raw.parse::<u64>() {
        Ok(value) => value,
        Err(err) => {
            static REPORTED_LIMIT_PARSE_ERROR: OnceLock<()> = OnceLock::new();
            if REPORTED_LIMIT_PARSE_ERROR.set(()).is_ok() {
                tracing::debug!(
                    target: "jrun.memory",
                    raw,
                    error = %err,
                    "failed to parse cgroup memory limit value"
                );
            }
            return None;
        }
    };
    if value >= UNLIMITED_THRESHOLD_BYTES {
        return None;
    }

    Some(value)
}

/// Filesystem roots used to probe the container's resource limits.
///
/// [`CgroupFs::host`] points at the real `/proc` and `/sys/fs/cgroup`; tests
/// build a fake tree and use [`CgroupFs::with_roots`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgroupFs {
    proc_root: PathBuf,
    cgroup_root: PathBuf,
    system_fallback: bool,
}

impl CgroupFs {
    pub fn host() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            cgroup_root: PathBuf::from("/sys/fs/cgroup"),
            system_fallback: true,
        }
    }

    /// Probe a tree rooted elsewhere. Host memory is only taken from
    /// `<proc_root>/meminfo`; there is no fallback to the running system.
    pub fn with_roots(proc_root: impl Into<PathBuf>, cgroup_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            cgroup_root: cgroup_root.into(),
            system_fallback: false,
        }
    }

    /// Parsed `/proc/self/cgroup`, if readable.
    pub fn proc_self_cgroup(&self) -> Option<ProcSelfCgroup> {
        let contents = read_trimmed(&self.proc_root.join("self").join("cgroup"))?;
        Some(parse_proc_self_cgroup(&contents))
    }

    /// The raw enforceable memory limit, before it is cross-checked against
    /// host memory.
    ///
    /// The limit is the smallest one found on the process' cgroup or any of its
    /// ancestors. cgroup v2 is preferred; v1 is consulted when v2 yields
    /// nothing. Without `/proc/self/cgroup` the controller mount roots are
    /// read directly, which is what a container with a private cgroup
    /// namespace sees anyway.
    pub fn memory_limit_bytes(&self) -> Option<u64> {
        let parsed = self.proc_self_cgroup().unwrap_or_default();

        let v2_path = parsed.v2_path.as_deref().unwrap_or("/");
        let v2 = effective_from_ancestors(&self.cgroup_root, v2_path, |dir| {
            read_memory_limit(&dir.join("memory.max"))
        });
        if v2.is_some() {
            return v2;
        }

        let v1_path = parsed.v1_memory_path.as_deref().unwrap_or("/");
        effective_from_ancestors(&self.cgroup_root.join("memory"), v1_path, |dir| {
            read_memory_limit(&dir.join("memory.limit_in_bytes"))
        })
    }

    /// Total physical memory of the host in bytes.
    pub fn host_memory_bytes(&self) -> Option<u64> {
        let from_meminfo = read_trimmed(&self.proc_root.join("meminfo"))
            .and_then(|contents| parse_meminfo_total_bytes(&contents));
        if from_meminfo.is_some() || !self.system_fallback {
            return from_meminfo;
        }
        system_total_memory_bytes()
    }

    /// The memory ceiling the launcher should size the heap against.
    ///
    /// Present only when a limit exists and is strictly below host memory;
    /// unreadable files, sentinel values and limits at or above host memory
    /// all yield `None`.
    pub fn detect_ceiling(&self) -> Option<u64> {
        effective_memory_ceiling(self.memory_limit_bytes(), self.host_memory_bytes())
    }

    /// CPU quota rounded up to whole cores, if the cgroup enforces one.
    pub fn cpu_limit_cores(&self) -> Option<u32> {
        let parsed = self.proc_self_cgroup().unwrap_or_default();

        let v2_path = parsed.v2_path.as_deref().unwrap_or("/");
        let v2 = effective_from_ancestors(&self.cgroup_root, v2_path, |dir| {
            read_trimmed(&dir.join("cpu.max")).and_then(|raw| parse_cpu_max_cores(&raw))
        });
        if v2.is_some() {
            return v2;
        }

        let mount = ["cpu,cpuacct", "cpuacct,cpu", "cpu"]
            .iter()
            .map(|name| self.cgroup_root.join(name))
            .find(|dir| dir.is_dir())?;
        let v1_path = parsed.v1_cpu_path.as_deref().unwrap_or("/");
        effective_from_ancestors(&mount, v1_path, |dir| {
            let quota = read_trimmed(&dir.join("cpu.cfs_quota_us"))?;
            let period = read_trimmed(&dir.join("cpu.cfs_period_us"))?;
            parse_cfs_quota_cores(&quota, &period)
        })
    }
}

fn read_memory_limit(path: &Path) -> Option<u64> {
    read_trimmed(path).and_then(|raw| parse_cgroup_memory_limit_bytes(&raw))
}

fn read_trimmed(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text.trim().to_string()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            // Some environments restrict cgroup files; report only the first
            // unexpected failure.
            static REPORTED_READ_ERROR: OnceLock<()> = OnceLock::new();
            if REPORTED_READ_ERROR.set(()).is_ok() {
                tracing::debug!(
                    target: "jrun.memory",
                    path = %path.display(),
                    error = %err,
                    "failed to read cgroup file"
                );
            }
            None
        }
    }
}

fn relative_cgroup_path(path: &str) -> PathBuf {
    PathBuf::from(path.trim_start_matches('/'))
}

/// Walk from `cgroup_path` up to the controller mount and keep the smallest
/// value `read` returns. A child cgroup can never use more than its parents
/// allow.
fn effective_from_ancestors<T: Ord>(
    mount: &Path,
    cgroup_path: &str,
    read: impl Fn(&Path) -> Option<T>,
) -> Option<T> {
    let mut rel = relative_cgroup_path(cgroup_path);
    let mut best: Option<T> = None;

    loop {
        if let Some(value) = read(&mount.join(&rel)) {
            best = Some(match best {
                Some(best) => best.min(value),
                None => value,
            });
        }

        if !rel.pop() {
            break;
        }
    }

    best
}
