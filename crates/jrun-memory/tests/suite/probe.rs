use std::fs;
use std::path::Path;

use jrun_memory::{CgroupFs, ContainerLimits, LimitOverrides, GB, MB};
use tempfile::TempDir;

const HOST_KB: u64 = 4 * 1024 * 1024; // 4 GiB

struct FakeHost {
    dir: TempDir,
}

impl FakeHost {
    fn new(proc_self_cgroup: Option<&str>) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("proc/self")).unwrap();
        fs::create_dir_all(dir.path().join("cgroup")).unwrap();
        fs::write(
            dir.path().join("proc/meminfo"),
            format!("MemTotal:       {HOST_KB} kB\nMemFree:        1024 kB\n"),
        )
        .unwrap();
        if let Some(contents) = proc_self_cgroup {
            fs::write(dir.path().join("proc/self/cgroup"), contents).unwrap();
        }
        Self { dir }
    }

    fn write(&self, rel: &str, contents: &str) {
        let path = self.dir.path().join("cgroup").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn fs(&self) -> CgroupFs {
        let root: &Path = self.dir.path();
        CgroupFs::with_roots(root.join("proc"), root.join("cgroup"))
    }
}

#[test]
fn v2_limit_below_host_memory_is_the_ceiling() {
    let host = FakeHost::new(Some("0::/app\n"));
    host.write("app/memory.max", "1073741824\n");

    assert_eq!(host.fs().memory_limit_bytes(), Some(GB));
    assert_eq!(host.fs().detect_ceiling(), Some(GB));
}

#[test]
fn v2_max_sentinel_means_no_ceiling() {
    let host = FakeHost::new(Some("0::/app\n"));
    host.write("app/memory.max", "max\n");

    assert_eq!(host.fs().detect_ceiling(), None);
}

#[test]
fn limit_equal_to_host_memory_is_ignored() {
    let host = FakeHost::new(Some("0::/\n"));
    host.write("memory.max", &(HOST_KB * 1024).to_string());

    assert_eq!(host.fs().memory_limit_bytes(), Some(HOST_KB * 1024));
    assert_eq!(host.fs().detect_ceiling(), None);
}

#[test]
fn limit_above_host_memory_is_ignored() {
    let host = FakeHost::new(Some("0::/\n"));
    host.write("memory.max", &(HOST_KB * 1024 * 2).to_string());

    assert_eq!(host.fs().detect_ceiling(), None);
}

#[test]
fn tighter_ancestor_limit_wins() {
    let host = FakeHost::new(Some("0::/outer/inner\n"));
    host.write("outer/memory.max", "536870912");
    host.write("outer/inner/memory.max", "max");

    assert_eq!(host.fs().detect_ceiling(), Some(512 * MB));
}

#[test]
fn v1_memory_controller_is_used_when_v2_has_no_limit() {
    let host = FakeHost::new(Some(
        "5:memory:/docker/abc\n4:cpu,cpuacct:/docker/abc\n0::/\n",
    ));
    host.write("memory/docker/abc/memory.limit_in_bytes", "314572800\n");

    assert_eq!(host.fs().detect_ceiling(), Some(300 * MB));
}

#[test]
fn v1_unbounded_sentinel_means_no_ceiling() {
    let host = FakeHost::new(Some("5:memory:/\n"));
    host.write("memory/memory.limit_in_bytes", "9223372036854771712\n");

    assert_eq!(host.fs().detect_ceiling(), None);
}

#[test]
fn namespaced_container_reads_mount_root_without_proc_self_cgroup() {
    let host = FakeHost::new(None);
    host.write("memory/memory.limit_in_bytes", "268435456\n");

    assert_eq!(host.fs().detect_ceiling(), Some(256 * MB));
}

#[test]
fn missing_limit_files_mean_no_ceiling() {
    let host = FakeHost::new(Some("0::/app\n"));

    assert_eq!(host.fs().memory_limit_bytes(), None);
    assert_eq!(host.fs().detect_ceiling(), None);
}

#[test]
fn cpu_quota_is_read_from_v2_and_v1() {
    let v2 = FakeHost::new(Some("0::/app\n"));
    v2.write("app/cpu.max", "250000 100000\n");
    assert_eq!(v2.fs().cpu_limit_cores(), Some(3));

    let v1 = FakeHost::new(Some("4:cpu,cpuacct:/docker/abc\n"));
    v1.write("cpu,cpuacct/docker/abc/cpu.cfs_quota_us", "100000\n");
    v1.write("cpu,cpuacct/docker/abc/cpu.cfs_period_us", "100000\n");
    assert_eq!(v1.fs().cpu_limit_cores(), Some(1));

    let unlimited = FakeHost::new(Some("0::/app\n"));
    unlimited.write("app/cpu.max", "max 100000\n");
    assert_eq!(unlimited.fs().cpu_limit_cores(), None);
}

#[test]
fn detect_combines_probes_and_overrides() {
    let host = FakeHost::new(Some("0::/app\n"));
    host.write("app/memory.max", "1073741824");
    host.write("app/cpu.max", "200000 100000");

    let detected = ContainerLimits::detect(&host.fs(), LimitOverrides::default());
    assert_eq!(
        detected,
        ContainerLimits {
            memory_bytes: Some(GB),
            host_memory_bytes: Some(HOST_KB * 1024),
            cpu_cores: Some(2),
        }
    );

    let overridden = ContainerLimits::detect(
        &host.fs(),
        LimitOverrides {
            memory_bytes: Some(512 * MB),
            cpu_cores: Some(1),
        },
    );
    assert_eq!(overridden.memory_bytes, Some(512 * MB));
    assert_eq!(overridden.cpu_cores, Some(1));
}

#[test]
fn override_is_still_cross_checked_against_host_memory() {
    let host = FakeHost::new(Some("0::/app\n"));

    let limits = ContainerLimits::detect(
        &host.fs(),
        LimitOverrides {
            memory_bytes: Some(HOST_KB * 1024),
            cpu_cores: None,
        },
    );
    assert_eq!(limits.memory_bytes, None);
}
