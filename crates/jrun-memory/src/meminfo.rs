/// Extract `MemTotal:` (reported in kB) from `/proc/meminfo` contents, in bytes.
pub fn parse_meminfo_total_bytes(contents: &str) -> Option<u64> {
    for line in contents.lines() {
        let line = line.trim_start();
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            let kb = rest.split_whitespace().next()?.parse::<u64>().ok()?;
            return Some(kb.saturating_mul(1024));
        }
    }
    None
}

/// Total memory as reported by the OS, for platforms without `/proc/meminfo`.
pub(crate) fn system_total_memory_bytes() -> Option<u64> {
    let mut sys = sysinfo::System::new();
    sys.refresh_memory();
    let total = sys.total_memory();
    if total == 0 {
        tracing::debug!(target: "jrun.memory", "system reported zero total memory");
        return None;
    }
    Some(total)
}
