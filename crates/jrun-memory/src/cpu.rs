/// Parse a cgroup v2 `cpu.max` value (`"<quota> <period>"`) into whole cores.
///
/// `max` as the quota means no limit.
pub fn parse_cpu_max_cores(raw: &str) -> Option<u32> {
    let mut parts = raw.split_whitespace();
    let quota = parts.next()?;
    if quota == "max" {
        return None;
    }
    let period = parts.next().unwrap_or("100000");
    cores_from_quota(quota.parse().ok()?, period.parse().ok()?)
}

/// Parse cgroup v1 `cpu.cfs_quota_us` / `cpu.cfs_period_us` into whole cores.
///
/// A quota of `-1` means no limit.
pub fn parse_cfs_quota_cores(quota: &str, period: &str) -> Option<u32> {
    let quota = quota.trim().parse::<i64>().ok()?;
    let period = period.trim().parse::<i64>().ok()?;
    if quota <= 0 || period <= 0 {
        return None;
    }
    cores_from_quota(quota.unsigned_abs(), period.unsigned_abs())
}

fn cores_from_quota(quota: u64, period: u64) -> Option<u32> {
    if quota == 0 || period == 0 {
        return None;
    }
    u32::try_from(quota.div_ceil(period).max(1)).ok()
}
