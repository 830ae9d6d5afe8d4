use std::path::Path;

/// Parse a Java version string into its major version.
///
/// Handles both the legacy `1.x` scheme (`1.7`, `1.8.0_392`) and the modern
/// one (`11`, `17.0.2`, `21-ea`).
pub fn parse_major_version(version: &str) -> Option<u32> {
    let version = version.trim().trim_matches('"');
    let mut parts = version.split(|c: char| !c.is_ascii_digit());
    let first = parts.next()?.parse::<u32>().ok()?;
    if first == 1 {
        let rest = version.strip_prefix("1.")?;
        let second = rest.split(|c: char| !c.is_ascii_digit()).next()?;
        return second.parse::<u32>().ok();
    }
    Some(first)
}

/// Extract the major version from a JDK `release` file (`JAVA_VERSION="..."`).
pub fn parse_release_major_version(contents: &str) -> Option<u32> {
    contents.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if key.trim() == "JAVA_VERSION" {
            parse_major_version(value)
        } else {
            None
        }
    })
}

pub fn read_release_major_version(home: &Path) -> Option<u32> {
    let path = home.join("release");
    match std::fs::read_to_string(&path) {
        Ok(contents) => parse_release_major_version(&contents),
        Err(err) => {
            tracing::debug!(
                target: "jrun.jdk",
                path = %path.display(),
                error = %err,
                "could not read JDK release file"
            );
            None
        }
    }
}
