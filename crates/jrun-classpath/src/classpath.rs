use std::path::{Path, PathBuf};

use crate::artifact::find_jars;
use crate::ArtifactError;

/// Name of the precomputed classpath file inside the lib directory.
pub const CLASSPATH_FILE_NAME: &str = "classpath";

#[derive(Debug, Clone, Copy)]
pub struct ClasspathRequest<'a> {
    pub app_dir: &'a Path,
    pub lib_dir: &'a Path,
    /// `JAVA_CLASSPATH`, used verbatim when set.
    pub explicit: Option<&'a str>,
}

/// Parse a `classpath` file.
///
/// Entries are separated by `:` or whitespace; lines starting with `#` are
/// comments. Relative entries are resolved against `lib_dir`.
pub fn parse_classpath_file(contents: &str, lib_dir: &Path) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(|line| line.split(|c: char| c == ':' || c.is_whitespace()))
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let entry = Path::new(entry);
            if entry.is_absolute() {
                entry.to_path_buf()
            } else {
                lib_dir.join(entry)
            }
        })
        .collect()
}

/// Build the classpath for a main-class launch.
///
/// 1. `JAVA_CLASSPATH`, verbatim;
/// 2. the entries of `<lib_dir>/classpath`;
/// 3. `<app_dir>/.` followed by every jar in `lib_dir`.
pub fn resolve_classpath(request: &ClasspathRequest<'_>) -> Result<String, ArtifactError> {
    if let Some(explicit) = request.explicit {
        return Ok(explicit.to_string());
    }

    let file = request.lib_dir.join(CLASSPATH_FILE_NAME);
    let entries = if file.is_file() {
        let contents = std::fs::read_to_string(&file).map_err(|source| ArtifactError::Io {
            path: file.clone(),
            source,
        })?;
        tracing::debug!(target: "jrun.classpath", file = %file.display(), "using classpath file");
        parse_classpath_file(&contents, request.lib_dir)
    } else {
        let mut entries = vec![request.app_dir.join(".")];
        entries.extend(find_jars(request.lib_dir)?);
        entries
    };

    join_classpath(&entries)
}

fn join_classpath(entries: &[PathBuf]) -> Result<String, ArtifactError> {
    match std::env::join_paths(entries) {
        Ok(joined) => Ok(joined.to_string_lossy().into_owned()),
        Err(source) => {
            let path = entries
                .iter()
                .find(|entry| std::env::join_paths([entry]).is_err())
                .cloned()
                .unwrap_or_default();
            Err(ArtifactError::InvalidClasspathEntry { path, source })
        }
    }
}
