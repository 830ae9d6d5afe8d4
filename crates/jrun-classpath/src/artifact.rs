use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::ArtifactError;

/// What the JVM is asked to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    /// `java ... -cp <classpath> <name>`
    MainClass { name: String },
    /// `java ... -jar <path>`
    Jar { path: PathBuf },
}

#[derive(Debug, Clone, Copy)]
pub struct ArtifactRequest<'a> {
    pub app_dir: &'a Path,
    pub app_jar: Option<&'a Path>,
    pub main_class: Option<&'a str>,
}

/// Resolve the artifact to run.
///
/// An explicit main class wins, then an explicit jar (relative paths are
/// resolved against the app directory). Otherwise the app directory must
/// contain exactly one `*.jar`.
pub fn resolve_artifact(request: &ArtifactRequest<'_>) -> Result<Artifact, ArtifactError> {
    if let Some(name) = request.main_class {
        return Ok(Artifact::MainClass {
            name: name.to_string(),
        });
    }

    if let Some(jar) = request.app_jar {
        let path = if jar.is_absolute() {
            jar.to_path_buf()
        } else {
            request.app_dir.join(jar)
        };
        if !path.is_file() {
            return Err(ArtifactError::MissingJar { path });
        }
        return Ok(Artifact::Jar { path });
    }

    let mut jars = find_jars(request.app_dir)?;
    match jars.len() {
        0 => Err(ArtifactError::NoArtifact {
            dir: request.app_dir.to_path_buf(),
        }),
        1 => {
            let path = jars.remove(0);
            tracing::debug!(target: "jrun.classpath", jar = %path.display(), "auto-detected application jar");
            Ok(Artifact::Jar { path })
        }
        _ => Err(ArtifactError::AmbiguousJars {
            dir: request.app_dir.to_path_buf(),
            jars,
        }),
    }
}

/// `*.jar` files directly inside `dir`, sorted by file name. A missing
/// directory has no jars.
pub fn find_jars(dir: &Path) -> Result<Vec<PathBuf>, ArtifactError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut jars = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        let is_jar = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"));
        if is_jar && path.is_file() {
            jars.push(path.to_path_buf());
        }
    }
    Ok(jars)
}
