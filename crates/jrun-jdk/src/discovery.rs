use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::version::read_release_major_version;

/// The Java runtime the launcher will exec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaInstallation {
    java: PathBuf,
    home: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum JdkDiscoveryError {
    #[error("could not find a `java` executable (tried JAVA_HOME and PATH)")]
    NotFound,

    #[error("JAVA_HOME `{home}` does not contain `bin/{exe}`")]
    MissingJavaBinary { home: PathBuf, exe: &'static str },
}

fn java_exe_name() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

impl JavaInstallation {
    /// The `java` executable.
    pub fn java(&self) -> &Path {
        &self.java
    }

    /// The installation root, when known.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn from_home(home: impl AsRef<Path>) -> Result<Self, JdkDiscoveryError> {
        let home = home.as_ref().to_path_buf();
        let exe = java_exe_name();
        let java = home.join("bin").join(exe);
        if !java.is_file() {
            return Err(JdkDiscoveryError::MissingJavaBinary { home, exe });
        }
        Ok(Self {
            java,
            home: Some(home),
        })
    }

    /// Discover the runtime to launch.
    ///
    /// `JAVA_HOME` wins when set; a `JAVA_HOME` without `bin/java` is an
    /// error rather than a silent fallback. Otherwise the first `java` on
    /// `path_var` is used, and its installation root is inferred by resolving
    /// symlinks (`<home>/bin/java`).
    pub fn discover(
        java_home: Option<&Path>,
        path_var: Option<&OsStr>,
    ) -> Result<Self, JdkDiscoveryError> {
        if let Some(home) = java_home {
            return Self::from_home(home);
        }

        let java = path_var
            .and_then(find_java_on_path)
            .ok_or(JdkDiscoveryError::NotFound)?;
        let home = java
            .canonicalize()
            .ok()
            .and_then(|resolved| Some(resolved.parent()?.parent()?.to_path_buf()));

        tracing::debug!(
            target: "jrun.jdk",
            java = %java.display(),
            home = ?home,
            "found java on PATH"
        );
        Ok(Self { java, home })
    }

    /// Major version from the installation's `release` file.
    pub fn major_version(&self) -> Option<u32> {
        self.home.as_deref().and_then(read_release_major_version)
    }
}

fn find_java_on_path(path_var: &OsStr) -> Option<PathBuf> {
    let exe_name = java_exe_name();

    for dir in std::env::split_paths(path_var) {
        let candidate = dir.join(exe_name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}
