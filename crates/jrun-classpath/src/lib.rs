//! Which application to run, and with what classpath.
//!
//! Conventions follow the usual container image layout: the application lives
//! in an app directory (`/deployments` by default), libraries in a lib
//! directory that defaults to the app directory, and an optional `classpath`
//! file in the lib directory lists the entries to use.

mod artifact;
mod classpath;

use std::path::PathBuf;

use thiserror::Error;

pub use artifact::{find_jars, resolve_artifact, Artifact, ArtifactRequest};
pub use classpath::{
    parse_classpath_file, resolve_classpath, ClasspathRequest, CLASSPATH_FILE_NAME,
};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("no jar found in {} (set JAVA_APP_JAR or JAVA_MAIN_CLASS)", .dir.display())]
    NoArtifact { dir: PathBuf },

    #[error(
        "found {} jars in {}: {} (set JAVA_APP_JAR or JAVA_MAIN_CLASS)",
        .jars.len(),
        .dir.display(),
        display_paths(.jars)
    )]
    AmbiguousJars { dir: PathBuf, jars: Vec<PathBuf> },

    #[error("application jar {} is not a file", .path.display())]
    MissingJar { path: PathBuf },

    #[error("classpath entry {} cannot be joined: {source}", .path.display())]
    InvalidClasspathEntry {
        path: PathBuf,
        #[source]
        source: std::env::JoinPathsError,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
