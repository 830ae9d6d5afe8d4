//! Locating the `java` executable and its major version.

mod discovery;
mod version;

pub use discovery::{JavaInstallation, JdkDiscoveryError};
pub use version::{parse_major_version, parse_release_major_version, read_release_major_version};
