//! Configuration for the `jrun` launcher.
//!
//! Two sources feed the launcher:
//! - environment variables ([`LauncherConfig`]), the primary interface inside
//!   container images;
//! - an optional TOML file ([`JrunConfig`]) overriding the heap-sizing policy
//!   constants and logging.
//!
//! Malformed values are fatal. A bad heap flag would make the JVM fail far
//! less legibly than the launcher does.

mod env;
mod logging;

use std::path::{Path, PathBuf};

use jrun_memory::LimitOverrides;
use jrun_options::{DebugSettings, HeapDefaults, HeapSettings, JvmOptionSettings, Ratio, UserOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env::EnvReader;

pub use logging::{init_tracing, LoggingConfig};

pub const JAVA_OPTIONS_ENV_VAR: &str = "JAVA_OPTIONS";
pub const JAVA_MAX_MEM_RATIO_ENV_VAR: &str = "JAVA_MAX_MEM_RATIO";
pub const JAVA_INIT_MEM_RATIO_ENV_VAR: &str = "JAVA_INIT_MEM_RATIO";
pub const JAVA_MAJOR_VERSION_ENV_VAR: &str = "JAVA_MAJOR_VERSION";
pub const CONTAINER_MAX_MEMORY_ENV_VAR: &str = "CONTAINER_MAX_MEMORY";
pub const CONTAINER_CORE_LIMIT_ENV_VAR: &str = "CONTAINER_CORE_LIMIT";
pub const JAVA_APP_DIR_ENV_VAR: &str = "JAVA_APP_DIR";
pub const JAVA_LIB_DIR_ENV_VAR: &str = "JAVA_LIB_DIR";
pub const JAVA_APP_JAR_ENV_VAR: &str = "JAVA_APP_JAR";
pub const JAVA_MAIN_CLASS_ENV_VAR: &str = "JAVA_MAIN_CLASS";
pub const JAVA_CLASSPATH_ENV_VAR: &str = "JAVA_CLASSPATH";
pub const JAVA_APP_NAME_ENV_VAR: &str = "JAVA_APP_NAME";
pub const JAVA_DEBUG_ENV_VAR: &str = "JAVA_DEBUG";
pub const JAVA_DEBUG_PORT_ENV_VAR: &str = "JAVA_DEBUG_PORT";
pub const JAVA_DEBUG_SUSPEND_ENV_VAR: &str = "JAVA_DEBUG_SUSPEND";
pub const JAVA_DIAGNOSTICS_ENV_VAR: &str = "JAVA_DIAGNOSTICS";
pub const JAVA_HOME_ENV_VAR: &str = "JAVA_HOME";
pub const JRUN_CONFIG_ENV_VAR: &str = "JRUN_CONFIG_PATH";

pub const DEFAULT_APP_DIR: &str = "/deployments";
pub const CONFIG_FILE_NAME: &str = "jrun.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid value for {name}: `{value}` ({reason})")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep the message only; the default `Display` embeds a source snippet.
        ConfigError::Toml(err.message().to_string())
    }
}

/// Launcher settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// `JAVA_OPTIONS`, verbatim.
    pub java_options: String,
    pub max_mem_ratio: Option<Ratio>,
    pub init_mem_ratio: Option<Ratio>,
    pub java_major_version: Option<u32>,
    pub container_max_memory: Option<u64>,
    pub container_core_limit: Option<u32>,
    pub app_dir: PathBuf,
    pub lib_dir: PathBuf,
    pub app_jar: Option<PathBuf>,
    pub main_class: Option<String>,
    pub classpath: Option<String>,
    pub app_name: Option<String>,
    pub java_home: Option<PathBuf>,
    pub debug: Option<DebugSettings>,
    pub diagnostics: bool,
    pub config_path: Option<PathBuf>,
}

impl LauncherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader::new(lookup);

        let app_dir = env
            .path(JAVA_APP_DIR_ENV_VAR)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_APP_DIR));
        let lib_dir = env
            .path(JAVA_LIB_DIR_ENV_VAR)
            .unwrap_or_else(|| app_dir.clone());

        let debug = if env.flag(JAVA_DEBUG_ENV_VAR) {
            let port = env
                .parsed(JAVA_DEBUG_PORT_ENV_VAR, |value| {
                    value
                        .parse::<u16>()
                        .map_err(|_| "expected a TCP port".to_string())
                })?
                .unwrap_or(DebugSettings::DEFAULT_PORT);
            Some(DebugSettings {
                port,
                suspend: env.flag(JAVA_DEBUG_SUSPEND_ENV_VAR),
            })
        } else {
            None
        };

        let config = Self {
            java_options: env.raw(JAVA_OPTIONS_ENV_VAR).unwrap_or_default(),
            max_mem_ratio: env.ratio(JAVA_MAX_MEM_RATIO_ENV_VAR)?,
            init_mem_ratio: env.ratio(JAVA_INIT_MEM_RATIO_ENV_VAR)?,
            java_major_version: env.parsed(JAVA_MAJOR_VERSION_ENV_VAR, |value| {
                jrun_jdk::parse_major_version(value)
                    .ok_or_else(|| "expected a Java major version such as `8` or `1.7`".to_string())
            })?,
            container_max_memory: env.parsed(CONTAINER_MAX_MEMORY_ENV_VAR, |value| {
                jrun_memory::parse_byte_size(value).map_err(|err| err.to_string())
            })?,
            container_core_limit: env.parsed(CONTAINER_CORE_LIMIT_ENV_VAR, |value| {
                match value.parse::<u32>() {
                    Ok(cores) if cores > 0 => Ok(cores),
                    _ => Err("expected a positive number of cores".to_string()),
                }
            })?,
            app_dir,
            lib_dir,
            app_jar: env.path(JAVA_APP_JAR_ENV_VAR),
            main_class: env.string(JAVA_MAIN_CLASS_ENV_VAR),
            classpath: env.string(JAVA_CLASSPATH_ENV_VAR),
            app_name: env.string(JAVA_APP_NAME_ENV_VAR),
            java_home: env.path(JAVA_HOME_ENV_VAR),
            debug,
            diagnostics: env.flag(JAVA_DIAGNOSTICS_ENV_VAR),
            config_path: env.path(JRUN_CONFIG_ENV_VAR),
        };

        Ok(config)
    }

    pub fn limit_overrides(&self) -> LimitOverrides {
        LimitOverrides {
            memory_bytes: self.container_max_memory,
            cpu_cores: self.container_core_limit,
        }
    }

    /// Settings for the option policies.
    ///
    /// `detected_major_version` is used only when `JAVA_MAJOR_VERSION` is
    /// unset.
    pub fn option_settings(
        &self,
        file: &JrunConfig,
        detected_major_version: Option<u32>,
    ) -> Result<JvmOptionSettings, ConfigError> {
        Ok(JvmOptionSettings {
            user_options: UserOptions::parse(&self.java_options),
            heap: HeapSettings {
                max_ratio: self.max_mem_ratio,
                init_ratio: self.init_mem_ratio,
                defaults: file.memory.heap_defaults()?,
            },
            java_major_version: self.java_major_version.or(detected_major_version),
            debug: self.debug,
            diagnostics: self.diagnostics,
        })
    }

    /// Locate the optional TOML config.
    ///
    /// Search order:
    /// 1) `JRUN_CONFIG_PATH` (absolute or relative to the app directory)
    /// 2) `jrun.toml` in the app directory
    pub fn discover_config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(if path.is_absolute() {
                path.clone()
            } else {
                self.app_dir.join(path)
            });
        }

        let candidate = self.app_dir.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Load the TOML config if one is discovered, defaults otherwise.
    ///
    /// An explicitly configured path that cannot be read is an error.
    pub fn load_file_config(&self) -> Result<JrunConfig, ConfigError> {
        match self.discover_config_path() {
            Some(path) => JrunConfig::load_from_path(path),
            None => Ok(JrunConfig::default()),
        }
    }
}

/// A byte size which supports both raw byte counts and human-friendly suffixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteSize(pub u64);

impl Serialize for ByteSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for ByteSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bytes(u64),
            Human(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Bytes(value) => Ok(ByteSize(value)),
            Repr::Human(value) => jrun_memory::parse_byte_size(&value)
                .map(ByteSize)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Overrides for the size-based max-heap defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryPolicyConfig {
    /// Ceilings at or below this size use `small_heap_ratio` (default 300 MiB).
    #[serde(default)]
    pub small_heap_threshold: Option<ByteSize>,

    /// Percentage of the ceiling for small containers (default 25).
    #[serde(default)]
    pub small_heap_ratio: Option<u64>,

    /// Percentage of the ceiling for larger containers (default 50).
    #[serde(default)]
    pub large_heap_ratio: Option<u64>,
}

impl MemoryPolicyConfig {
    pub fn heap_defaults(&self) -> Result<HeapDefaults, ConfigError> {
        let defaults = HeapDefaults::default();
        let ratio = |key: &str, value: Option<u64>, fallback: Ratio| match value {
            Some(percent) => Ratio::new(percent).map_err(|err| ConfigError::InvalidValue {
                name: format!("memory.{key}"),
                value: percent.to_string(),
                reason: err.to_string(),
            }),
            None => Ok(fallback),
        };

        Ok(HeapDefaults {
            small_heap_threshold: self
                .small_heap_threshold
                .map_or(defaults.small_heap_threshold, |size| size.0),
            small_heap_ratio: ratio(
                "small_heap_ratio",
                self.small_heap_ratio,
                defaults.small_heap_ratio,
            )?,
            large_heap_ratio: ratio(
                "large_heap_ratio",
                self.large_heap_ratio,
                defaults.large_heap_ratio,
            )?,
        })
    }
}

/// Top-level `jrun.toml`.
///
/// ```toml
/// [memory]
/// small_heap_threshold = "300MiB"
/// small_heap_ratio = 25
/// large_heap_ratio = 50
///
/// [logging]
/// level = "info"
/// json = false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JrunConfig {
    #[serde(default)]
    pub memory: MemoryPolicyConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl JrunConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: JrunConfig = toml::from_str(text)?;
        // Surface bad ratios at load time rather than at option derivation.
        config.memory.heap_defaults()?;
        Ok(config)
    }
}
