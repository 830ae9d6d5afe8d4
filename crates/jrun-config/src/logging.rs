use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

/// `[logging]` in `jrun.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`warn`, `debug`, ...) or any `EnvFilter` directive string
    /// such as `warn,jrun.memory=debug`.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// One JSON object per event instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    fn default_level() -> String {
        DEFAULT_LEVEL.to_owned()
    }

    /// The configured level as filter directives. Bare level names are
    /// case-insensitive and `warning` means `warn`.
    fn directives(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            return Self::default_level();
        }
        let lower = level.to_ascii_lowercase();
        match lower.as_str() {
            "warning" => "warn".to_owned(),
            "trace" | "debug" | "info" | "warn" | "error" | "off" => lower,
            _ => level.to_owned(),
        }
    }

    /// The effective filter: the configured level with `RUST_LOG` layered on
    /// top.
    pub fn env_filter(&self) -> EnvFilter {
        self.env_filter_with(std::env::var("RUST_LOG").ok().as_deref())
    }

    /// Invalid directives fall back to whichever part still parses, and to
    /// `warn` when nothing does.
    fn env_filter_with(&self, rust_log: Option<&str>) -> EnvFilter {
        let base = self.directives();
        let candidates = match rust_log.map(str::trim).filter(|extra| !extra.is_empty()) {
            Some(extra) => vec![format!("{base},{extra}"), extra.to_owned(), base],
            None => vec![base],
        };
        candidates
            .into_iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
    }
}

/// Install the global subscriber, writing to stderr so stdout only carries
/// command output. Later calls are no-ops.
pub fn init_tracing(config: &LoggingConfig) {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let json = config.json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        });
        let text = (!config.json)
            .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

        let result = tracing_subscriber::registry()
            .with(config.env_filter())
            .with(json)
            .with(text)
            .try_init();
        if let Err(err) = result {
            // A test harness may have installed its own subscriber first.
            tracing::debug!(target: "jrun.config", error = %err, "tracing already initialized");
        }
    });
}
