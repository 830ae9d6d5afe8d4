use std::sync::OnceLock;

use regex::Regex;

/// Flags the policies look for in the user's own options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    /// `-Xmx...`
    MaxHeap,
    /// `-Xms...`
    InitialHeap,
    /// `-XX:+Use<Name>GC`
    GarbageCollector,
    /// `-XX:ParallelGCThreads=...`
    ParallelGcThreads,
    /// `-XX:ConcGCThreads=...`
    ConcGcThreads,
    /// `-Djava.util.concurrent.ForkJoinPool.common.parallelism=...`
    ForkJoinParallelism,
    /// `-agentlib:jdwp...` or the legacy `-Xrunjdwp...`
    JdwpAgent,
}

impl FlagKind {
    fn matches(self, token: &str) -> bool {
        match self {
            FlagKind::MaxHeap => token.starts_with("-Xmx"),
            FlagKind::InitialHeap => token.starts_with("-Xms"),
            FlagKind::GarbageCollector => collector_regex().is_match(token),
            FlagKind::ParallelGcThreads => token.starts_with("-XX:ParallelGCThreads="),
            FlagKind::ConcGcThreads => token.starts_with("-XX:ConcGCThreads="),
            FlagKind::ForkJoinParallelism => {
                token.starts_with("-Djava.util.concurrent.ForkJoinPool.common.parallelism=")
            }
            FlagKind::JdwpAgent => {
                token.starts_with("-agentlib:jdwp") || token.starts_with("-Xrunjdwp")
            }
        }
    }
}

fn collector_regex() -> &'static Regex {
    static COLLECTOR_RE: OnceLock<Regex> = OnceLock::new();
    COLLECTOR_RE.get_or_init(|| {
        Regex::new(r"^-XX:\+Use\w*GC$").expect("collector regex should compile")
    })
}

/// The user's `JAVA_OPTIONS`, split into whitespace-separated tokens.
///
/// Detection is token-prefix matching only. A flag spelled in a form not
/// covered by [`FlagKind`] (for example `-XX:MaxHeapSize=1g` instead of
/// `-Xmx1g`) goes unnoticed, and the launcher may add a redundant derived flag
/// after it. The JVM lets the last occurrence win, so such a derived flag
/// would override the user's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserOptions {
    raw: String,
    tokens: Vec<String>,
}

impl UserOptions {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            tokens: raw.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// The options exactly as supplied.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn contains(&self, kind: FlagKind) -> bool {
        self.tokens().any(|token| kind.matches(token))
    }
}

impl From<&str> for UserOptions {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
