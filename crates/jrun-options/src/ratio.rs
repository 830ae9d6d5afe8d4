use jrun_memory::MB;
use thiserror::Error;

/// A percentage in `0..=100` used to turn a memory ceiling into a heap size.
///
/// `0` is meaningful: it explicitly disables the derived flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ratio(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("ratio must be a percentage between 0 and 100, got {0}")]
pub struct RatioError(pub u64);

impl Ratio {
    pub const DISABLED: Ratio = Ratio(0);
    pub const QUARTER: Ratio = Ratio(25);
    pub const HALF: Ratio = Ratio(50);

    pub fn new(percent: u64) -> Result<Self, RatioError> {
        match u8::try_from(percent) {
            Ok(value) if value <= 100 => Ok(Self(value)),
            _ => Err(RatioError(percent)),
        }
    }

    pub fn percent(self) -> u32 {
        u32::from(self.0)
    }

    pub fn is_disabled(self) -> bool {
        self.0 == 0
    }
}

/// Which heap bound a derived flag sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapKind {
    /// `-Xmx`
    Max,
    /// `-Xms`
    Initial,
}

impl HeapKind {
    pub fn suffix(self) -> &'static str {
        match self {
            HeapKind::Max => "mx",
            HeapKind::Initial => "ms",
        }
    }
}

/// `ceiling_bytes * ratio_percent / 100` expressed in MiB, rounded half-up.
///
/// No clamping: a ratio that yields `0` or an absurd size is the caller's
/// problem.
pub fn heap_mebibytes(ceiling_bytes: u64, ratio_percent: u32) -> u64 {
    let mebibytes = ceiling_bytes as f64 * f64::from(ratio_percent) / 100.0 / MB as f64;
    (mebibytes + 0.5) as u64
}

/// Render a heap flag such as `-Xmx512m`.
pub fn compute_option(ceiling_bytes: u64, ratio_percent: u32, kind_suffix: &str) -> String {
    format!(
        "-X{kind_suffix}{}m",
        heap_mebibytes(ceiling_bytes, ratio_percent)
    )
}
