use thiserror::Error;

pub const KB: u64 = 1024;
pub const MB: u64 = 1024 * KB;
pub const GB: u64 = 1024 * MB;
pub const TB: u64 = 1024 * GB;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ByteSizeError {
    #[error("byte size is empty")]
    Empty,
    #[error("invalid byte size `{0}` (expected e.g. `314572800`, `300M` or `1GiB`)")]
    Invalid(String),
    #[error("byte size `{0}` does not fit in 64 bits")]
    Overflow(String),
}

/// Parse a byte count with an optional binary unit suffix.
///
/// Accepts `K`, `M`, `G` and `T`, optionally followed by `i`, `iB` or `B`,
/// case-insensitively. All units are powers of 1024.
pub fn parse_byte_size(input: &str) -> Result<u64, ByteSizeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ByteSizeError::Empty);
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split);
    if digits.is_empty() {
        return Err(ByteSizeError::Invalid(trimmed.to_string()));
    }
    let value = digits
        .parse::<u64>()
        .map_err(|_| ByteSizeError::Overflow(trimmed.to_string()))?;

    let multiplier = match suffix.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "ki" | "kib" => KB,
        "m" | "mb" | "mi" | "mib" => MB,
        "g" | "gb" | "gi" | "gib" => GB,
        "t" | "tb" | "ti" | "tib" => TB,
        _ => return Err(ByteSizeError::Invalid(trimmed.to_string())),
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| ByteSizeError::Overflow(trimmed.to_string()))
}
