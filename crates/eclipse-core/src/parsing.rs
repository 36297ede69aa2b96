//! Loose scalar extractors over raw mapping values.
//!
//! The explorer returns mapping values as Aleo plaintext rendered to text,
//! e.g. `100u64`, `true`, `aleo1...` or a whole struct such as
//! `{ owner: aleo1..., min_stake: 100u64, paused: false }`. These functions
//! pull a single scalar out of that text without requiring the text to be
//! well formed. None of them fail: absent or malformed input yields the
//! documented sentinel.
//!
//! For name-addressed access to struct members see [`crate::plaintext`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length of a bech32m-encoded Aleo address.
pub const ADDRESS_MIN_LEN: usize = 59;

/// Unsigned integer type suffix used to anchor [`parse_uint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UintWidth {
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl UintWidth {
    /// Literal suffix as rendered by the chain.
    pub const fn suffix(self) -> &'static str {
        match self {
            UintWidth::U8 => "u8",
            UintWidth::U16 => "u16",
            UintWidth::U32 => "u32",
            UintWidth::U64 => "u64",
            UintWidth::U128 => "u128",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "u8" => Some(UintWidth::U8),
            "u16" => Some(UintWidth::U16),
            "u32" => Some(UintWidth::U32),
            "u64" => Some(UintWidth::U64),
            "u128" => Some(UintWidth::U128),
            _ => None,
        }
    }
}

impl fmt::Display for UintWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Byte ranges of maximal ASCII digit runs in `text`, in order.
fn digit_runs(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let bytes = text.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        while pos < bytes.len() && !bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos >= bytes.len() {
            return None;
        }
        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        Some((start, pos))
    })
}

/// First digit run immediately followed by the `width` suffix.
///
/// Returns `None` when no such token exists or the digits overflow `u128`.
/// Unlike [`parse_uint`] this keeps "absent" and "zero" apart.
pub fn try_parse_uint(raw: Option<&str>, width: UintWidth) -> Option<u128> {
    let raw = raw?;
    let suffix = width.suffix();
    digit_runs(raw)
        .find(|&(_, end)| raw[end..].starts_with(suffix))
        .and_then(|(start, end)| raw[start..end].parse().ok())
}

/// Unsigned integer tagged with `width`, or `0` if absent.
///
/// `0` is ambiguous between "present and zero" and "absent or unparsable";
/// use [`try_parse_uint`] where the distinction matters.
pub fn parse_uint(raw: Option<&str>, width: UintWidth) -> u128 {
    try_parse_uint(raw, width).unwrap_or(0)
}

/// `None` for absent input, otherwise whether `true` occurs anywhere in it.
pub fn parse_bool(raw: Option<&str>) -> Option<bool> {
    raw.map(|text| text.contains("true"))
}

/// `None` for absent input, otherwise the first digit run as an integer.
///
/// Input without any digits yields `Some(0)`. A run too long for `u128`
/// yields `None`.
pub fn parse_field(raw: Option<&str>) -> Option<u128> {
    let raw = raw?;
    match digit_runs(raw).next() {
        Some((start, end)) => raw[start..end].parse().ok(),
        None => Some(0),
    }
}

/// First run of at least [`ADDRESS_MIN_LEN`] lowercase alphanumerics.
pub fn parse_address(raw: Option<&str>) -> Option<String> {
    let bytes = raw?.as_bytes();
    let is_addr_byte = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();

    let mut pos = 0;
    while pos < bytes.len() {
        if !is_addr_byte(bytes[pos]) {
            pos += 1;
            continue;
        }
        let start = pos;
        while pos < bytes.len() && is_addr_byte(bytes[pos]) {
            pos += 1;
        }
        if pos - start >= ADDRESS_MIN_LEN {
            // Every byte in the run is ASCII.
            return Some(String::from_utf8_lossy(&bytes[start..pos]).into_owned());
        }
    }
    None
}
