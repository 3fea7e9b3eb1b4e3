use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

lazy_static! {
    static ref ESCAPED_IDSTRING_RE: Regex = Regex::new(r"^\\(\S+)$").unwrap();
    static ref SIMPLE_IDSTRING_RE: Regex =
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_$]*(?:\[\d+\])?)$").unwrap();
}

/// An identifier as spelled in a structural netlist.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Hash)]
pub enum IdString {
    // clk, lut_out[3]
    Simple(String),
    // "\\lut_$auto$rtlil.cc:2714:MuxGate$1212 "
    Escaped(String),
}

impl IdString {
    /// The identifier with any escape marker removed.
    pub fn name(&self) -> &str {
        match self {
            IdString::Simple(name) | IdString::Escaped(name) => name,
        }
    }

    pub fn is_escaped(&self) -> bool {
        matches!(self, IdString::Escaped(_))
    }
}

impl Display for IdString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdString::Simple(name) => write!(f, "{name}"),
            IdString::Escaped(name) => write!(f, "\\{name} "),
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum IdStringError {
    #[error("not a netlist identifier: {0:?}")]
    InvalidFormat(String),
}

impl TryFrom<&str> for IdString {
    type Error = IdStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if let Some(caps) = ESCAPED_IDSTRING_RE.captures(trimmed) {
            return Ok(IdString::Escaped(caps[1].to_string()));
        } else if let Some(caps) = SIMPLE_IDSTRING_RE.captures(trimmed) {
            return Ok(IdString::Simple(caps[1].to_string()));
        }
        Err(IdStringError::InvalidFormat(value.to_string()))
    }
}

/// Normalizes a structural-netlist identifier to its bare name.
///
/// Text that is not a well-formed identifier is returned trimmed, so that
/// the caller can still key lookups on it.
pub fn normalize_netlist_name(raw: &str) -> String {
    match IdString::try_from(raw) {
        Ok(id) => id.name().to_string(),
        Err(_) => raw.trim().to_string(),
    }
}

/// Normalizes an instance or port name from a timing document.
///
/// SDF escapes special characters with a backslash (`lut_\$auto\.cc`,
/// `latch_\\Q`). Each `\x` becomes `x`, so an escaped backslash survives as
/// one `\`. Surrounding quotes and whitespace are removed, and the result
/// matches [`normalize_netlist_name`] of the same instance.
pub fn normalize_timing_name(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('"').trim();
    if !trimmed.contains('\\') {
        return trimmed.to_string();
    }

    let mut name = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars();
    while let Some(c) = chars.next() {
        match c {
            // A trailing lone backslash has nothing to escape and is kept.
            '\\' => name.push(chars.next().unwrap_or('\\')),
            other => name.push(other),
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_round_trips_through_display() {
        let id = IdString::try_from("\\foo$bar.baz ").unwrap();
        assert_eq!(id, IdString::Escaped("foo$bar.baz".to_string()));
        assert_eq!(id.to_string(), "\\foo$bar.baz ");
        assert!(id.is_escaped());
        assert!(!IdString::try_from("clk").unwrap().is_escaped());
    }

    #[test]
    fn timing_escapes_unescape_once() {
        assert_eq!(normalize_timing_name(r"latch_\\Q"), r"latch_\Q");
        assert_eq!(normalize_timing_name(r"a\.b\\\$c"), r"a.b\$c");
        assert_eq!(normalize_timing_name("x\\"), "x\\");
    }

    #[test]
    fn rejects_garbage() {
        assert!(IdString::try_from("1'b0").is_err());
        assert!(IdString::try_from("").is_err());
    }
}
