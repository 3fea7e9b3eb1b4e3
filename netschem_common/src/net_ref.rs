//! Net references as they appear on cell ports.

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize_netlist_name;

lazy_static! {
    static ref CONSTANT_RE: Regex = Regex::new(r"^(?:\d*'[bB])?([01])$").unwrap();
}

/// A single-bit value bound to a cell port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NetRef {
    /// A named net, normalized.
    Net(String),
    /// A constant value (0 or 1).
    Constant(bool),
}

impl NetRef {
    /// Parses a port expression such as `\foo_output_0_0 `, `clk` or `1'b0`.
    ///
    /// Returns `None` for an empty expression.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(caps) = CONSTANT_RE.captures(trimmed) {
            return Some(Self::Constant(&caps[1] == "1"));
        }
        Some(Self::Net(normalize_netlist_name(trimmed)))
    }

    /// The literal written into a `connections` map for a constant.
    pub const fn literal(value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }
}

impl std::fmt::Display for NetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Net(name) => write!(f, "{name}"),
            Self::Constant(value) => write!(f, "{}", if *value { "1'b1" } else { "1'b0" }),
        }
    }
}
