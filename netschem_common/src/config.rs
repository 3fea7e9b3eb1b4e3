use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which component of a `min:typ:max` delay triple is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayCorner {
    /// Fastest corner.
    Min,
    /// Typical corner.
    #[default]
    Typ,
    /// Slowest corner.
    Max,
}

impl DelayCorner {
    /// Picks this corner's component out of a delay value.
    ///
    /// A single number is returned as-is. In a triple, an empty component for
    /// this corner falls back to the first non-empty component; a value with
    /// no non-empty component yields `None`.
    pub fn select<'a>(&self, value: &'a str) -> Option<&'a str> {
        let parts: Vec<&str> = value.split(':').map(str::trim).collect();
        if parts.len() == 1 {
            return Some(parts[0]).filter(|p| !p.is_empty());
        }

        let index = match self {
            Self::Min => 0,
            Self::Typ => 1,
            Self::Max => 2,
        };

        parts
            .get(index)
            .copied()
            .filter(|p| !p.is_empty())
            .or_else(|| parts.iter().copied().find(|p| !p.is_empty()))
    }
}

impl fmt::Display for DelayCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => write!(f, "min"),
            Self::Typ => write!(f, "typ"),
            Self::Max => write!(f, "max"),
        }
    }
}

/// Error returned when parsing a [`DelayCorner`] from text.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("unknown delay corner '{0}', expected min/typ/max")]
pub struct UnknownCornerError(pub String);

impl FromStr for DelayCorner {
    type Err = UnknownCornerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "min" => Ok(Self::Min),
            "typ" | "typical" => Ok(Self::Typ),
            "max" => Ok(Self::Max),
            _ => Err(UnknownCornerError(s.to_string())),
        }
    }
}

/// Options for a single compile invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Delay corner read from the timing document.
    pub corner: DelayCorner,
    /// Reject interconnects whose endpoints resolve to no known net.
    pub strict_endpoints: bool,
    /// Overrides the module name found in the structural document.
    pub module_name: Option<String>,
}

impl CompileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_corner(mut self, corner: DelayCorner) -> Self {
        self.corner = corner;
        self
    }

    pub fn with_strict_endpoints(mut self, strict: bool) -> Self {
        self.strict_endpoints = strict;
        self
    }

    pub fn with_module_name(mut self, name: &str) -> Self {
        self.module_name = Some(name.to_string());
        self
    }
}
