//! Top-level interface points of a schematic.

use contracts::*;
use serde::{Deserialize, Serialize};

/// Direction of a module port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireDirection {
    Input,
    Output,
}

impl WireDirection {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl std::fmt::Display for WireDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared module port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalWire {
    name: String,
    #[serde(rename = "type")]
    direction: WireDirection,
}

impl ExternalWire {
    /// Creates the wire for a port, named `ext_<direction>_<raw name>`.
    #[debug_requires(!raw_name.is_empty())]
    pub fn from_port(direction: WireDirection, raw_name: &str) -> Self {
        Self {
            name: Self::canonical_name(direction, raw_name),
            direction,
        }
    }

    pub fn canonical_name(direction: WireDirection, raw_name: &str) -> String {
        format!("ext_{direction}_{raw_name}")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn direction(&self) -> WireDirection {
        self.direction
    }
}
