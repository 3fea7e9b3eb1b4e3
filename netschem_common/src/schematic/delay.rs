use std::fmt;

use serde::{Deserialize, Serialize};

/// A delay figure carried verbatim from the timing document.
///
/// Serialized as a bare string. The neutral value `"0"` stands in for any
/// element without timing data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Delay(String);

impl Delay {
    pub const NEUTRAL: &'static str = "0";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn neutral() -> Self {
        Self(Self::NEUTRAL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_neutral(&self) -> bool {
        self.0 == Self::NEUTRAL
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::neutral()
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
