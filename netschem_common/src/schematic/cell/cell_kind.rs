use std::fmt;
use std::fmt::Formatter;

/// The closed set of primitive kinds the compiler recognizes.
///
/// Adding a kind means adding a variant here, a cell payload in
/// [`crate::Cell`], a structural pattern, and the kind's port roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKind {
    /// Clocked storage element (D flip-flop).
    Dff,
    /// K-input lookup table.
    LutK,
}

impl CellKind {
    /// Every kind, in the order the structural extractor scans them.
    pub const ALL: [Self; 2] = [Self::Dff, Self::LutK];

    /// The `type` tag written to the output document and used as the cell
    /// type in netlists and timing documents.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Dff => "DFF",
            Self::LutK => "LUT_K",
        }
    }

    /// Prefix of canonical cell names (`dff_1`, `lut_k_4`).
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Dff => "dff",
            Self::LutK => "lut_k",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Port roles a cell of this kind with `arity` inputs must bind.
    ///
    /// Arity is ignored for fixed-shape kinds.
    pub fn port_roles(&self, arity: usize) -> Vec<String> {
        match self {
            Self::Dff => vec![DFF_D.to_string(), DFF_Q.to_string(), DFF_CLOCK.to_string()],
            Self::LutK => (0..arity)
                .map(lut_input_role)
                .chain(std::iter::once(LUT_OUT.to_string()))
                .collect(),
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

pub const DFF_D: &str = "D";
pub const DFF_Q: &str = "Q";
pub const DFF_CLOCK: &str = "clock";
pub const LUT_OUT: &str = "out";

/// Role of the `index`-th lookup-table input (`in_0`, `in_1`, ...).
pub fn lut_input_role(index: usize) -> String {
    format!("in_{index}")
}

/// Inverse of [`lut_input_role`].
pub fn parse_lut_input_role(role: &str) -> Option<usize> {
    role.strip_prefix("in_")?.parse().ok()
}
