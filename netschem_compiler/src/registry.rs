//! Lexical pattern registry.
//!
//! Every construct the compiler recognizes is one [`PatternSpec`]: a regex
//! plus the semantic [`Role`] of each of its capture groups. The registry
//! checks group counts against role lists when it is built, so a bad table
//! fails before any document is read.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use thiserror::Error;

/// Identifier: escaped (`\` up to whitespace) or simple with an optional bit select.
macro_rules! ident {
    () => {
        r"(?:\\\S+|[A-Za-z_][A-Za-z0-9_$]*(?:\[\d+\])?)"
    };
}

/// A port expression: an identifier or a sized single-bit literal.
macro_rules! net {
    () => {
        r"(?:\\\S+|[A-Za-z_][A-Za-z0-9_$]*(?:\[\d+\])?|\d*'[bB][01xXzZ])"
    };
}

/// A balanced single-level parenthesized group or a bare token.
macro_rules! sdf_port {
    () => {
        r"(\([^()]*\)|\S+)"
    };
}

/// Syntactic constructs with a registered matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternKind {
    ModuleHeader,
    PortDeclaration,
    WireDeclaration,
    Assignment,
    StorageCell,
    LookupCell,
    /// One element of a `{a, b, 1'b0}` concatenation.
    ConcatElement,
    Interconnect,
    TimingCell,
    TimingIopath,
    TimingSetup,
    /// `(DESIGN "name")` header of a timing document.
    TimingDesign,
}

impl PatternKind {
    pub const ALL: [Self; 12] = [
        Self::ModuleHeader,
        Self::PortDeclaration,
        Self::WireDeclaration,
        Self::Assignment,
        Self::StorageCell,
        Self::LookupCell,
        Self::ConcatElement,
        Self::Interconnect,
        Self::TimingCell,
        Self::TimingIopath,
        Self::TimingSetup,
        Self::TimingDesign,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Meaning of a capture group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    ModuleName,
    Direction,
    PortName,
    WireName,
    AssignTarget,
    AssignSource,
    Instance,
    InitialValue,
    DataIn,
    DataOut,
    Clock,
    Arity,
    MaskWidth,
    Mask,
    Inputs,
    Output,
    Element,
    RouteSource,
    RouteDestination,
    CellType,
    PathInput,
    PathOutput,
    DelayValue,
    CheckPin,
    CheckClock,
    DesignName,
}

/// Declarative description of one construct.
#[derive(Clone, Copy, Debug)]
pub struct PatternSpec {
    pub kind: PatternKind,
    pub source: &'static str,
    pub roles: &'static [Role],
}

pub const STANDARD_PATTERNS: &[PatternSpec] = &[
    PatternSpec {
        kind: PatternKind::ModuleHeader,
        source: concat!(r"(?m)^\s*module\s+(", ident!(), r")\s*[(;]"),
        roles: &[Role::ModuleName],
    },
    PatternSpec {
        kind: PatternKind::PortDeclaration,
        source: concat!(
            r"(?m)(?:^|[(,])\s*(input|output)\s+(?:wire\s+)?(",
            ident!(),
            r")"
        ),
        roles: &[Role::Direction, Role::PortName],
    },
    PatternSpec {
        kind: PatternKind::WireDeclaration,
        source: concat!(r"(?m)^\s*wire\s+(", ident!(), r")\s*;"),
        roles: &[Role::WireName],
    },
    PatternSpec {
        kind: PatternKind::Assignment,
        source: concat!(r"(?m)^\s*assign\s+(", net!(), r")\s*=\s*(", net!(), r")\s*;"),
        roles: &[Role::AssignTarget, Role::AssignSource],
    },
    PatternSpec {
        kind: PatternKind::StorageCell,
        source: concat!(
            r"\bDFF\s*#\(\s*\.INITIAL_VALUE\(\s*(?:\d*'[bB])?([01xXzZ])\s*\)\s*\)\s*(",
            ident!(),
            r")\s*\(\s*\.D\(\s*(",
            net!(),
            r")?\s*\)\s*,\s*\.Q\(\s*(",
            net!(),
            r")?\s*\)\s*,\s*\.clock\(\s*(",
            net!(),
            r")?\s*\)\s*\)\s*;"
        ),
        roles: &[
            Role::InitialValue,
            Role::Instance,
            Role::DataIn,
            Role::DataOut,
            Role::Clock,
        ],
    },
    PatternSpec {
        kind: PatternKind::LookupCell,
        source: concat!(
            r"\bLUT_K\s*#\(\s*\.K\(\s*(\d+)\s*\)\s*,\s*\.LUT_MASK\(\s*(\d+)'[bB]([01]+)\s*\)\s*\)\s*(",
            ident!(),
            r")\s*\(\s*\.in\(\s*\{?([^{}]*?)\}?\s*\)\s*,\s*\.out\(\s*(",
            net!(),
            r")?\s*\)\s*\)\s*;"
        ),
        roles: &[
            Role::Arity,
            Role::MaskWidth,
            Role::Mask,
            Role::Instance,
            Role::Inputs,
            Role::Output,
        ],
    },
    PatternSpec {
        kind: PatternKind::ConcatElement,
        source: concat!(r"(", net!(), r")"),
        roles: &[Role::Element],
    },
    PatternSpec {
        kind: PatternKind::Interconnect,
        source: concat!(
            r"\bfpga_interconnect\s+(",
            ident!(),
            r")\s*\(\s*\.datain\(\s*(",
            net!(),
            r")?\s*\)\s*,\s*\.dataout\(\s*(",
            net!(),
            r")?\s*\)\s*\)\s*;"
        ),
        roles: &[Role::Instance, Role::RouteSource, Role::RouteDestination],
    },
    PatternSpec {
        kind: PatternKind::TimingCell,
        source: r#"(?i)\(\s*CELL\s*\(\s*CELLTYPE\s*"([^"]*)"\s*\)\s*\(\s*INSTANCE\b\s*([^()]*?)\s*\)"#,
        roles: &[Role::CellType, Role::Instance],
    },
    PatternSpec {
        kind: PatternKind::TimingIopath,
        source: concat!(
            r"(?i)\(\s*IOPATH\s+",
            sdf_port!(),
            r"\s+(\S+)\s+\(([^()]*)\)"
        ),
        roles: &[Role::PathInput, Role::PathOutput, Role::DelayValue],
    },
    PatternSpec {
        kind: PatternKind::TimingSetup,
        source: concat!(
            r"(?i)\(\s*SETUP(?:HOLD)?\s+",
            sdf_port!(),
            r"\s+",
            sdf_port!(),
            r"\s+\(([^()]*)\)"
        ),
        roles: &[Role::CheckPin, Role::CheckClock, Role::DelayValue],
    },
    PatternSpec {
        kind: PatternKind::TimingDesign,
        source: r#"(?i)\(\s*DESIGN\s+("[^"]*"|[^()\s]+)\s*\)"#,
        roles: &[Role::DesignName],
    },
];

/// Registry Contract faults. These indicate a broken pattern table, never
/// bad input.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("pattern {kind:?} failed to compile: {source}")]
    InvalidRegex {
        kind: PatternKind,
        #[source]
        source: regex::Error,
    },
    #[error("pattern {kind:?} declares {roles} roles but has {groups} capture groups")]
    RoleCountMismatch {
        kind: PatternKind,
        roles: usize,
        groups: usize,
    },
    #[error("pattern {0:?} is registered more than once")]
    DuplicateKind(PatternKind),
    #[error("no pattern registered for {0:?}")]
    MissingKind(PatternKind),
}

#[derive(Debug)]
struct CompiledPattern {
    kind: PatternKind,
    regex: Regex,
    roles: &'static [Role],
}

/// Compiled, immutable pattern table. Safe to share across threads.
#[derive(Debug)]
pub struct PatternRegistry {
    /// Indexed by [`PatternKind::index`].
    patterns: Vec<CompiledPattern>,
}

lazy_static! {
    static ref STANDARD_REGISTRY: PatternRegistry = PatternRegistry::new(STANDARD_PATTERNS)
        .unwrap_or_else(|e| panic!("pattern registry contract fault: {e}"));
}

impl PatternRegistry {
    /// Compiles and validates a pattern table. Every [`PatternKind`] must be
    /// registered exactly once.
    pub fn new(specs: &[PatternSpec]) -> Result<Self, RegistryError> {
        let mut slots: Vec<Option<CompiledPattern>> = PatternKind::ALL.iter().map(|_| None).collect();

        for spec in specs {
            let regex = Regex::new(spec.source).map_err(|source| RegistryError::InvalidRegex {
                kind: spec.kind,
                source,
            })?;

            let groups = regex.captures_len() - 1;
            if groups != spec.roles.len() {
                return Err(RegistryError::RoleCountMismatch {
                    kind: spec.kind,
                    roles: spec.roles.len(),
                    groups,
                });
            }

            let slot = &mut slots[spec.kind.index()];
            if slot.is_some() {
                return Err(RegistryError::DuplicateKind(spec.kind));
            }
            *slot = Some(CompiledPattern {
                kind: spec.kind,
                regex,
                roles: spec.roles,
            });
        }

        let patterns = slots
            .into_iter()
            .zip(PatternKind::ALL)
            .map(|(slot, kind)| slot.ok_or(RegistryError::MissingKind(kind)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// The built-in table, compiled on first use.
    ///
    /// # Panics
    ///
    /// Panics if the built-in table violates the registry contract.
    pub fn standard() -> &'static Self {
        &STANDARD_REGISTRY
    }

    fn pattern(&self, kind: PatternKind) -> &CompiledPattern {
        &self.patterns[kind.index()]
    }

    pub fn roles(&self, kind: PatternKind) -> &'static [Role] {
        self.pattern(kind).roles
    }

    /// All non-overlapping matches of `kind` in `text`, in text order.
    pub fn scan<'r, 't>(
        &'r self,
        kind: PatternKind,
        text: &'t str,
    ) -> impl Iterator<Item = PatternMatch<'r, 't>> + 'r
    where
        't: 'r,
    {
        let pattern = self.pattern(kind);
        pattern
            .regex
            .captures_iter(text)
            .map(move |captures| PatternMatch { pattern, captures })
    }

    pub fn first<'r, 't>(&'r self, kind: PatternKind, text: &'t str) -> Option<PatternMatch<'r, 't>> {
        let pattern = self.pattern(kind);
        pattern
            .regex
            .captures(text)
            .map(|captures| PatternMatch { pattern, captures })
    }
}

/// One match, with captures addressed by role.
#[derive(Debug)]
pub struct PatternMatch<'r, 't> {
    pattern: &'r CompiledPattern,
    captures: Captures<'t>,
}

impl<'t> PatternMatch<'_, 't> {
    pub fn kind(&self) -> PatternKind {
        self.pattern.kind
    }

    /// The text captured for `role`, or `None` when the optional group did
    /// not participate or the pattern has no such role.
    pub fn get(&self, role: Role) -> Option<&'t str> {
        let position = self.pattern.roles.iter().position(|r| *r == role)?;
        self.captures.get(position + 1).map(|m| m.as_str())
    }

    /// Byte offset of the match in the scanned text.
    pub fn start(&self) -> usize {
        self.captures.get(0).map_or(0, |m| m.start())
    }

    /// 1-based line number of the match start in `text`.
    pub fn line(&self, text: &str) -> usize {
        text[..self.start().min(text.len())].matches('\n').count() + 1
    }
}
