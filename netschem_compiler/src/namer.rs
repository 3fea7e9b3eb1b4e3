//! Symbol namer: raw instance names to canonical `<kind>_<ordinal>` names.
//!
//! One namer lives for exactly one compile invocation.

use std::collections::HashMap;

use contracts::*;
use netschem_common::CellKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamerError {
    #[error("instance {raw:?} is declared more than once (already named {existing})")]
    DuplicateInstance { raw: String, existing: String },
    #[error("canonical name {canonical} assigned to both {first:?} and {second:?}")]
    Collision {
        canonical: String,
        first: String,
        second: String,
    },
}

impl NamerError {
    /// The raw instance name involved in the violation.
    pub fn raw_name(&self) -> &str {
        match self {
            Self::DuplicateInstance { raw, .. } => raw,
            Self::Collision { second, .. } => second,
        }
    }
}

/// Per-invocation naming state.
#[derive(Debug, Default, Clone)]
pub struct SymbolNamer {
    counters: HashMap<CellKind, usize>,
    by_raw: HashMap<String, (CellKind, String)>,
    by_canonical: HashMap<String, String>,
}

impl SymbolNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical name for `raw`, allocating the next ordinal of `kind` the
    /// first time `raw` is seen. Repeated calls with the same arguments
    /// return the same name.
    pub fn name(&mut self, kind: CellKind, raw: &str) -> Result<String, NamerError> {
        if let Some((existing_kind, canonical)) = self.by_raw.get(raw) {
            if *existing_kind == kind {
                return Ok(canonical.clone());
            }
            return Err(NamerError::DuplicateInstance {
                raw: raw.to_string(),
                existing: canonical.clone(),
            });
        }
        self.fresh(kind, raw)
    }

    /// Canonical name for a newly declared instance. A raw name that has
    /// been named before is a duplicate declaration.
    pub fn allocate(&mut self, kind: CellKind, raw: &str) -> Result<String, NamerError> {
        if let Some((_, existing)) = self.by_raw.get(raw) {
            return Err(NamerError::DuplicateInstance {
                raw: raw.to_string(),
                existing: existing.clone(),
            });
        }
        self.fresh(kind, raw)
    }

    #[debug_ensures(ret.is_err() || self.by_raw.len() == old(self.by_raw.len()) + 1)]
    fn fresh(&mut self, kind: CellKind, raw: &str) -> Result<String, NamerError> {
        let ordinal = self.counters.get(&kind).copied().unwrap_or(0) + 1;
        let canonical = format!("{}_{ordinal}", kind.prefix());

        if let Some(first) = self.by_canonical.get(&canonical) {
            return Err(NamerError::Collision {
                canonical,
                first: first.clone(),
                second: raw.to_string(),
            });
        }

        self.counters.insert(kind, ordinal);
        self.by_canonical.insert(canonical.clone(), raw.to_string());
        self.by_raw.insert(raw.to_string(), (kind, canonical.clone()));
        Ok(canonical)
    }

    pub fn canonical(&self, raw: &str) -> Option<&str> {
        self.by_raw.get(raw).map(|(_, c)| c.as_str())
    }

    /// The raw instance name behind a canonical name.
    pub fn raw_name(&self, canonical: &str) -> Option<&str> {
        self.by_canonical.get(canonical).map(String::as_str)
    }

    /// Number of names handed out for `kind`.
    pub fn count(&self, kind: CellKind) -> usize {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    /// Canonical net name of a cell port: `<cell>_<role>`.
    pub fn port_net(cell: &str, role: &str) -> String {
        format!("{cell}_{role}")
    }
}
