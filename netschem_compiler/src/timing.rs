//! Timing extractor.
//!
//! Scans an SDF timing document into a [`DelayTable`] keyed by normalized
//! instance name. Nothing here is fatal: blocks that cannot be read are
//! logged and left out, and the resolver fills in neutral delays.

use std::collections::{BTreeMap, HashMap};

use netschem_common::{normalize_timing_name, CellKind, Delay, DelayCorner, DFF_D, DFF_Q, LUT_OUT};
use tracing::{debug, info, warn};

use crate::registry::{PatternKind, PatternRegistry, Role};

/// Cell type VPR gives routing segments in timing documents.
pub const INTERCONNECT_CELLTYPE: &str = "fpga_interconnect";

/// Delay figures found for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimingEntry {
    Storage {
        /// Setup check of `D` against the clock.
        setup: Option<Delay>,
        /// Clock edge to `Q`.
        clock_to_q: Option<Delay>,
    },
    Lookup {
        /// Input index to propagation delay.
        inputs: BTreeMap<usize, Delay>,
    },
    Route {
        delay: Delay,
    },
}

impl TimingEntry {
    pub const fn cell_type(&self) -> &'static str {
        match self {
            Self::Storage { .. } => CellKind::Dff.tag(),
            Self::Lookup { .. } => CellKind::LutK.tag(),
            Self::Route { .. } => INTERCONNECT_CELLTYPE,
        }
    }
}

/// Build-time map from normalized instance or route name to delays.
#[derive(Debug, Default, Clone)]
pub struct DelayTable {
    entries: HashMap<String, TimingEntry>,
    design: Option<String>,
}

impl DelayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any earlier block for the same name.
    pub fn insert(&mut self, name: String, entry: TimingEntry) {
        if let Some(previous) = self.entries.insert(name.clone(), entry) {
            debug!("Timing block for {name:?} replaces an earlier {} block", previous.cell_type());
        }
    }

    pub fn get(&self, name: &str) -> Option<&TimingEntry> {
        self.entries.get(name)
    }

    /// The `(DESIGN ...)` header value, if present.
    pub fn design(&self) -> Option<&str> {
        self.design.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scans `text` into a delay table, reading values at `corner`.
pub fn extract_timing(text: &str, registry: &PatternRegistry, corner: DelayCorner) -> DelayTable {
    let mut table = DelayTable::new();
    table.design = design_name(text, registry);

    let mut unreadable = 0usize;
    for m in registry.scan(PatternKind::TimingCell, text) {
        let (Some(cell_type), Some(instance)) = (m.get(Role::CellType), m.get(Role::Instance)) else {
            continue;
        };
        let instance = normalize_timing_name(instance);

        let Some(body) = balanced_block(text, m.start()) else {
            warn!("Line {}: unterminated timing block for {instance:?}", m.line(text));
            unreadable += 1;
            continue;
        };

        let cell_type = cell_type.trim();
        let entry = match CellKind::from_tag(cell_type) {
            Some(CellKind::Dff) => storage_timing(body, registry, corner),
            Some(CellKind::LutK) => lookup_timing(body, registry, corner),
            None if cell_type == INTERCONNECT_CELLTYPE => route_timing(body, registry, corner),
            None => {
                debug!("Ignoring timing block of unrecognized cell type {cell_type:?}");
                continue;
            }
        };

        match entry {
            Some(entry) => table.insert(instance, entry),
            None => {
                debug!("Timing block for {instance:?} carries no readable delay");
                unreadable += 1;
            }
        }
    }

    info!(
        "Timing pass: {} entries, {} unreadable blocks (corner {corner})",
        table.len(),
        unreadable
    );
    table
}

fn design_name(text: &str, registry: &PatternRegistry) -> Option<String> {
    registry
        .first(PatternKind::TimingDesign, text)
        .and_then(|m| m.get(Role::DesignName))
        .map(normalize_timing_name)
        .filter(|n| !n.is_empty())
}

/// The text from the `(` at `open` through its matching `)`. Backslash
/// escapes are skipped.
fn balanced_block(text: &str, open: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut escaped = false;
    for (offset, byte) in bytes.get(open..)?.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' => escaped = true,
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return text.get(open..open + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// An SDF port spec with escapes removed and any edge qualifier
/// (`(posedge clock)`) reduced to the bare port name.
fn port_name(raw: &str) -> String {
    let inner = raw.trim().trim_start_matches('(').trim_end_matches(')');
    let bare = inner
        .split_whitespace()
        .last()
        .unwrap_or(inner);
    normalize_timing_name(bare)
}

fn lookup_input_index(port: &str) -> Option<usize> {
    if port == "in" {
        return Some(0);
    }
    port.strip_prefix("in[")?.strip_suffix(']')?.parse().ok()
}

fn selected(value: Option<&str>, corner: DelayCorner) -> Option<Delay> {
    value.and_then(|v| corner.select(v)).map(Delay::new)
}

fn storage_timing(body: &str, registry: &PatternRegistry, corner: DelayCorner) -> Option<TimingEntry> {
    let clock_to_q = registry
        .scan(PatternKind::TimingIopath, body)
        .filter(|m| m.get(Role::PathOutput).map(port_name).as_deref() == Some(DFF_Q))
        .find_map(|m| selected(m.get(Role::DelayValue), corner));

    let setup = registry
        .scan(PatternKind::TimingSetup, body)
        .filter(|m| m.get(Role::CheckPin).map(port_name).as_deref() == Some(DFF_D))
        .find_map(|m| selected(m.get(Role::DelayValue), corner));

    if clock_to_q.is_none() && setup.is_none() {
        return None;
    }
    Some(TimingEntry::Storage { setup, clock_to_q })
}

fn lookup_timing(body: &str, registry: &PatternRegistry, corner: DelayCorner) -> Option<TimingEntry> {
    let mut inputs = BTreeMap::new();
    for m in registry.scan(PatternKind::TimingIopath, body) {
        if m.get(Role::PathOutput).map(port_name).as_deref() != Some(LUT_OUT) {
            continue;
        }
        let Some(index) = m.get(Role::PathInput).map(port_name).as_deref().and_then(lookup_input_index)
        else {
            continue;
        };
        if let Some(delay) = selected(m.get(Role::DelayValue), corner) {
            inputs.entry(index).or_insert(delay);
        }
    }

    if inputs.is_empty() {
        return None;
    }
    Some(TimingEntry::Lookup { inputs })
}

fn route_timing(body: &str, registry: &PatternRegistry, corner: DelayCorner) -> Option<TimingEntry> {
    registry
        .scan(PatternKind::TimingIopath, body)
        .find_map(|m| selected(m.get(Role::DelayValue), corner))
        .map(|delay| TimingEntry::Route { delay })
}
