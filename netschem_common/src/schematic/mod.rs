//! The schematic document handed to renderers and simulators.
//!
//! Field names and nesting are part of the external contract: consumers key
//! on `connections.D`, `connections.in_<i>`, `connections.input` and so on.

mod cell;
mod delay;
mod interconnect;
mod wire;

pub use cell::*;
pub use delay::Delay;
pub use interconnect::{Interconnect, InterconnectConnections};
pub use wire::{ExternalWire, WireDirection};

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Constant `type` tag of the root document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentTag {
    #[default]
    #[serde(rename = "schematic")]
    Schematic,
}

/// Root of the compiled model. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchematicDocument {
    #[serde(rename = "type")]
    tag: DocumentTag,
    name: String,
    external_wires: Vec<ExternalWire>,
    cells: Vec<Cell>,
    interconnects: Vec<Interconnect>,
}

/// Which end of an interconnect a dangling net sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointSide {
    Input,
    Output,
}

impl fmt::Display for EndpointSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// An interconnect endpoint naming neither an external wire nor a cell
/// connection value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DanglingEndpoint {
    pub interconnect: String,
    pub side: EndpointSide,
    pub net: String,
}

impl fmt::Display for DanglingEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: connections.{} = {:?} resolves to no wire or cell port",
            self.interconnect, self.side, self.net
        )
    }
}

/// Element counts of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    pub inputs: usize,
    pub outputs: usize,
    pub dffs: usize,
    pub luts: usize,
    pub interconnects: usize,
    pub timed_cells: usize,
    pub timed_interconnects: usize,
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inputs, {} outputs, {} DFF, {} LUT_K, {} interconnects ({}/{} cells and {}/{} routes timed)",
            self.inputs,
            self.outputs,
            self.dffs,
            self.luts,
            self.interconnects,
            self.timed_cells,
            self.dffs + self.luts,
            self.timed_interconnects,
            self.interconnects,
        )
    }
}

impl SchematicDocument {
    pub fn new(
        name: String,
        external_wires: Vec<ExternalWire>,
        cells: Vec<Cell>,
        interconnects: Vec<Interconnect>,
    ) -> Self {
        Self {
            tag: DocumentTag::Schematic,
            name,
            external_wires,
            cells,
            interconnects,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn external_wires(&self) -> &[ExternalWire] {
        &self.external_wires
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn interconnects(&self) -> &[Interconnect] {
        &self.interconnects
    }

    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.name() == name)
    }

    pub fn interconnect(&self, name: &str) -> Option<&Interconnect> {
        self.interconnects.iter().find(|i| i.name() == name)
    }

    /// Every net an interconnect endpoint may legally name.
    pub fn known_nets(&self) -> HashSet<&str> {
        self.external_wires
            .iter()
            .map(ExternalWire::name)
            .chain(self.cells.iter().flat_map(Cell::connection_values))
            .collect()
    }

    /// Interconnect endpoints that name neither an external wire nor any
    /// cell connection value, in document order.
    pub fn dangling_endpoints(&self) -> Vec<DanglingEndpoint> {
        let known = self.known_nets();
        let mut dangling = Vec::new();
        for route in &self.interconnects {
            for (side, net) in [
                (EndpointSide::Input, route.input()),
                (EndpointSide::Output, route.output()),
            ] {
                if !known.contains(net) {
                    dangling.push(DanglingEndpoint {
                        interconnect: route.name().to_string(),
                        side,
                        net: net.to_string(),
                    });
                }
            }
        }
        dangling
    }

    pub fn summary(&self) -> DocumentSummary {
        let count_dir = |dir: WireDirection| {
            self.external_wires
                .iter()
                .filter(|w| w.direction() == dir)
                .count()
        };
        let count_kind = |kind: CellKind| self.cells.iter().filter(|c| c.kind() == kind).count();

        DocumentSummary {
            inputs: count_dir(WireDirection::Input),
            outputs: count_dir(WireDirection::Output),
            dffs: count_kind(CellKind::Dff),
            luts: count_kind(CellKind::LutK),
            interconnects: self.interconnects.len(),
            timed_cells: self.cells.iter().filter(|c| c.has_timing()).count(),
            timed_interconnects: self
                .interconnects
                .iter()
                .filter(|i| !i.propagation_delay().is_neutral())
                .count(),
        }
    }

    pub fn to_json_string(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl fmt::Display for SchematicDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() { "<unnamed>" } else { &self.name };
        write!(f, "{name}: {}", self.summary())
    }
}
