//! Structural extractor.
//!
//! Single pass over the structural netlist that produces external wires,
//! cells with canonical port bindings, provisional interconnects and the
//! wire-alias table. All net names are final once this pass returns.

use netschem_common::{
    normalize_netlist_name, Cell, CellKind, DffCell, DffConnections, ExternalWire,
    Interconnect, LutCell, LutConnections, NetRef, WireDirection, DFF_CLOCK, DFF_D, DFF_Q,
    LUT_OUT, lut_input_role,
};
use tracing::{debug, info, warn};

use crate::alias::WireAliasTable;
use crate::namer::{NamerError, SymbolNamer};
use crate::registry::{PatternKind, PatternMatch, PatternRegistry, Role};

/// Why a structural match was left out of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipReason {
    pub construct: PatternKind,
    pub line: usize,
    pub detail: String,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {:?} skipped: {}", self.line, self.construct, self.detail)
    }
}

/// Result of interpreting one match. Hard faults travel separately as
/// `Err` so they cannot be mistaken for a skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome<T> {
    Accepted(T),
    Skipped(SkipReason),
}

/// A cell before timing is attached, keyed by its raw instance name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionalCell {
    pub raw_name: String,
    pub cell: Cell,
}

/// An interconnect before timing is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionalInterconnect {
    pub raw_name: String,
    pub route: Interconnect,
    pub input_resolved: bool,
    pub output_resolved: bool,
}

/// Everything the structural pass learned about one module.
#[derive(Debug, Clone)]
pub struct StructuralModel {
    pub module_name: String,
    pub external_wires: Vec<ExternalWire>,
    pub wires: Vec<String>,
    pub cells: Vec<ProvisionalCell>,
    pub interconnects: Vec<ProvisionalInterconnect>,
    pub aliases: WireAliasTable,
    pub namer: SymbolNamer,
    pub skipped: Vec<SkipReason>,
}

/// Runs the structural pass over `text`.
///
/// # Errors
///
/// Returns a [`NamerError`] when two cells share a raw instance name.
pub fn extract_structure(text: &str, registry: &PatternRegistry) -> Result<StructuralModel, NamerError> {
    StructuralExtractor::new(registry, text).run()
}

struct StructuralExtractor<'r, 't> {
    registry: &'r PatternRegistry,
    text: &'t str,
    aliases: WireAliasTable,
    namer: SymbolNamer,
    skipped: Vec<SkipReason>,
}

impl<'r, 't> StructuralExtractor<'r, 't> {
    fn new(registry: &'r PatternRegistry, text: &'t str) -> Self {
        Self {
            registry,
            text,
            aliases: WireAliasTable::new(),
            namer: SymbolNamer::new(),
            skipped: Vec::new(),
        }
    }

    fn run(mut self) -> Result<StructuralModel, NamerError> {
        let module_name = self.module_name();
        let external_wires = self.external_wires();
        let wires = self.wire_declarations();
        self.fold_assignments();

        let mut cells = Vec::new();
        for kind in CellKind::ALL {
            self.extract_cells(kind, &mut cells)?;
        }

        let interconnects = self.interconnects();

        info!(
            "Structural pass over {:?}: {} ports, {} cells, {} interconnects, {} skipped",
            module_name,
            external_wires.len(),
            cells.len(),
            interconnects.len(),
            self.skipped.len()
        );
        debug!("{} raw nets aliased", self.aliases.len());

        Ok(StructuralModel {
            module_name,
            external_wires,
            wires,
            cells,
            interconnects,
            aliases: self.aliases,
            namer: self.namer,
            skipped: self.skipped,
        })
    }

    fn module_name(&self) -> String {
        match self
            .registry
            .first(PatternKind::ModuleHeader, self.text)
            .and_then(|m| m.get(Role::ModuleName))
        {
            Some(name) => normalize_netlist_name(name),
            None => {
                debug!("No module header found, emitting an unnamed document");
                String::new()
            }
        }
    }

    fn external_wires(&mut self) -> Vec<ExternalWire> {
        let mut wires: Vec<ExternalWire> = Vec::new();
        for m in self.registry.scan(PatternKind::PortDeclaration, self.text) {
            let (Some(keyword), Some(raw)) = (m.get(Role::Direction), m.get(Role::PortName)) else {
                continue;
            };
            let Some(direction) = WireDirection::from_keyword(keyword) else {
                continue;
            };
            let raw = normalize_netlist_name(raw);
            let wire = ExternalWire::from_port(direction, &raw);

            if !self.aliases.bind(&raw, wire.name()) {
                debug!("Port {raw:?} declared more than once, keeping the first declaration");
                continue;
            }
            wires.push(wire);
        }
        wires
    }

    fn wire_declarations(&self) -> Vec<String> {
        let wires: Vec<String> = self
            .registry
            .scan(PatternKind::WireDeclaration, self.text)
            .filter_map(|m| m.get(Role::WireName))
            .map(normalize_netlist_name)
            .collect();
        debug!("{} plain wire declarations", wires.len());
        wires
    }

    /// Binds the free side of every `assign` whose other side already has an
    /// alias, repeating until no assignment makes progress so that chains of
    /// assignments resolve regardless of their order in the text.
    fn fold_assignments(&mut self) {
        let mut pending: Vec<(String, String)> = Vec::new();
        for m in self.registry.scan(PatternKind::Assignment, self.text) {
            let lhs = m.get(Role::AssignTarget).and_then(NetRef::parse);
            let rhs = m.get(Role::AssignSource).and_then(NetRef::parse);
            match (lhs, rhs) {
                (Some(NetRef::Net(lhs)), Some(NetRef::Net(rhs))) => pending.push((lhs, rhs)),
                _ => debug!(
                    "Line {}: assignment with a constant side binds no alias",
                    m.line(self.text)
                ),
            }
        }

        let aliases = &mut self.aliases;
        loop {
            let before = pending.len();
            pending.retain(|(lhs, rhs)| {
                match (
                    aliases.resolve(lhs).map(str::to_string),
                    aliases.resolve(rhs).map(str::to_string),
                ) {
                    (Some(canonical), None) => {
                        aliases.bind(rhs, &canonical);
                        false
                    }
                    (None, Some(canonical)) => {
                        aliases.bind(lhs, &canonical);
                        false
                    }
                    (Some(_), Some(_)) => {
                        debug!("assign {lhs} = {rhs}: both sides already bound");
                        false
                    }
                    (None, None) => true,
                }
            });
            if pending.len() == before {
                break;
            }
        }

        for (lhs, rhs) in &pending {
            debug!("assign {lhs} = {rhs}: neither side reaches a port");
        }
    }

    fn extract_cells(&mut self, kind: CellKind, cells: &mut Vec<ProvisionalCell>) -> Result<(), NamerError> {
        let pattern = match kind {
            CellKind::Dff => PatternKind::StorageCell,
            CellKind::LutK => PatternKind::LookupCell,
        };

        let registry = self.registry;
        let text = self.text;
        for m in registry.scan(pattern, text) {
            let outcome = match kind {
                CellKind::Dff => self.storage_cell(&m)?,
                CellKind::LutK => self.lookup_cell(&m)?,
            };
            match outcome {
                MatchOutcome::Accepted(cell) => cells.push(cell),
                MatchOutcome::Skipped(reason) => {
                    warn!("{reason}");
                    self.skipped.push(reason);
                }
            }
        }
        Ok(())
    }

    fn skip<T>(&self, m: &PatternMatch<'_, '_>, detail: String) -> MatchOutcome<T> {
        MatchOutcome::Skipped(SkipReason {
            construct: m.kind(),
            line: m.line(self.text),
            detail,
        })
    }

    /// Canonical binding for one cell port. A net already known under an
    /// alias keeps it; otherwise the port's own canonical name becomes the
    /// alias for that net.
    fn bind_port(&mut self, cell: &str, role: &str, net: &NetRef) -> String {
        match net {
            NetRef::Constant(value) => NetRef::literal(*value).to_string(),
            NetRef::Net(raw) => {
                if let Some(canonical) = self.aliases.resolve(raw) {
                    return canonical.to_string();
                }
                let canonical = SymbolNamer::port_net(cell, role);
                self.aliases.bind(raw, &canonical);
                canonical
            }
        }
    }

    fn storage_cell(&mut self, m: &PatternMatch<'_, '_>) -> Result<MatchOutcome<ProvisionalCell>, NamerError> {
        let Some(raw_name) = m.get(Role::Instance).map(normalize_netlist_name) else {
            return Ok(self.skip(m, "DFF without an instance name".to_string()));
        };

        let mut nets = Vec::with_capacity(3);
        for (role, port) in [(Role::DataIn, DFF_D), (Role::DataOut, DFF_Q), (Role::Clock, DFF_CLOCK)] {
            match m.get(role).and_then(NetRef::parse) {
                Some(net) => nets.push(net),
                None => {
                    return Ok(self.skip(m, format!("DFF {raw_name:?} has no net on port {port}")));
                }
            }
        }
        let initial_value = m
            .get(Role::InitialValue)
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "0".to_string());

        let name = self.namer.allocate(CellKind::Dff, &raw_name)?;
        let d = self.bind_port(&name, DFF_D, &nets[0]);
        let q = self.bind_port(&name, DFF_Q, &nets[1]);
        let clock = self.bind_port(&name, DFF_CLOCK, &nets[2]);

        let cell = DffCell::new(name, DffConnections { d, q, clock }, initial_value);
        Ok(MatchOutcome::Accepted(ProvisionalCell {
            raw_name,
            cell: Cell::Dff(cell),
        }))
    }

    fn lookup_cell(&mut self, m: &PatternMatch<'_, '_>) -> Result<MatchOutcome<ProvisionalCell>, NamerError> {
        let Some(raw_name) = m.get(Role::Instance).map(normalize_netlist_name) else {
            return Ok(self.skip(m, "LUT_K without an instance name".to_string()));
        };
        let Some(arity) = m.get(Role::Arity).and_then(|k| k.parse::<usize>().ok()) else {
            return Ok(self.skip(m, format!("LUT_K {raw_name:?} has an unreadable K")));
        };
        let mask = m.get(Role::Mask).unwrap_or_default().to_string();
        if let Some(width) = m.get(Role::MaskWidth).and_then(|w| w.parse::<usize>().ok()) {
            if width != mask.len() {
                debug!("LUT_K {raw_name:?}: mask declares {width} bits but spells {}", mask.len());
            }
        }

        let body = m.get(Role::Inputs).unwrap_or_default();
        let elements: Vec<Option<NetRef>> = self
            .registry
            .scan(PatternKind::ConcatElement, body)
            .map(|e| e.get(Role::Element).and_then(NetRef::parse))
            .collect();
        if elements.len() != arity {
            return Ok(self.skip(
                m,
                format!("LUT_K {raw_name:?} declares K={arity} but lists {} inputs", elements.len()),
            ));
        }
        // Concatenations list the most significant input first.
        let Some(inputs) = elements.into_iter().rev().collect::<Option<Vec<NetRef>>>() else {
            return Ok(self.skip(m, format!("LUT_K {raw_name:?} has an unreadable input")));
        };
        let Some(out) = m.get(Role::Output).and_then(NetRef::parse) else {
            return Ok(self.skip(m, format!("LUT_K {raw_name:?} has no net on port {LUT_OUT}")));
        };

        let name = self.namer.allocate(CellKind::LutK, &raw_name)?;
        let inputs = inputs
            .iter()
            .enumerate()
            .map(|(i, net)| self.bind_port(&name, &lut_input_role(i), net))
            .collect();
        let out = self.bind_port(&name, LUT_OUT, &out);

        let cell = LutCell::new(name, LutConnections { inputs, out }, mask);
        Ok(MatchOutcome::Accepted(ProvisionalCell {
            raw_name,
            cell: Cell::LutK(cell),
        }))
    }

    fn interconnects(&mut self) -> Vec<ProvisionalInterconnect> {
        let mut routes = Vec::new();
        let registry = self.registry;
        let text = self.text;
        for m in registry.scan(PatternKind::Interconnect, text) {
            match self.interconnect(&m) {
                MatchOutcome::Accepted(route) => routes.push(route),
                MatchOutcome::Skipped(reason) => {
                    warn!("{reason}");
                    self.skipped.push(reason);
                }
            }
        }
        routes
    }

    fn interconnect(&self, m: &PatternMatch<'_, '_>) -> MatchOutcome<ProvisionalInterconnect> {
        let Some(raw_name) = m.get(Role::Instance).map(normalize_netlist_name) else {
            return self.skip(m, "interconnect without an instance name".to_string());
        };
        let Some(source) = m.get(Role::RouteSource).and_then(NetRef::parse) else {
            return self.skip(m, format!("interconnect {raw_name:?} has no datain net"));
        };
        let Some(destination) = m.get(Role::RouteDestination).and_then(NetRef::parse) else {
            return self.skip(m, format!("interconnect {raw_name:?} has no dataout net"));
        };

        let (input, input_resolved) = self.resolve_endpoint(&source);
        let (output, output_resolved) = self.resolve_endpoint(&destination);
        if !input_resolved || !output_resolved {
            warn!(
                "Line {}: interconnect {raw_name:?} keeps an unresolved endpoint ({input} -> {output})",
                m.line(self.text)
            );
        }

        MatchOutcome::Accepted(ProvisionalInterconnect {
            raw_name,
            route: Interconnect::new(input, output),
            input_resolved,
            output_resolved,
        })
    }

    fn resolve_endpoint(&self, net: &NetRef) -> (String, bool) {
        match net {
            NetRef::Constant(value) => (NetRef::literal(*value).to_string(), true),
            NetRef::Net(raw) => {
                let (name, found) = self.aliases.resolve_or_raw(raw);
                (name.to_string(), found)
            }
        }
    }
}
