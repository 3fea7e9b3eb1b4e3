//! Net resolver and model assembler.
//!
//! Joins the structural model with the delay table. Net names are already
//! canonical here; this step only attaches delays and fills defaults.

use netschem_common::{Cell, CompileConfig, Delay, Interconnect, SchematicDocument};
use tracing::{debug, info, warn};

use crate::error::CompileError;
use crate::structural::{ProvisionalCell, ProvisionalInterconnect, StructuralModel};
use crate::timing::{DelayTable, TimingEntry};

/// Builds the final document.
///
/// # Errors
///
/// Returns [`CompileError::DanglingEndpoints`] when `config.strict_endpoints`
/// is set and an interconnect endpoint resolves to no known net.
pub fn assemble(
    model: StructuralModel,
    delays: &DelayTable,
    config: &CompileConfig,
) -> Result<SchematicDocument, CompileError> {
    let StructuralModel {
        module_name,
        external_wires,
        cells,
        interconnects,
        ..
    } = model;

    if let Some(design) = delays.design().filter(|d| *d != module_name) {
        warn!("Timing document describes design {design:?} but the netlist module is {module_name:?}");
    }

    let cells: Vec<Cell> = cells.into_iter().map(|c| attach_cell_timing(c, delays)).collect();
    let interconnects: Vec<Interconnect> = interconnects
        .into_iter()
        .map(|r| attach_route_timing(r, delays))
        .collect();

    let name = config.module_name.clone().unwrap_or(module_name);
    let document = SchematicDocument::new(name, external_wires, cells, interconnects);

    let dangling = document.dangling_endpoints();
    if !dangling.is_empty() {
        if config.strict_endpoints {
            return Err(CompileError::DanglingEndpoints(dangling));
        }
        debug!("{} dangling interconnect endpoints passed through", dangling.len());
    }

    info!("Assembled {document}");
    Ok(document)
}

fn attach_cell_timing(provisional: ProvisionalCell, delays: &DelayTable) -> Cell {
    let ProvisionalCell { raw_name, cell } = provisional;
    let entry = delays.get(&raw_name);

    match (cell, entry) {
        (Cell::Dff(dff), Some(TimingEntry::Storage { setup, clock_to_q })) => Cell::Dff(dff.with_timing(
            setup.clone().unwrap_or_default(),
            clock_to_q.clone().unwrap_or_default(),
        )),
        (Cell::LutK(lut), Some(TimingEntry::Lookup { inputs })) => Cell::LutK(
            lut.with_propagation_delays(inputs.iter().map(|(i, d)| (*i, d.clone()))),
        ),
        (cell, Some(other)) => {
            debug!(
                "Timing block for {raw_name:?} is a {} block but the cell is {}",
                other.cell_type(),
                cell.kind()
            );
            cell
        }
        (cell, None) => cell,
    }
}

fn attach_route_timing(provisional: ProvisionalInterconnect, delays: &DelayTable) -> Interconnect {
    let ProvisionalInterconnect { raw_name, route, .. } = provisional;
    match delays.get(&raw_name) {
        Some(TimingEntry::Route { delay }) => route.with_propagation_delay(delay.clone()),
        Some(other) => {
            debug!("Route {raw_name:?} matched a {} timing block", other.cell_type());
            route.with_propagation_delay(Delay::neutral())
        }
        None => route,
    }
}
