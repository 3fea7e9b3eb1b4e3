//! Cell payloads of the schematic document.
//!
//! Each [`CellKind`] has its own payload with a statically shaped
//! `connections` record, so every declared port always carries a binding.

mod cell_kind;

pub use cell_kind::*;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Delay;

/// An instantiated primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Cell {
    #[serde(rename = "DFF")]
    Dff(DffCell),
    #[serde(rename = "LUT_K")]
    LutK(LutCell),
}

impl Cell {
    pub fn name(&self) -> &str {
        match self {
            Self::Dff(c) => &c.name,
            Self::LutK(c) => &c.name,
        }
    }

    pub const fn kind(&self) -> CellKind {
        match self {
            Self::Dff(_) => CellKind::Dff,
            Self::LutK(_) => CellKind::LutK,
        }
    }

    /// `(role, binding)` pairs in port declaration order.
    pub fn port_bindings(&self) -> Vec<(String, &str)> {
        match self {
            Self::Dff(c) => vec![
                (DFF_D.to_string(), c.connections.d.as_str()),
                (DFF_Q.to_string(), c.connections.q.as_str()),
                (DFF_CLOCK.to_string(), c.connections.clock.as_str()),
            ],
            Self::LutK(c) => c
                .connections
                .inputs
                .iter()
                .enumerate()
                .map(|(i, net)| (lut_input_role(i), net.as_str()))
                .chain(std::iter::once((LUT_OUT.to_string(), c.connections.out.as_str())))
                .collect(),
        }
    }

    /// Every value in this cell's `connections` map.
    pub fn connection_values(&self) -> Vec<&str> {
        self.port_bindings().into_iter().map(|(_, v)| v).collect()
    }

    /// True when at least one delay figure differs from the neutral default.
    pub fn has_timing(&self) -> bool {
        match self {
            Self::Dff(c) => !c.d_stability_delay.is_neutral() || !c.q_update_delay.is_neutral(),
            Self::LutK(c) => c.propagation_delay.values().any(|d| !d.is_neutral()),
        }
    }
}

/// Port bindings of a flip-flop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DffConnections {
    #[serde(rename = "D")]
    pub d: String,
    #[serde(rename = "Q")]
    pub q: String,
    pub clock: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DffCell {
    name: String,
    connections: DffConnections,
    initial_value: String,
    #[serde(rename = "D_stability_delay", default)]
    d_stability_delay: Delay,
    #[serde(rename = "Q_update_delay", default)]
    q_update_delay: Delay,
}

impl DffCell {
    /// Creates a flip-flop with neutral delays.
    pub fn new(name: String, connections: DffConnections, initial_value: String) -> Self {
        Self {
            name,
            connections,
            initial_value,
            d_stability_delay: Delay::neutral(),
            q_update_delay: Delay::neutral(),
        }
    }

    /// Attaches the setup (`D` stability) and clock-to-output delays.
    pub fn with_timing(mut self, d_stability_delay: Delay, q_update_delay: Delay) -> Self {
        self.d_stability_delay = d_stability_delay;
        self.q_update_delay = q_update_delay;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn connections(&self) -> &DffConnections {
        &self.connections
    }

    pub fn initial_value(&self) -> &str {
        &self.initial_value
    }

    pub const fn d_stability_delay(&self) -> &Delay {
        &self.d_stability_delay
    }

    pub const fn q_update_delay(&self) -> &Delay {
        &self.q_update_delay
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConnectionsError {
    #[error("lookup table connections lack the `out` port")]
    MissingOutput,
    #[error("lookup table input `{0}` is missing")]
    MissingInput(String),
    #[error("unexpected lookup table port `{0}`")]
    UnknownPort(String),
}

/// Port bindings of a lookup table, serialized as a flat
/// `{in_0, ..., in_<k-1>, out}` map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    into = "IndexMap<String, String>",
    try_from = "IndexMap<String, String>"
)]
pub struct LutConnections {
    /// Input bindings, indexed by input number.
    pub inputs: Vec<String>,
    pub out: String,
}

impl From<LutConnections> for IndexMap<String, String> {
    fn from(c: LutConnections) -> Self {
        let mut map: IndexMap<String, String> = c
            .inputs
            .into_iter()
            .enumerate()
            .map(|(i, net)| (lut_input_role(i), net))
            .collect();
        map.insert(LUT_OUT.to_string(), c.out);
        map
    }
}

impl TryFrom<IndexMap<String, String>> for LutConnections {
    type Error = ConnectionsError;

    fn try_from(mut map: IndexMap<String, String>) -> Result<Self, Self::Error> {
        let out = map
            .shift_remove(LUT_OUT)
            .ok_or(ConnectionsError::MissingOutput)?;

        let mut indexed = Vec::with_capacity(map.len());
        for (role, net) in map {
            let index = parse_lut_input_role(&role).ok_or(ConnectionsError::UnknownPort(role))?;
            indexed.push((index, net));
        }
        indexed.sort_by_key(|(i, _)| *i);

        let mut inputs = Vec::with_capacity(indexed.len());
        for (expected, (index, net)) in indexed.into_iter().enumerate() {
            if index != expected {
                return Err(ConnectionsError::MissingInput(lut_input_role(expected)));
            }
            inputs.push(net);
        }

        Ok(Self { inputs, out })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LutCell {
    name: String,
    connections: LutConnections,
    #[serde(rename = "K")]
    k: usize,
    #[serde(rename = "LUT_mask")]
    lut_mask: String,
    #[serde(default)]
    propagation_delay: IndexMap<String, Delay>,
}

impl LutCell {
    /// Creates a lookup table with a neutral delay on every input.
    pub fn new(name: String, connections: LutConnections, lut_mask: String) -> Self {
        let k = connections.inputs.len();
        let propagation_delay = (0..k)
            .map(|i| (lut_input_role(i), Delay::neutral()))
            .collect();
        Self {
            name,
            connections,
            k,
            lut_mask,
            propagation_delay,
        }
    }

    /// Attaches per-input propagation delays. Indices outside `0..K` are
    /// ignored; inputs without an entry keep the neutral delay.
    pub fn with_propagation_delays(mut self, delays: impl IntoIterator<Item = (usize, Delay)>) -> Self {
        for (index, delay) in delays {
            if index < self.k {
                self.propagation_delay.insert(lut_input_role(index), delay);
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn connections(&self) -> &LutConnections {
        &self.connections
    }

    pub const fn arity(&self) -> usize {
        self.k
    }

    pub fn lut_mask(&self) -> &str {
        &self.lut_mask
    }

    pub fn propagation_delay(&self, index: usize) -> Option<&Delay> {
        self.propagation_delay.get(&lut_input_role(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_connections_reject_gaps() {
        let mut map = IndexMap::new();
        map.insert("in_0".to_string(), "a".to_string());
        map.insert("in_2".to_string(), "c".to_string());
        map.insert("out".to_string(), "o".to_string());
        assert_eq!(
            LutConnections::try_from(map),
            Err(ConnectionsError::MissingInput("in_1".to_string()))
        );
    }

    #[test]
    fn lut_connections_sort_by_index() {
        let mut map = IndexMap::new();
        map.insert("in_1".to_string(), "b".to_string());
        map.insert("out".to_string(), "o".to_string());
        map.insert("in_0".to_string(), "a".to_string());
        let conns = LutConnections::try_from(map).unwrap();
        assert_eq!(conns.inputs, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(conns.out, "o");
    }

    #[test]
    fn propagation_delays_ignore_out_of_range() {
        let conns = LutConnections {
            inputs: vec!["a".into(), "b".into()],
            out: "o".into(),
        };
        let lut = LutCell::new("lut_k_1".into(), conns, "0110".into())
            .with_propagation_delays([(1, Delay::new("235")), (5, Delay::new("9"))]);
        assert_eq!(lut.propagation_delay(0), Some(&Delay::neutral()));
        assert_eq!(lut.propagation_delay(1), Some(&Delay::new("235")));
        assert_eq!(lut.propagation_delay(5), None);
    }
}
