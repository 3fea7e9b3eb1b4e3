use serde::{Deserialize, Serialize};

use crate::Delay;

/// Source and destination nets of a route segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterconnectConnections {
    pub input: String,
    pub output: String,
}

/// A directed point-to-point net segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interconnect {
    name: String,
    connections: InterconnectConnections,
    #[serde(default)]
    propagation_delay: Delay,
}

impl Interconnect {
    /// Creates a segment named `route_<input>_TO_<output>` with a neutral delay.
    pub fn new(input: String, output: String) -> Self {
        Self {
            name: Self::canonical_name(&input, &output),
            connections: InterconnectConnections { input, output },
            propagation_delay: Delay::neutral(),
        }
    }

    pub fn canonical_name(input: &str, output: &str) -> String {
        format!("route_{input}_TO_{output}")
    }

    pub fn with_propagation_delay(mut self, delay: Delay) -> Self {
        self.propagation_delay = delay;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn connections(&self) -> &InterconnectConnections {
        &self.connections
    }

    pub fn input(&self) -> &str {
        &self.connections.input
    }

    pub fn output(&self) -> &str {
        &self.connections.output
    }

    pub const fn propagation_delay(&self) -> &Delay {
        &self.propagation_delay
    }
}
