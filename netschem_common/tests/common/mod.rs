use netschem_common::*;

/// A two-cell document: `clk`/`in1` drive a flip-flop whose output feeds a
/// lookup table, plus one dangling route.
pub fn sample_document() -> SchematicDocument {
    let wires = vec![
        ExternalWire::from_port(WireDirection::Input, "clk"),
        ExternalWire::from_port(WireDirection::Input, "in1"),
        ExternalWire::from_port(WireDirection::Output, "out1"),
    ];

    let dff = DffCell::new(
        "dff_1".to_string(),
        DffConnections {
            d: "dff_1_D".to_string(),
            q: "dff_1_Q".to_string(),
            clock: "ext_input_clk".to_string(),
        },
        "0".to_string(),
    )
    .with_timing(Delay::new("-46"), Delay::new("303"));

    let lut = LutCell::new(
        "lut_k_1".to_string(),
        LutConnections {
            inputs: vec!["lut_k_1_in_0".to_string(), "0".to_string()],
            out: "lut_k_1_out".to_string(),
        },
        "0110".to_string(),
    );

    let routes = vec![
        Interconnect::new("ext_input_in1".to_string(), "dff_1_D".to_string())
            .with_propagation_delay(Delay::new("1079.77")),
        Interconnect::new("dff_1_Q".to_string(), "lut_k_1_in_0".to_string()),
        Interconnect::new("lut_k_1_out".to_string(), "ext_output_out1".to_string()),
        Interconnect::new("ghost_net".to_string(), "dff_1_D".to_string()),
    ];

    SchematicDocument::new(
        "top".to_string(),
        wires,
        vec![Cell::Dff(dff), Cell::LutK(lut)],
        routes,
    )
}
