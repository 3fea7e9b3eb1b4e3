#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use netschem_common::*;
use serde_json::{Value, json};

mod common;

#[test]
fn test_document_field_names() {
    let doc = common::sample_document();
    let value: Value = serde_json::from_str(&doc.to_json_string(false).unwrap()).unwrap();

    assert_eq!(value["type"], "schematic");
    assert_eq!(value["name"], "top");
    assert_eq!(value["external_wires"][0], json!({"name": "ext_input_clk", "type": "input"}));

    let dff = &value["cells"][0];
    assert_eq!(dff["type"], "DFF");
    assert_eq!(dff["name"], "dff_1");
    assert_eq!(dff["connections"]["D"], "dff_1_D");
    assert_eq!(dff["connections"]["Q"], "dff_1_Q");
    assert_eq!(dff["connections"]["clock"], "ext_input_clk");
    assert_eq!(dff["D_stability_delay"], "-46");
    assert_eq!(dff["Q_update_delay"], "303");

    let lut = &value["cells"][1];
    assert_eq!(lut["type"], "LUT_K");
    assert_eq!(lut["K"], 2);
    assert_eq!(lut["LUT_mask"], "0110");
    assert_eq!(lut["connections"]["in_0"], "lut_k_1_in_0");
    assert_eq!(lut["connections"]["in_1"], "0");
    assert_eq!(lut["connections"]["out"], "lut_k_1_out");
    assert_eq!(lut["propagation_delay"]["in_1"], "0");

    let route = &value["interconnects"][0];
    assert_eq!(route["name"], "route_ext_input_in1_TO_dff_1_D");
    assert_eq!(route["connections"], json!({"input": "ext_input_in1", "output": "dff_1_D"}));
    assert_eq!(route["propagation_delay"], "1079.77");
}

#[test]
fn test_lut_connections_keep_port_order() {
    let doc = common::sample_document();
    let json = doc.to_json_string(false).unwrap();
    let in0 = json.find("\"in_0\"").unwrap();
    let in1 = json.find("\"in_1\"").unwrap();
    let out = json.find("\"out\"").unwrap();
    assert!(in0 < in1 && in1 < out);
}

#[test]
fn test_reserialization_is_idempotent() {
    let doc = common::sample_document();
    let first = doc.to_json_string(true).unwrap();
    let reparsed = SchematicDocument::from_json_str(&first).unwrap();
    let second = reparsed.to_json_string(true).unwrap();

    assert_eq!(reparsed, doc);
    assert_eq!(first, second);
}

#[test]
fn test_missing_delay_fields_deserialize_to_neutral() {
    let json = r#"{
        "type": "schematic",
        "name": "",
        "external_wires": [],
        "cells": [{"type": "DFF", "name": "dff_1", "initial_value": "1",
                   "connections": {"D": "a", "Q": "b", "clock": "c"}}],
        "interconnects": [{"name": "route_b_TO_a", "connections": {"input": "b", "output": "a"}}]
    }"#;
    let doc = SchematicDocument::from_json_str(json).unwrap();
    let Cell::Dff(dff) = &doc.cells()[0] else {
        panic!("expected a DFF");
    };
    assert!(dff.d_stability_delay().is_neutral());
    assert!(dff.q_update_delay().is_neutral());
    assert!(doc.interconnects()[0].propagation_delay().is_neutral());
}

#[test]
fn test_rejects_incomplete_lut_connections() {
    let json = r#"{
        "type": "schematic", "name": "", "external_wires": [], "interconnects": [],
        "cells": [{"type": "LUT_K", "name": "lut_k_1", "K": 2, "LUT_mask": "01",
                   "connections": {"in_1": "a", "out": "b"}}]
    }"#;
    assert!(SchematicDocument::from_json_str(json).is_err());
}

#[test]
fn test_dangling_endpoints() {
    let doc = common::sample_document();
    let dangling = doc.dangling_endpoints();

    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].interconnect, "route_ghost_net_TO_dff_1_D");
    assert_eq!(dangling[0].side, EndpointSide::Input);
    assert_eq!(dangling[0].net, "ghost_net");
}

#[test]
fn test_summary_counts() {
    let summary = common::sample_document().summary();

    assert_eq!(summary.inputs, 2);
    assert_eq!(summary.outputs, 1);
    assert_eq!(summary.dffs, 1);
    assert_eq!(summary.luts, 1);
    assert_eq!(summary.interconnects, 4);
    assert_eq!(summary.timed_cells, 1);
    assert_eq!(summary.timed_interconnects, 1);
}

#[test]
fn test_port_bindings_cover_declared_roles() {
    let doc = common::sample_document();
    for cell in doc.cells() {
        let arity = match cell {
            Cell::LutK(lut) => lut.arity(),
            Cell::Dff(_) => 0,
        };
        let roles: Vec<String> = cell.port_bindings().into_iter().map(|(r, _)| r).collect();
        assert_eq!(roles, cell.kind().port_roles(arity));
        assert!(cell.connection_values().iter().all(|v| !v.is_empty()));
    }
}
