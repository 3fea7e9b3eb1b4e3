use std::fs;
use std::path::{Path, PathBuf};

use netschem_common::{CompileConfig, SchematicDocument};
use netschem_compiler::{CompileError, DesignInputs, compile_batch, compile_files};
use thiserror::Error;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::args::{Command, CompileOptions};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("{dir}: expected one .v and one .sdf file, found {netlists} and {timings}")]
    DesignDiscovery {
        dir: PathBuf,
        netlists: usize,
        timings: usize,
    },
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a schematic document: {source}", path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} dangling interconnect endpoints")]
    Dangling(usize),
    #[error("{failed} of {total} designs failed")]
    BatchFailures { failed: usize, total: usize },
}

/// The line printed for a failed command: the error and its causes, joined
/// with `: `, without repeating a cause the message already contains.
pub fn failure_message(err: &CliError) -> String {
    let mut message = format!("error: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

pub fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Compile {
            netlist,
            timing,
            output,
            module_name,
            options,
        } => {
            let mut config = options.to_config();
            if let Some(name) = module_name.as_deref() {
                config = config.with_module_name(name);
            }
            compile(&DesignInputs::new(netlist, timing), output.as_deref(), &config, options.pretty)
        }
        Command::Batch { dirs, options } => batch(&dirs, &options),
        Command::Check { document } => check(&document),
    }
}

fn compile(
    inputs: &DesignInputs,
    output: Option<&Path>,
    config: &CompileConfig,
    pretty: bool,
) -> Result<(), CliError> {
    let document = compile_files(inputs, config)?;
    info!("{}", document.summary());

    let json = document.to_json_string(pretty).map_err(CompileError::from)?;
    match output {
        Some(path) => write_json(path, &json),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn batch(dirs: &[PathBuf], options: &CompileOptions) -> Result<(), CliError> {
    let mut failed = 0usize;
    let mut designs = Vec::with_capacity(dirs.len());
    for dir in dirs {
        match discover(dir) {
            Ok(inputs) => designs.push(inputs),
            Err(e) => {
                error!("{e}");
                failed += 1;
            }
        }
    }

    let results = compile_batch(&designs, &options.to_config());
    for (inputs, result) in designs.iter().zip(results) {
        let written = result
            .map_err(CliError::from)
            .and_then(|document| write_beside(inputs, &document, options.pretty));
        match written {
            Ok(path) => info!("Wrote {}", path.display()),
            Err(e) => {
                error!("{}: {e}", inputs.structural.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::BatchFailures {
            failed,
            total: dirs.len(),
        });
    }
    Ok(())
}

/// Finds the single netlist and timing file in `dir`.
pub fn discover(dir: &Path) -> Result<DesignInputs, CliError> {
    let mut netlists = Vec::new();
    let mut timings = Vec::new();

    for entry in WalkDir::new(dir).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| CliError::Io {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match path.extension().and_then(|s| s.to_str()) {
            Some("v") => netlists.push(path.to_path_buf()),
            Some("sdf") => timings.push(path.to_path_buf()),
            _ => {}
        }
    }

    match (netlists.as_slice(), timings.as_slice()) {
        ([netlist], [timing]) => Ok(DesignInputs::new(netlist, timing)),
        _ => Err(CliError::DesignDiscovery {
            dir: dir.to_path_buf(),
            netlists: netlists.len(),
            timings: timings.len(),
        }),
    }
}

fn write_beside(inputs: &DesignInputs, document: &SchematicDocument, pretty: bool) -> Result<PathBuf, CliError> {
    let path = inputs.structural.with_extension("json");
    let json = document.to_json_string(pretty).map_err(CompileError::from)?;
    write_json(&path, &json)?;
    Ok(path)
}

fn write_json(path: &Path, json: &str) -> Result<(), CliError> {
    fs::write(path, json).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn check(path: &Path) -> Result<(), CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = SchematicDocument::from_json_str(&text).map_err(|source| CliError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })?;

    println!("{document}");
    let dangling = document.dangling_endpoints();
    for endpoint in &dangling {
        warn!("{endpoint}");
        println!("{endpoint}");
    }
    if !dangling.is_empty() {
        return Err(CliError::Dangling(dangling.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::CornerArg;

    const NETLIST: &str = r"module pass (input \a , input \clk , output \y );
  DFF #(.INITIAL_VALUE(1'b0)) \ff  (.D(\a ), .Q(\y ), .clock(\clk ));
endmodule
";

    const TIMING: &str = r#"(DELAYFILE
  (CELL (CELLTYPE "DFF") (INSTANCE ff)
    (DELAY (ABSOLUTE (IOPATH (posedge clock) Q (1:2:3) (1:2:3))))
    (TIMINGCHECK (SETUP D (posedge clock) (4:5:6))))
)"#;

    fn options() -> CompileOptions {
        CompileOptions {
            corner: CornerArg::Typ,
            strict: false,
            pretty: true,
        }
    }

    fn design_dir(root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(format!("{name}.v")), NETLIST).unwrap();
        fs::write(dir.join(format!("{name}.sdf")), TIMING).unwrap();
        dir
    }

    #[test]
    fn discover_pairs_netlist_and_timing() {
        let root = tempfile::tempdir().unwrap();
        let dir = design_dir(root.path(), "pass");
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let inputs = discover(&dir).unwrap();
        assert_eq!(inputs.structural, dir.join("pass.v"));
        assert_eq!(inputs.timing, dir.join("pass.sdf"));
    }

    #[test]
    fn discover_rejects_ambiguous_directories() {
        let root = tempfile::tempdir().unwrap();
        let dir = design_dir(root.path(), "pass");
        fs::write(dir.join("other.v"), NETLIST).unwrap();

        match discover(&dir) {
            Err(CliError::DesignDiscovery { netlists, timings, .. }) => {
                assert_eq!(netlists, 2);
                assert_eq!(timings, 1);
            }
            other => panic!("expected a discovery error, got {other:?}"),
        }
    }

    #[test]
    fn compile_writes_output_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = design_dir(root.path(), "pass");
        let out = root.path().join("out.json");

        run(Command::Compile {
            netlist: dir.join("pass.v"),
            timing: dir.join("pass.sdf"),
            output: Some(out.clone()),
            module_name: Some("renamed".to_string()),
            options: options(),
        })
        .unwrap();

        let document = SchematicDocument::from_json_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(document.name(), "renamed");
        assert_eq!(document.summary().timed_cells, 1);
    }

    #[test]
    fn batch_writes_json_beside_each_netlist() {
        let root = tempfile::tempdir().unwrap();
        let dirs = vec![design_dir(root.path(), "one"), design_dir(root.path(), "two")];

        batch(&dirs, &options()).unwrap();

        for (dir, stem) in dirs.iter().zip(["one", "two"]) {
            let json = fs::read_to_string(dir.join(format!("{stem}.json"))).unwrap();
            assert_eq!(SchematicDocument::from_json_str(&json).unwrap().name(), "pass");
        }
    }

    #[test]
    fn batch_counts_failures() {
        let root = tempfile::tempdir().unwrap();
        let good = design_dir(root.path(), "good");
        let empty = root.path().join("empty");
        fs::create_dir(&empty).unwrap();

        match batch(&[good.clone(), empty], &options()) {
            Err(CliError::BatchFailures { failed, total }) => {
                assert_eq!(failed, 1);
                assert_eq!(total, 2);
            }
            other => panic!("expected batch failures, got {other:?}"),
        }
        assert!(good.join("good.json").exists());
    }

    #[test]
    fn check_reports_dangling_endpoints() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("doc.json");
        let json = r#"{
            "type": "schematic",
            "name": "loose",
            "external_wires": [{"name": "ext_input_a", "type": "input"}],
            "cells": [],
            "interconnects": [{
                "name": "route_ext_input_a_TO_nowhere",
                "connections": {"input": "ext_input_a", "output": "nowhere"},
                "propagation_delay": "0"
            }]
        }"#;
        fs::write(&path, json).unwrap();

        assert!(matches!(check(&path), Err(CliError::Dangling(1))));
    }

    #[test]
    fn failure_message_names_the_missing_document() {
        let root = tempfile::tempdir().unwrap();
        let dir = design_dir(root.path(), "pass");
        fs::remove_file(dir.join("pass.sdf")).unwrap();

        let err = run(Command::Compile {
            netlist: dir.join("pass.v"),
            timing: dir.join("pass.sdf"),
            output: None,
            module_name: None,
            options: options(),
        })
        .unwrap_err();
        let message = failure_message(&err);

        assert!(message.starts_with("error: cannot read timing annotation"), "{message}");
        assert!(message.contains("pass.sdf"), "{message}");
        assert!(!message.contains("MissingDocument"), "{message}");
    }

    #[test]
    fn check_rejects_non_documents() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("bad.json");
        fs::write(&path, "{\"type\": \"netlist\"}").unwrap();

        assert!(matches!(check(&path), Err(CliError::InvalidDocument { .. })));
    }
}
