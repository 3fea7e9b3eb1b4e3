use std::fmt;
use std::path::PathBuf;

use netschem_common::DanglingEndpoint;
use thiserror::Error;

use crate::namer::NamerError;

/// The two inputs of a compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Structural,
    Timing,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural netlist"),
            Self::Timing => write!(f, "timing annotation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("cannot read {kind} {}: {source}", path.display())]
    MissingDocument {
        kind: DocumentKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("namer invariant violated: {0}")]
    Namer(#[from] NamerError),
    #[error("{}", describe_dangling(.0))]
    DanglingEndpoints(Vec<DanglingEndpoint>),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_dangling(endpoints: &[DanglingEndpoint]) -> String {
    match endpoints.first() {
        Some(first) => format!("{} dangling interconnect endpoints, first: {first}", endpoints.len()),
        None => "dangling interconnect endpoints".to_string(),
    }
}
