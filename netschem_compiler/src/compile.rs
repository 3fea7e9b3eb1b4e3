use std::path::{Path, PathBuf};

use netschem_common::{CompileConfig, SchematicDocument};
use rayon::prelude::*;
use tracing::info_span;

use crate::error::{CompileError, DocumentKind};
use crate::registry::PatternRegistry;
use crate::resolver::assemble;
use crate::structural::extract_structure;
use crate::timing::extract_timing;

/// Paths of the two documents describing one design.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DesignInputs {
    pub structural: PathBuf,
    pub timing: PathBuf,
}

impl DesignInputs {
    pub fn new<S: AsRef<Path>, T: AsRef<Path>>(structural: S, timing: T) -> Self {
        Self {
            structural: structural.as_ref().to_path_buf(),
            timing: timing.as_ref().to_path_buf(),
        }
    }
}

/// Compiles in-memory documents.
///
/// # Errors
///
/// Fails on a namer invariant violation, or on dangling endpoints in strict
/// mode.
///
/// # Panics
///
/// Panics if the built-in pattern registry violates its contract.
pub fn compile_str(
    structural: &str,
    timing: &str,
    config: &CompileConfig,
) -> Result<SchematicDocument, CompileError> {
    let registry = PatternRegistry::standard();
    let model = extract_structure(structural, registry)?;
    let delays = extract_timing(timing, registry, config.corner);
    assemble(model, &delays, config)
}

/// Reads both documents and compiles them. Neither document is processed
/// unless both could be read.
///
/// # Errors
///
/// Returns [`CompileError::MissingDocument`] naming the unreadable input,
/// plus everything [`compile_str`] can return.
pub fn compile_files(inputs: &DesignInputs, config: &CompileConfig) -> Result<SchematicDocument, CompileError> {
    let _span = info_span!("compile", design = %inputs.structural.display()).entered();

    let structural = read_document(DocumentKind::Structural, &inputs.structural)?;
    let timing = read_document(DocumentKind::Timing, &inputs.timing)?;
    compile_str(&structural, &timing, config)
}

/// Compiles independent designs in parallel. Results keep input order.
pub fn compile_batch(
    inputs: &[DesignInputs],
    config: &CompileConfig,
) -> Vec<Result<SchematicDocument, CompileError>> {
    // Registry contract faults surface on the calling thread.
    PatternRegistry::standard();

    inputs
        .par_iter()
        .map(|design| compile_files(design, config))
        .collect()
}

fn read_document(kind: DocumentKind, path: &Path) -> Result<String, CompileError> {
    std::fs::read_to_string(path).map_err(|source| CompileError::MissingDocument {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
