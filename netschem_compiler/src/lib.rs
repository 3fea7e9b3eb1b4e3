//! Netlist and timing compiler.
//!
//! Turns a post-synthesis structural netlist and its SDF timing annotation
//! into a [`SchematicDocument`]. Each compile owns its namer, alias table and
//! delay table; only the immutable pattern registry is shared.

pub mod alias;
pub mod compile;
pub mod error;
pub mod namer;
pub mod registry;
pub mod resolver;
pub mod structural;
pub mod timing;

pub use compile::{DesignInputs, compile_batch, compile_files, compile_str};
pub use error::{CompileError, DocumentKind};
pub use namer::{NamerError, SymbolNamer};
pub use registry::{PatternKind, PatternRegistry, RegistryError, Role};

pub use netschem_common::{CompileConfig, DelayCorner, SchematicDocument};
