//! Common types shared across the netschem workspace.
//!
//! This crate provides the schematic output contract, identifier and net
//! reference normalization, and compile configuration used by the compiler
//! and the command-line tool.

mod config;
mod id_string;
mod net_ref;
pub mod schematic;

pub use crate::config::*;
pub use crate::id_string::*;
pub use crate::net_ref::*;
pub use crate::schematic::*;
