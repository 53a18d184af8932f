//! mpgenc - driver for the mpgen schema compiler
//!
//! Loads a metadata snapshot, runs the schema closure engine over one or more
//! root sets, and reports the resulting schema model with its diagnostics.
//!
//! Command handlers live in [`commands`]; `main.rs` only parses arguments.

pub mod commands;
mod input;
mod render;
mod sets;
mod tracing_setup;

pub use input::{read_options, read_snapshot, resolve_roots, InputError};
pub use render::{render_json, render_text};
pub use sets::collect_sets;
pub use tracing_setup::init_tracing;
