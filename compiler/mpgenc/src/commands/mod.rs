//! Command handlers for the mpgenc CLI.
//!
//! Each submodule implements one command. Handlers print their own output
//! and return whether the command succeeded; `main.rs` maps that to the exit
//! status.

mod collect;
mod explain;

pub use collect::{collect_command, run_collection, CollectArgs, OutputFormat};
pub use explain::explain_error;
