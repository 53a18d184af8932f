//! Diagnostic system for schema closure reporting.
//!
//! Every finding produced while collecting a schema is a [`Diagnostic`]:
//! - Error codes for searchability (`mpgenc explain M2002`)
//! - Clear messages (what went wrong)
//! - A primary subject (which type and member)
//! - Secondary subjects (related members, such as the other half of a key clash)
//! - Notes and suggestions (how to fix)
//!
//! Fatal conditions abort the closure and are converted to diagnostics by the
//! engine; recoverable ones are attached to the schema that owns them.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;

pub use diagnostic::{Diagnostic, Label, Severity, Subject};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
