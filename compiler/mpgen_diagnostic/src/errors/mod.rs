//! Embedded error documentation for `mpgenc explain` support.
//!
//! Each error code has a markdown file that explains the finding, shows a
//! minimal declaration that triggers it, and describes the fix. The files are
//! embedded at compile time and accessed via `ErrorDocs::get()`.
//!
//! # Adding New Documentation
//!
//! 1. Create a new file `MXXXX.md` in this directory
//! 2. Add an entry to the `DOCS` array below

use crate::ErrorCode;

/// Registry of embedded error documentation.
pub struct ErrorDocs;

impl ErrorDocs {
    /// Get the documentation for an error code.
    pub fn get(code: ErrorCode) -> Option<&'static str> {
        DOCS.iter().find(|(c, _)| *c == code).map(|(_, doc)| *doc)
    }

    /// Get all documented error codes.
    pub fn all_codes() -> impl Iterator<Item = ErrorCode> {
        DOCS.iter().map(|(code, _)| *code)
    }

    /// Check if an error code has documentation.
    pub fn has_docs(code: ErrorCode) -> bool {
        DOCS.iter().any(|(c, _)| *c == code)
    }
}

static DOCS: &[(ErrorCode, &str)] = &[
    // Closure / shape errors (M1xxx)
    (ErrorCode::M1001, include_str!("M1001.md")),
    (ErrorCode::M1002, include_str!("M1002.md")),
    (ErrorCode::M1003, include_str!("M1003.md")),
    (ErrorCode::M1004, include_str!("M1004.md")),
    (ErrorCode::M1005, include_str!("M1005.md")),
    (ErrorCode::M1006, include_str!("M1006.md")),
    // Key errors (M2xxx)
    (ErrorCode::M2001, include_str!("M2001.md")),
    (ErrorCode::M2002, include_str!("M2002.md")),
    (ErrorCode::M2003, include_str!("M2003.md")),
    (ErrorCode::M2004, include_str!("M2004.md")),
    (ErrorCode::M2005, include_str!("M2005.md")),
    // Constructor errors (M3xxx)
    (ErrorCode::M3001, include_str!("M3001.md")),
    (ErrorCode::M3002, include_str!("M3002.md")),
    (ErrorCode::M3003, include_str!("M3003.md")),
    // Union errors (M4xxx)
    (ErrorCode::M4001, include_str!("M4001.md")),
    (ErrorCode::M4002, include_str!("M4002.md")),
    (ErrorCode::M4003, include_str!("M4003.md")),
    // Internal errors (M9xxx)
    (ErrorCode::M9001, include_str!("M9001.md")),
    (ErrorCode::M9002, include_str!("M9002.md")),
    // Warnings
    (ErrorCode::W1001, include_str!("W1001.md")),
];
