//! The `explain` command: display documentation for schema error codes.

use mpgen_diagnostic::{ErrorCode, ErrorDocs};

/// Print the documentation for `code_str`. Returns false for unknown or
/// undocumented codes.
pub fn explain_error(code_str: &str) -> bool {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format MXXXX (errors) or WXXXX (warnings) where X is a digit.");
        eprintln!("Examples: M1002, M2002, M3001, W1001");
        return false;
    };

    if let Some(doc) = ErrorDocs::get(code) {
        println!("{doc}");
        true
    } else {
        eprintln!("No documentation available for {code}: {}", code.description());
        false
    }
}
