//! Diagnostic output.
//!
//! `mpgenc collect` reports the findings of a closure either as text for a
//! person at a terminal ([`TerminalEmitter`]) or as a JSON array for build
//! tooling ([`JsonEmitter`]). Both write to any `io::Write`, so tests capture
//! the output in a `Vec<u8>`.

mod json;
mod terminal;

pub use json::JsonEmitter;
pub use terminal::{ColorMode, TerminalEmitter};

use std::fmt::{self, Write as _};

use crate::Diagnostic;

/// Error and warning counts of one report.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub errors: usize,
    pub warnings: usize,
}

impl Tally {
    pub fn of(diagnostics: &[Diagnostic]) -> Self {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        Tally {
            errors,
            warnings: diagnostics.len() - errors,
        }
    }

    pub fn is_empty(self) -> bool {
        self.errors == 0 && self.warnings == 0
    }
}

/// A sink for the diagnostics of one collection run.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Written before the first diagnostic.
    fn open(&mut self) {}

    /// Written after the last diagnostic.
    fn close(&mut self, tally: Tally);

    fn flush(&mut self);

    /// Emit a whole report: the diagnostics in order, then the closing summary.
    fn report(&mut self, diagnostics: &[Diagnostic]) {
        self.open();
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
        self.close(Tally::of(diagnostics));
        self.flush();
    }
}

/// Separator written after item `index` of a `len`-item JSON list.
pub(crate) fn list_separator(index: usize, len: usize) -> &'static str {
    if index + 1 == len {
        ""
    } else {
        ","
    }
}

/// Displays a string as the body of a JSON string literal.
pub(crate) struct JsonStr<'a>(pub &'a str);

impl fmt::Display for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c if c.is_control() => write!(f, "\\u{:04x}", u32::from(c))?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorCode, Subject};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_str_escapes_type_names() {
        assert_eq!(JsonStr("Demo.Box<int>").to_string(), "Demo.Box<int>");
        assert_eq!(
            JsonStr("key \"id\" on `Demo.Widget`").to_string(),
            "key \\\"id\\\" on `Demo.Widget`"
        );
        assert_eq!(JsonStr("first\nsecond").to_string(), "first\\nsecond");
        assert_eq!(JsonStr("C:\\snapshot.json").to_string(), "C:\\\\snapshot.json");
        assert_eq!(JsonStr("\u{1}").to_string(), "\\u0001");
    }

    #[test]
    fn test_list_separator() {
        assert_eq!(list_separator(0, 2), ",");
        assert_eq!(list_separator(1, 2), "");
    }

    #[test]
    fn test_tally_counts_severities() {
        let diagnostics = [
            Diagnostic::error(ErrorCode::M2002)
                .with_label(Subject::member("Demo.Widget", "Name"), "key reused"),
            Diagnostic::warning(ErrorCode::W1001),
            Diagnostic::error(ErrorCode::M2003),
        ];
        assert_eq!(
            Tally::of(&diagnostics),
            Tally {
                errors: 2,
                warnings: 1
            }
        );
        assert!(Tally::of(&[]).is_empty());
    }
}
