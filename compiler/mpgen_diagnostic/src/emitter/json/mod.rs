//! JSON Emitter
//!
//! Machine-readable diagnostic output in JSON format.

use std::io::Write;

use crate::{Diagnostic, Label};

use super::{list_separator, DiagnosticEmitter, JsonStr, Tally};

/// JSON emitter for machine-readable output.
pub struct JsonEmitter<W: Write> {
    writer: W,
    first: bool,
}

impl<W: Write> JsonEmitter<W> {
    /// Create a new JSON emitter.
    pub fn new(writer: W) -> Self {
        JsonEmitter {
            writer,
            first: true,
        }
    }

    fn write_label(&mut self, label: &Label, comma: &str) {
        let _ = writeln!(self.writer, "      {{");
        let _ = writeln!(
            self.writer,
            "        \"type\": \"{}\",",
            JsonStr(&label.subject.type_name)
        );
        if let Some(member) = &label.subject.member {
            let _ = writeln!(
                self.writer,
                "        \"member\": \"{}\",",
                JsonStr(member)
            );
        }
        let _ = writeln!(
            self.writer,
            "        \"message\": \"{}\",",
            JsonStr(&label.message)
        );
        let _ = writeln!(self.writer, "        \"primary\": {}", label.is_primary);
        let _ = writeln!(self.writer, "      }}{comma}");
    }

    fn write_strings(&mut self, key: &str, items: &[String], last: bool) {
        let _ = writeln!(self.writer, "    \"{key}\": [");
        for (i, item) in items.iter().enumerate() {
            let comma = list_separator(i, items.len());
            let _ = writeln!(self.writer, "      \"{}\"{}", JsonStr(item), comma);
        }
        let _ = writeln!(self.writer, "    ]{}", if last { "" } else { "," });
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        if !self.first {
            let _ = writeln!(self.writer, ",");
        }
        self.first = false;

        let _ = writeln!(self.writer, "  {{");
        let _ = writeln!(
            self.writer,
            "    \"code\": \"{}\",",
            diagnostic.code.as_str()
        );
        let _ = writeln!(
            self.writer,
            "    \"severity\": \"{}\",",
            diagnostic.severity
        );
        let _ = writeln!(
            self.writer,
            "    \"message\": \"{}\",",
            JsonStr(&diagnostic.message)
        );

        let _ = writeln!(self.writer, "    \"labels\": [");
        for (i, label) in diagnostic.labels.iter().enumerate() {
            let comma = list_separator(i, diagnostic.labels.len());
            self.write_label(label, comma);
        }
        let _ = writeln!(self.writer, "    ],");

        self.write_strings("notes", &diagnostic.notes, false);
        self.write_strings("suggestions", &diagnostic.suggestions, true);

        let _ = write!(self.writer, "  }}");
    }

    fn open(&mut self) {
        let _ = writeln!(self.writer, "[");
    }

    /// Closes the array; counts are derivable from its items.
    fn close(&mut self, _tally: Tally) {
        let _ = writeln!(self.writer, "\n]");
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}
