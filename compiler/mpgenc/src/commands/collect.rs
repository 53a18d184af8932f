//! The `collect` command: compute and print the schema model.

use std::io::IsTerminal;
use std::path::PathBuf;

use mpgen_diagnostic::emitter::{ColorMode, DiagnosticEmitter, JsonEmitter, TerminalEmitter};
use mpgen_diagnostic::Diagnostic;
use mpgen_schema::{CollectorOptions, SchemaModel};

use crate::{collect_sets, read_options, read_snapshot, render_json, render_text, resolve_roots};

/// Output format for the model and its diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown format `{other}` (expected text or json)"
            )),
        }
    }
}

/// Arguments of `mpgenc collect`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectArgs {
    pub snapshot: PathBuf,
    /// Root type expressions, one group per independent root set.
    pub root_sets: Vec<Vec<String>>,
    pub options: Option<PathBuf>,
    pub format: OutputFormat,
    pub color: ColorMode,
}

impl CollectArgs {
    /// Parse the arguments following `collect`.
    ///
    /// `--set` closes the current root set; empty sets are dropped.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut parsed = CollectArgs::default();
        let mut snapshot = None;
        let mut current: Vec<String> = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--root" | "-r" => current.push(value_of(arg, iter.next())?.clone()),
                "--set" => {
                    if !current.is_empty() {
                        parsed.root_sets.push(std::mem::take(&mut current));
                    }
                }
                "--options" => parsed.options = Some(PathBuf::from(value_of(arg, iter.next())?)),
                "--format" => parsed.format = value_of(arg, iter.next())?.parse()?,
                "--color" => parsed.color = value_of(arg, iter.next())?.parse()?,
                flag if flag.starts_with('-') => return Err(format!("unknown option `{flag}`")),
                path if snapshot.is_none() => snapshot = Some(PathBuf::from(path)),
                extra => return Err(format!("unexpected argument `{extra}`")),
            }
        }
        if !current.is_empty() {
            parsed.root_sets.push(current);
        }

        parsed.snapshot = snapshot.ok_or("missing snapshot file")?;
        if parsed.root_sets.is_empty() {
            return Err("at least one --root is required".to_string());
        }
        Ok(parsed)
    }
}

fn value_of<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a String, String> {
    value.ok_or_else(|| format!("`{flag}` needs a value"))
}

/// Load the inputs and run every root set.
///
/// Input and fatal closure errors come back as a single diagnostic.
pub fn run_collection(args: &CollectArgs) -> Result<SchemaModel, Diagnostic> {
    let snapshot = read_snapshot(&args.snapshot).map_err(|e| e.to_diagnostic())?;
    let options = match &args.options {
        Some(path) => read_options(path).map_err(|e| e.to_diagnostic())?,
        None => CollectorOptions::default(),
    };
    let sets = args
        .root_sets
        .iter()
        .map(|texts| resolve_roots(&snapshot, texts))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_diagnostic())?;

    tracing::debug!(
        types = snapshot.len(),
        sets = sets.len(),
        force_map_mode = options.force_map_mode,
        "collecting"
    );
    collect_sets(&snapshot, &options, &sets).map_err(|e| e.to_diagnostic())
}

/// Run `mpgenc collect`: the model goes to stdout, diagnostics to stderr.
///
/// Returns false on a fatal error or when any diagnostic is an error.
pub fn collect_command(args: &CollectArgs) -> bool {
    let (model, diagnostics): (Option<SchemaModel>, Vec<Diagnostic>) = match run_collection(args) {
        Ok(model) => {
            let diagnostics = model.diagnostics().into_iter().cloned().collect();
            (Some(model), diagnostics)
        }
        Err(diag) => (None, vec![diag]),
    };

    let mut ok = true;
    if let Some(model) = &model {
        match args.format {
            OutputFormat::Text => print!("{}", render_text(model)),
            OutputFormat::Json => match render_json(model) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: cannot render the schema model: {e}");
                    ok = false;
                }
            },
        }
    }

    report(&diagnostics, args.format, args.color);
    ok && !diagnostics.iter().any(Diagnostic::is_error)
}

fn report(diagnostics: &[Diagnostic], format: OutputFormat, color: ColorMode) {
    match format {
        OutputFormat::Text => {
            TerminalEmitter::<std::io::Stderr>::stderr(color, std::io::stderr().is_terminal())
                .report(diagnostics);
        }
        OutputFormat::Json => JsonEmitter::new(std::io::stderr()).report(diagnostics),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_root_sets() {
        let parsed = CollectArgs::parse(&args(&[
            "types.json",
            "--root",
            "Demo.A",
            "-r",
            "Demo.B",
            "--set",
            "--root",
            "Demo.C",
            "--set",
            "--format",
            "json",
        ]))
        .unwrap();

        assert_eq!(parsed.snapshot, PathBuf::from("types.json"));
        assert_eq!(
            parsed.root_sets,
            vec![
                vec!["Demo.A".to_string(), "Demo.B".to_string()],
                vec!["Demo.C".to_string()],
            ]
        );
        assert_eq!(parsed.format, OutputFormat::Json);
        assert_eq!(parsed.options, None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            CollectArgs::parse(&args(&["--root", "Demo.A"])),
            Err("missing snapshot file".to_string())
        );
        assert_eq!(
            CollectArgs::parse(&args(&["types.json"])),
            Err("at least one --root is required".to_string())
        );
        assert_eq!(
            CollectArgs::parse(&args(&["types.json", "--root"])),
            Err("`--root` needs a value".to_string())
        );
        assert!(CollectArgs::parse(&args(&["types.json", "--format", "yaml", "-r", "A"])).is_err());
        assert!(CollectArgs::parse(&args(&["types.json", "--bogus"])).is_err());
        assert!(CollectArgs::parse(&args(&["a.json", "b.json", "-r", "A"])).is_err());
    }
}
