//! Snapshot and options files.
//!
//! A snapshot file is a JSON object with a `types` array of declarations; an
//! options file is a JSON `CollectorOptions` with camelCase keys.

use std::path::{Path, PathBuf};

use mpgen_diagnostic::{Diagnostic, ErrorCode, Subject};
use mpgen_ir::{MetadataSnapshot, ParseTypeError, SnapshotError, TypeDecl, TypeRef};
use mpgen_schema::CollectorOptions;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Errors raised before the engine runs.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("`{}` is not valid JSON input: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid metadata snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("invalid root type `{text}`: {source}")]
    Root {
        text: String,
        source: ParseTypeError,
    },
}

impl InputError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(ErrorCode::M9002).with_message(self.to_string());
        match self {
            InputError::Root { text, .. } => {
                diag.with_label(Subject::ty(text.as_str()), "not a type expression")
            }
            InputError::Json { .. } => {
                diag.with_note("snapshot files hold `{ \"types\": [...] }`; options use camelCase keys")
            }
            InputError::Io { .. } | InputError::Snapshot(_) => diag,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotFile {
    #[serde(default)]
    types: Vec<TypeDecl>,
}

/// Load and validate a metadata snapshot.
pub fn read_snapshot(path: &Path) -> Result<MetadataSnapshot, InputError> {
    let file: SnapshotFile = read_json(path)?;
    tracing::debug!(path = %path.display(), types = file.types.len(), "loaded snapshot");
    Ok(MetadataSnapshot::from_decls(file.types)?)
}

pub fn read_options(path: &Path) -> Result<CollectorOptions, InputError> {
    read_json(path)
}

/// Parse root type expressions against the snapshot, so `Demo.Box<T>` names
/// the generic definition.
pub fn resolve_roots(
    snapshot: &MetadataSnapshot,
    texts: &[String],
) -> Result<Vec<TypeRef>, InputError> {
    texts
        .iter()
        .map(|text| {
            snapshot
                .resolve_type(text)
                .map_err(|source| InputError::Root {
                    text: text.clone(),
                    source,
                })
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_snapshot() {
        let file = write_temp(
            r#"{ "types": [
                { "name": "Demo.Box", "type_params": [{ "name": "T" }],
                  "attributes": [{ "kind": "serializable_object" }],
                  "properties": [{ "name": "Value", "type": "T",
                                   "attributes": [{ "kind": "key", "value": 0 }] }] }
            ] }"#,
        );
        let snapshot = read_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.len(), 1);

        let roots = resolve_roots(&snapshot, &["Demo.Box<T>".to_string()]).unwrap();
        assert!(roots[0].generic_args()[0].is_param());
    }

    #[test]
    fn test_read_options() {
        let file = write_temp(
            r#"{ "forceMapMode": true, "ignoredTypeNames": ["Vendor.Blob"] }"#,
        );
        let options = read_options(file.path()).unwrap();
        assert!(options.force_map_mode);
        assert!(options.ignored_type_names.contains("Vendor.Blob"));
        assert!(options.custom_formatter_catalog.is_empty());
    }

    #[test]
    fn test_duplicate_declaration() {
        let file = write_temp(r#"{ "types": [{ "name": "Demo.A" }, { "name": "Demo.A" }] }"#);
        let err = read_snapshot(file.path()).unwrap_err();
        assert!(matches!(
            err,
            InputError::Snapshot(SnapshotError::DuplicateType(ref name)) if name == "Demo.A"
        ));
        assert_eq!(err.to_diagnostic().code, ErrorCode::M9002);
    }

    #[test]
    fn test_malformed_json() {
        let file = write_temp("{ \"types\": [");
        assert!(matches!(
            read_snapshot(file.path()),
            Err(InputError::Json { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = read_options(Path::new("/nonexistent/options.json")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/options.json"));
    }

    #[test]
    fn test_bad_root() {
        let snapshot = MetadataSnapshot::new();
        let err = resolve_roots(&snapshot, &["Demo.Box<".to_string()]).unwrap_err();
        let diag = err.to_diagnostic();
        assert_eq!(
            diag.subject().map(|s| s.type_name.as_str()),
            Some("Demo.Box<")
        );
    }
}
