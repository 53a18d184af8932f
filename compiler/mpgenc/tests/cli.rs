// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests of the `mpgenc` binary.
//!
//! Each test writes a snapshot (and optionally an options file) into a
//! temporary directory and runs the real binary against it.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

const SHOP: &str = r#"{ "types": [
    { "name": "Demo.Order",
      "attributes": [{ "kind": "serializable_object" }],
      "properties": [
        { "name": "Id", "type": "int", "attributes": [{ "kind": "key", "value": 0 }] },
        { "name": "Lines", "type": "System.Collections.Generic.List<Demo.Line>",
          "attributes": [{ "kind": "key", "value": 1 }] }
      ],
      "constructors": [
        { "params": [
            { "name": "id", "type": "int" },
            { "name": "lines", "type": "System.Collections.Generic.List<Demo.Line>" } ] },
        { "params": [] }
      ] },
    { "name": "Demo.Line",
      "attributes": [{ "kind": "serializable_object" }],
      "properties": [
        { "name": "Sku", "type": "string", "attributes": [{ "kind": "key", "value": 0 }] },
        { "name": "Next", "type": "Demo.Line", "attributes": [{ "kind": "key", "value": 1 }] }
      ] },
    { "name": "Demo.IPayment", "kind": "interface",
      "attributes": [
        { "kind": "union", "discriminator": 5, "subtype": "Demo.Card" },
        { "kind": "union", "discriminator": 1, "subtype": "Demo.Cash" }
      ] },
    { "name": "Demo.Card", "interfaces": ["Demo.IPayment"],
      "attributes": [{ "kind": "serializable_object" }] },
    { "name": "Demo.Cash", "interfaces": ["Demo.IPayment"],
      "attributes": [{ "kind": "serializable_object" }] },
    { "name": "Demo.Clash",
      "attributes": [{ "kind": "serializable_object" }],
      "properties": [
        { "name": "First", "type": "int", "attributes": [{ "kind": "key", "value": 0 }] },
        { "name": "Second", "type": "int", "attributes": [{ "kind": "key", "value": 0 }] }
      ] },
    { "name": "Demo.Mixed",
      "attributes": [{ "kind": "serializable_object" }],
      "properties": [
        { "name": "Count", "type": "int", "attributes": [{ "kind": "key", "value": 0 }] },
        { "name": "Label", "type": "string", "attributes": [{ "kind": "key", "value": "label" }] }
      ] },
    { "name": "Demo.Loose",
      "attributes": [{ "kind": "serializable_object" }],
      "properties": [{ "name": "Title", "type": "string" }] }
] }"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shop.json"), SHOP).unwrap();
        Workspace { dir }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn snapshot(&self) -> PathBuf {
        self.dir.path().join("shop.json")
    }
}

fn mpgenc(args: &[&str], snapshot: Option<&Path>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_mpgenc"));
    command.env_remove("RUST_LOG");
    command.arg("collect");
    if let Some(path) = snapshot {
        command.arg(path);
    }
    command.args(args).args(["--color", "never"]);
    command.output().expect("failed to run mpgenc")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn collect_prints_text_model() {
    let ws = Workspace::new();
    let output = mpgenc(&["--root", "Demo.Order"], Some(&ws.snapshot()));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("  Demo.Order => Order [array]\n"));
    assert!(text.contains("    new(Id, Lines)\n"));
    assert!(text.contains(
        "  System.Collections.Generic.List<Demo.Line> => MsgPack::Formatters.ListFormatter<Demo.Line>\n"
    ));
    assert_eq!(text.matches("  Demo.Line => Line").count(), 1);
    assert!(stderr(&output).is_empty());
}

#[test]
fn collect_prints_json_model() {
    let ws = Workspace::new();
    let output = mpgenc(
        &["--root", "Demo.IPayment", "--format", "json"],
        Some(&ws.snapshot()),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        json["unions"]["Demo.IPayment"]["subtypes"],
        serde_json::json!([
            { "discriminator": 1, "subtype": "Demo.Cash" },
            { "discriminator": 5, "subtype": "Demo.Card" }
        ])
    );
    let diagnostics: serde_json::Value = serde_json::from_str(&stderr(&output)).unwrap();
    assert_eq!(diagnostics, serde_json::json!([]));
}

#[test]
fn root_sets_are_merged() {
    let ws = Workspace::new();
    let merged = mpgenc(
        &["-r", "Demo.Order", "--set", "-r", "Demo.IPayment", "--format", "json"],
        Some(&ws.snapshot()),
    );
    let together = mpgenc(
        &["-r", "Demo.Order", "-r", "Demo.IPayment", "--format", "json"],
        Some(&ws.snapshot()),
    );

    assert!(merged.status.success());
    assert_eq!(stdout(&merged), stdout(&together));
}

#[test]
fn output_is_stable_across_runs() {
    let ws = Workspace::new();
    let args = ["-r", "Demo.IPayment", "-r", "Demo.Order", "--format", "json"];
    let first = mpgenc(&args, Some(&ws.snapshot()));
    let second = mpgenc(&args, Some(&ws.snapshot()));
    assert_eq!(stdout(&first), stdout(&second));
}

#[test]
fn recoverable_errors_fail_the_run() {
    let ws = Workspace::new();
    let output = mpgenc(&["--root", "Demo.Clash"], Some(&ws.snapshot()));

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("  Demo.Clash => Clash [array]\n"));
    let diagnostics = stderr(&output);
    assert!(diagnostics.contains("error[M2002]"));
    assert!(diagnostics.contains("Demo.Clash::Second"));
    assert!(diagnostics.contains("Demo.Clash::First"));
}

#[test]
fn fatal_error_prints_no_model() {
    let ws = Workspace::new();
    let output = mpgenc(&["--root", "Demo.Mixed"], Some(&ws.snapshot()));

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("error[M2001]"));
}

#[test]
fn options_file_enables_map_mode() {
    let ws = Workspace::new();
    let options = ws.write("options.json", r#"{ "forceMapMode": true }"#);
    let without = mpgenc(&["--root", "Demo.Loose"], Some(&ws.snapshot()));
    let with = mpgenc(
        &["--root", "Demo.Loose", "--options", options.to_str().unwrap()],
        Some(&ws.snapshot()),
    );

    assert_eq!(without.status.code(), Some(1));
    assert!(stderr(&without).contains("error[M2003]"));

    assert!(with.status.success(), "stderr: {}", stderr(&with));
    assert!(stdout(&with).contains("  Demo.Loose => Loose [map]\n"));
    assert!(stdout(&with).contains("\"Title\" property Title: string"));
}

#[test]
fn invalid_snapshot_is_reported() {
    let ws = Workspace::new();
    let broken = ws.write("broken.json", r#"{ "types": [{ "name": "Demo.A" }, { "name": "Demo.A" }] }"#);
    let output = mpgenc(&["--root", "Demo.A"], Some(&broken));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error[M9002]"));
}

#[test]
fn unknown_root_is_reported() {
    let ws = Workspace::new();
    let output = mpgenc(&["--root", "Demo.Nowhere"], Some(&ws.snapshot()));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error[M1002]"));
}

#[test]
fn missing_arguments_are_usage_errors() {
    let output = mpgenc(&[], None);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("missing snapshot file"));
}

#[test]
fn explain_prints_documentation() {
    let output = Command::new(env!("CARGO_BIN_EXE_mpgenc"))
        .args(["explain", "m2002"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("M2002"));

    let unknown = Command::new(env!("CARGO_BIN_EXE_mpgenc"))
        .args(["explain", "X0000"])
        .output()
        .unwrap();
    assert_eq!(unknown.status.code(), Some(1));
}
