use super::*;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::M2002)
        .with_message("duplicate key `0`")
        .with_label(Subject::member("Demo.Widget", "Name"), "key `0` used again here")
        .with_secondary_label(Subject::member("Demo.Widget", "Id"), "first used here")
        .with_note("each member needs its own key")
        .with_suggestion("renumber one of the members");

    assert_eq!(diag.code, ErrorCode::M2002);
    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 2);
    assert!(diag.labels[0].is_primary);
    assert!(!diag.labels[1].is_primary);
    assert_eq!(
        diag.subject(),
        Some(&Subject::member("Demo.Widget", "Name"))
    );
}

#[test]
fn test_for_code_uses_code_severity() {
    assert!(Diagnostic::for_code(ErrorCode::M2003).is_error());
    assert_eq!(
        Diagnostic::for_code(ErrorCode::W1001).severity,
        Severity::Warning
    );
}

#[test]
fn test_subject_display() {
    assert_eq!(Subject::ty("Demo.Node").to_string(), "Demo.Node");
    assert_eq!(
        Subject::member("Demo.Node", "Next").to_string(),
        "Demo.Node::Next"
    );
}

#[test]
fn test_diagnostic_display_format() {
    let diag = Diagnostic::error(ErrorCode::M2001)
        .with_message("members mix integer and string keys")
        .with_label(Subject::member("Demo.Mixed", "Name"), "string key here")
        .with_note("a note")
        .with_suggestion("a suggestion");

    let output = diag.to_string();
    assert!(output.contains("error [M2001]: members mix integer and string keys"));
    assert!(output.contains("--> Demo.Mixed::Name: string key here"));
    assert!(output.contains("= note: a note"));
    assert!(output.contains("= help: a suggestion"));
}

#[test]
fn test_no_subject_without_primary_label() {
    let diag = Diagnostic::error(ErrorCode::M9001)
        .with_secondary_label(Subject::ty("Demo.A"), "context");
    assert_eq!(diag.subject(), None);
}
