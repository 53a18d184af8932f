use super::*;
use mpgen_diagnostic::{ErrorCode, Subject};
use pretty_assertions::assert_eq;

fn identity(text: &str) -> TypeIdentity {
    match TypeRef::parse(text) {
        Ok(ty) => ty.identity(),
        Err(err) => panic!("bad type `{text}`: {err}"),
    }
}

fn object(name: &str) -> ObjectSchema {
    ObjectSchema {
        identity: identity(name),
        is_reference_type: true,
        is_open_generic: false,
        generic_parameters: Vec::new(),
        constructor_binding: None,
        key_mode: KeyMode::Int,
        members: Vec::new(),
        lifecycle_hooks: LifecycleHooks::default(),
        codec_name: name.rsplit('.').next().unwrap_or(name).to_string(),
        namespace: Some("Demo".to_string()),
        diagnostics: Vec::new(),
    }
}

fn member(name: &str, key: MemberKey) -> MemberSchema {
    MemberSchema {
        storage_kind: StorageKind::Property,
        is_readable: true,
        is_writable: true,
        key,
        source_name: name.to_string(),
        declared_type: TypeRef::named("int"),
        override_codec: None,
    }
}

#[test]
fn test_objects_iterate_in_identity_order() {
    let mut model = SchemaModel::default();
    model.insert_object(object("Demo.Zebra"));
    model.insert_object(object("Demo.Apple"));
    model.insert_object(object("Demo.Mango"));

    let names: Vec<&str> = model.objects().map(|o| o.identity.as_str()).collect();
    assert_eq!(names, vec!["Demo.Apple", "Demo.Mango", "Demo.Zebra"]);
    assert_eq!(model.len(), 3);
    assert!(model.object("Demo.Mango").is_some());
}

#[test]
fn test_constructor_members_follow_binding_order() {
    let mut schema = object("Demo.Person");
    schema.members = vec![
        member("Age", MemberKey::Int(0)),
        member("Name", MemberKey::Int(1)),
    ];
    schema.constructor_binding = Some(vec![MemberRef(1), MemberRef(0)]);

    let bound: Vec<&str> = schema
        .constructor_members()
        .map(|m| m.source_name.as_str())
        .collect();
    assert_eq!(bound, vec!["Name", "Age"]);
    assert_eq!(schema.member("Age").map(|m| m.key.clone()), Some(MemberKey::Int(0)));
}

#[test]
fn test_diagnostics_ordered_by_owner() {
    let mut model = SchemaModel::default();
    let mut late = object("Demo.Zed");
    late.diagnostics.push(
        Diagnostic::error(ErrorCode::M2002).with_label(Subject::member("Demo.Zed", "B"), "here"),
    );
    let mut early = object("Demo.Abc");
    early.diagnostics.push(
        Diagnostic::warning(ErrorCode::W1001).with_label(Subject::member("Demo.Abc", "A"), "here"),
    );
    model.insert_object(late);
    model.insert_object(early);

    let codes: Vec<ErrorCode> = model.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::W1001, ErrorCode::M2002]);
    assert!(model.has_errors());
}

#[test]
fn test_merge_keeps_existing_entries() {
    let mut left = SchemaModel::default();
    left.insert_object(object("Demo.Shared"));
    left.insert_enum(EnumSchema {
        identity: identity("Demo.Color"),
        underlying_integer_type: "int".to_string(),
        codec_name: "Color".to_string(),
        namespace: Some("Demo".to_string()),
    });

    let mut right = SchemaModel::default();
    let mut other = object("Demo.Shared");
    other.codec_name = "Other".to_string();
    right.insert_object(other);
    right.insert_generic(GenericSchema {
        instantiation_identity: identity("Demo.Shared[]"),
        codec_expression: "MsgPack::Formatters.ArrayFormatter<Demo.Shared>".to_string(),
        is_open_generic: false,
    });

    left.merge(right);
    assert_eq!(left.len(), 3);
    assert_eq!(
        left.object("Demo.Shared").map(|o| o.codec_name.as_str()),
        Some("Shared")
    );
    assert!(left.generic("Demo.Shared[]").is_some());
    assert!(left.enumeration("Demo.Color").is_some());
}

#[test]
fn test_member_key_accessors() {
    let key = MemberKey::String {
        ordinal: 2,
        name: "id".to_string(),
    };
    assert_eq!(key.mode(), KeyMode::String);
    assert_eq!(key.as_str(), Some("id"));
    assert_eq!(key.as_int(), None);
    assert_eq!(key.to_string(), "\"id\"");
    assert_eq!(MemberKey::Int(3).to_string(), "3");
}
