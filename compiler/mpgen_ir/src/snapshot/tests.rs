use super::*;
use crate::{Accessibility, GenericParam, TypeKind};
use pretty_assertions::assert_eq;

fn ty(text: &str) -> TypeRef {
    match TypeRef::parse(text) {
        Ok(ty) => ty,
        Err(err) => panic!("bad type `{text}`: {err}"),
    }
}

fn snapshot(decls: Vec<TypeDecl>) -> MetadataSnapshot {
    MetadataSnapshot::from_decls(decls).unwrap()
}

#[test]
fn test_binds_type_params() {
    let boxed = TypeDecl::object("Demo.Box")
        .with_type_param(GenericParam::new("T"))
        .with_property(PropertyDecl::new("Value", ty("T")))
        .with_field(FieldDecl::new("Items", ty("System.Collections.Generic.List<T>")));
    let snap = snapshot(vec![boxed]);

    let decl = snap.get("Demo.Box");
    assert_eq!(
        decl.map(|d| d.properties[0].ty.clone()),
        Some(TypeRef::param("T"))
    );
    assert_eq!(
        decl.map(|d| d.fields[0].ty.generic_args().to_vec()),
        Some(vec![TypeRef::param("T")])
    );
}

#[test]
fn test_duplicate_type_rejected() {
    let result = MetadataSnapshot::from_decls(vec![
        TypeDecl::object("Demo.Widget"),
        TypeDecl::object("Demo.Widget"),
    ]);
    assert_eq!(
        result.err(),
        Some(SnapshotError::DuplicateType("Demo.Widget".to_string()))
    );
}

#[test]
fn test_unknown_containing_type_rejected() {
    let result =
        MetadataSnapshot::from_decls(vec![TypeDecl::object("Demo.Outer.Inner").nested_in("Demo.Outer")]);
    assert!(matches!(
        result,
        Err(SnapshotError::UnknownContainingType { .. })
    ));
}

#[test]
fn test_cyclic_base_rejected() {
    let result = MetadataSnapshot::from_decls(vec![
        TypeDecl::object("Demo.A").with_base(ty("Demo.B")),
        TypeDecl::object("Demo.B").with_base(ty("Demo.A")),
    ]);
    assert!(matches!(result, Err(SnapshotError::CyclicBase(_))));
}

#[test]
fn test_namespace_derivation() {
    let snap = snapshot(vec![
        TypeDecl::object("Demo.Models.Outer"),
        TypeDecl::object("Demo.Models.Outer.Inner").nested_in("Demo.Models.Outer"),
        TypeDecl::object("Global"),
    ]);
    assert_eq!(
        snap.get("Demo.Models.Outer.Inner").and_then(|d| d.namespace.clone()),
        Some("Demo.Models".to_string())
    );
    assert_eq!(
        snap.get("Demo.Models.Outer.Inner").map(TypeDecl::relative_name),
        Some("Outer.Inner")
    );
    assert_eq!(snap.get("Global").and_then(|d| d.namespace.clone()), None);
}

#[test]
fn test_members_include_inherited_with_substitution() {
    let snap = snapshot(vec![
        TypeDecl::object("Demo.Base")
            .with_type_param(GenericParam::new("T"))
            .with_property(PropertyDecl::new("Payload", ty("T"))),
        TypeDecl::object("Demo.Derived")
            .with_base(ty("Demo.Base<Demo.Widget>"))
            .with_property(PropertyDecl::new("Id", ty("int"))),
    ]);

    let members = snap.members(&ty("Demo.Derived"));
    let props: Vec<(String, String)> = members
        .properties
        .iter()
        .map(|p| (p.name.clone(), p.ty.to_string()))
        .collect();
    assert_eq!(
        props,
        vec![
            ("Id".to_string(), "int".to_string()),
            ("Payload".to_string(), "Demo.Widget".to_string()),
        ]
    );
}

#[test]
fn test_constructors_substituted() {
    let snap = snapshot(vec![TypeDecl::object("Demo.Box")
        .with_type_param(GenericParam::new("T"))
        .with_constructor(ConstructorDecl::new(vec![ParamDecl::new("value", ty("T"))]))]);

    let ctors = snap.constructors(&ty("Demo.Box<int>"));
    assert_eq!(ctors.len(), 1);
    assert_eq!(ctors[0].params[0].ty, ty("int"));
}

#[test]
fn test_implicit_class_constructor() {
    let snap = snapshot(vec![
        TypeDecl::object("Demo.Plain"),
        TypeDecl::new("Demo.Point", TypeKind::Struct),
        TypeDecl::object("Demo.Shape").abstract_class(),
    ]);

    let ctors = snap.constructors(&ty("Demo.Plain"));
    assert_eq!(ctors, vec![ConstructorDecl::new(Vec::new())]);
    assert!(snap.constructors(&ty("Demo.Point")).is_empty());
    assert!(snap.constructors(&ty("Demo.Shape")).is_empty());
}

#[test]
fn test_interfaces_through_base() {
    let snap = snapshot(vec![
        TypeDecl::new("Demo.IShape", TypeKind::Interface),
        TypeDecl::object("Demo.ShapeBase")
            .abstract_class()
            .with_interface(ty("Demo.IShape")),
        TypeDecl::object("Demo.Circle").with_base(ty("Demo.ShapeBase")),
    ]);
    let circle = ty("Demo.Circle");
    assert!(snap.implements_interface(&circle, "Demo.IShape"));
    assert!(snap.is_subtype_of(&circle, &ty("Demo.ShapeBase")));
    assert!(snap.is_subtype_of(&circle, &circle));
    assert!(!snap.is_subtype_of(&ty("Demo.ShapeBase"), &circle));
}

#[test]
fn test_accessibility_follows_containing_types() {
    let snap = snapshot(vec![
        TypeDecl::object("Demo.Outer").with_accessibility(Accessibility::Private),
        TypeDecl::object("Demo.Outer.Inner").nested_in("Demo.Outer"),
        TypeDecl::object("Demo.Open").with_accessibility(Accessibility::Internal),
    ]);
    assert_eq!(
        snap.accessibility(&ty("Demo.Outer.Inner")),
        Accessibility::Private
    );
    assert_eq!(snap.accessibility(&ty("Demo.Open")), Accessibility::Internal);
}

#[test]
fn test_resolve_type_binds_definition() {
    let snap = snapshot(vec![TypeDecl::object("Demo.Box").with_type_param(GenericParam::new("T"))]);

    let resolved = snap.resolve_type("Demo.Box<T>").ok();
    assert_eq!(
        resolved.clone(),
        Some(TypeRef::generic("Demo.Box", vec![TypeRef::param("T")]))
    );
    assert!(resolved.is_some_and(|r| snap.is_definition(&r)));

    let closed = snap.resolve_type("Demo.Box<int>").ok();
    assert!(closed.is_some_and(|r| !snap.is_definition(&r)));
}

#[test]
fn test_declares_method_is_own_only() {
    let snap = snapshot(vec![
        TypeDecl::object("Demo.Base").with_method("OnBeforeSerialize"),
        TypeDecl::object("Demo.Derived").with_base(ty("Demo.Base")),
    ]);
    assert!(snap.declares_method(&ty("Demo.Base"), "OnBeforeSerialize"));
    assert!(!snap.declares_method(&ty("Demo.Derived"), "OnBeforeSerialize"));
}
