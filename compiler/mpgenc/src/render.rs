//! Schema model output.

use std::fmt::Write;

use mpgen_schema::{KeyMode, ObjectSchema, SchemaModel, StorageKind};

/// Human-readable listing, one section per schema kind.
pub fn render_text(model: &SchemaModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "objects:");
    for object in model.objects() {
        write_object(&mut out, object);
    }

    let _ = writeln!(out, "enums:");
    for schema in model.enums() {
        let _ = writeln!(
            out,
            "  {} : {} => {}",
            schema.identity, schema.underlying_integer_type, schema.codec_name
        );
    }

    let _ = writeln!(out, "generics:");
    for schema in model.generics() {
        let open = if schema.is_open_generic { " (open)" } else { "" };
        let _ = writeln!(
            out,
            "  {} => {}{open}",
            schema.instantiation_identity, schema.codec_expression
        );
    }

    let _ = writeln!(out, "unions:");
    for schema in model.unions() {
        let _ = writeln!(out, "  {} => {}", schema.identity, schema.codec_name);
        for case in &schema.subtypes {
            let _ = writeln!(out, "    {} : {}", case.discriminator, case.subtype);
        }
    }

    out
}

fn write_object(out: &mut String, object: &ObjectSchema) {
    let layout = match object.key_mode {
        KeyMode::Int => "array",
        KeyMode::String => "map",
    };
    let _ = write!(out, "  {} => {} [{layout}", object.identity, object.codec_name);
    if object.is_open_generic {
        let params: Vec<&str> = object
            .generic_parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let _ = write!(out, ", open over {}", params.join(", "));
    }
    let _ = writeln!(out, "]");

    for member in &object.members {
        let storage = match member.storage_kind {
            StorageKind::Field => "field",
            StorageKind::Property => "property",
        };
        let _ = write!(
            out,
            "    {} {} {}: {}",
            member.key, storage, member.source_name, member.declared_type
        );
        if let Some(codec) = &member.override_codec {
            let _ = write!(out, " via {codec}");
        }
        let _ = writeln!(out);
    }

    match &object.constructor_binding {
        Some(_) => {
            let params: Vec<&str> = object
                .constructor_members()
                .map(|m| m.source_name.as_str())
                .collect();
            let _ = writeln!(out, "    new({})", params.join(", "));
        }
        None => {
            let _ = writeln!(out, "    default value");
        }
    }

    let hooks = object.lifecycle_hooks;
    if hooks.has_before_encode || hooks.has_after_decode {
        let _ = writeln!(out, "    callbacks: before-encode, after-decode");
    }
}

/// The model as pretty-printed JSON.
pub fn render_json(model: &SchemaModel) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(model)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use mpgen_ir::{
        Attribute, ConstructorDecl, KeyValue, MetadataSnapshot, ParamDecl, PropertyDecl, TypeDecl,
        TypeRef,
    };
    use mpgen_schema::CollectorOptions;
    use pretty_assertions::assert_eq;

    fn ty(text: &str) -> TypeRef {
        TypeRef::parse(text).unwrap()
    }

    fn model() -> SchemaModel {
        let keyed = |name: &str, type_text: &str, key: i32| {
            PropertyDecl::new(name, ty(type_text)).with_attribute(Attribute::Key {
                value: KeyValue::Int(key),
            })
        };
        let snapshot = MetadataSnapshot::from_decls(vec![
            TypeDecl::object("Demo.Person")
                .with_property(keyed("Age", "int", 0))
                .with_property(keyed("Tags", "System.Collections.Generic.List<Demo.Tag>", 1))
                .with_constructor(ConstructorDecl::new(vec![
                    ParamDecl::new("age", ty("int")),
                    ParamDecl::new("tags", ty("System.Collections.Generic.List<Demo.Tag>")),
                ])),
            TypeDecl::enumeration("Demo.Tag", "byte"),
        ])
        .unwrap();
        mpgen_schema::collect(&snapshot, &CollectorOptions::default(), &[ty("Demo.Person")])
            .unwrap()
    }

    #[test]
    fn test_render_text() {
        let expected = "\
objects:
  Demo.Person => Person [array]
    0 property Age: int
    1 property Tags: System.Collections.Generic.List<Demo.Tag>
    new(Age, Tags)
enums:
  Demo.Tag : byte => Tag
generics:
  System.Collections.Generic.List<Demo.Tag> => MsgPack::Formatters.ListFormatter<Demo.Tag>
unions:
";
        assert_eq!(render_text(&model()), expected);
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&model()).unwrap()).unwrap();
        let person = &json["objects"]["Demo.Person"];
        assert_eq!(person["key_mode"], "int");
        assert_eq!(person["constructor_binding"], serde_json::json!([0, 1]));
        assert_eq!(person["members"][1]["declared_type"], "System.Collections.Generic.List<Demo.Tag>");
        assert_eq!(json["enums"]["Demo.Tag"]["underlying_integer_type"], "byte");
    }
}
