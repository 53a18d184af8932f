//! Object binding: member layout, wire keys, and the decode constructor.

use mpgen_diagnostic::{Diagnostic, ErrorCode, Subject};
use mpgen_ir::{Attribute, KeyValue, Members, TypeDecl, TypeDescriptor, TypeIdentity, TypeRef};
use rustc_hash::FxHashMap;

use super::{ctor, naming, Edge, Resolved};
use crate::{
    CollectError, GenericParamSchema, KeyMode, LifecycleHooks, MemberKey, MemberSchema,
    ObjectSchema, Policy, StorageKind,
};

/// Interface whose implementors receive encode and decode callbacks.
const CALLBACK_RECEIVER: &str = "MessagePack.IMessagePackSerializationCallbackReceiver";
const BEFORE_ENCODE: &str = "OnBeforeSerialize";
const AFTER_DECODE: &str = "OnAfterDeserialize";

/// Resolve the member layout, constructor, and callbacks of an object.
pub(super) fn resolve<D: TypeDescriptor>(
    descriptor: &D,
    policy: Policy<'_>,
    ty: &TypeRef,
    identity: &TypeIdentity,
    decl: &TypeDecl,
) -> Result<Resolved<ObjectSchema>, CollectError> {
    let layout = discover_members(descriptor, policy, ty, identity, decl)?;
    let is_reference_type = decl.kind.is_reference_type();

    let constructors = descriptor.constructors(ty);
    let constructor_binding = ctor::bind(
        &constructors,
        &layout.members,
        layout.key_mode,
        is_reference_type,
    )
    .map_err(|reason| CollectError::NoViableConstructor {
        identity: identity.clone(),
        reason,
    })?;

    let generic_parameters = decl
        .type_params
        .iter()
        .map(|param| GenericParamSchema {
            name: param.name.clone(),
            constraints: param.constraint_list(),
        })
        .collect();

    let schema = ObjectSchema {
        identity: identity.clone(),
        is_reference_type,
        is_open_generic: decl.is_generic(),
        generic_parameters,
        constructor_binding,
        key_mode: layout.key_mode,
        members: layout.members,
        lifecycle_hooks: lifecycle_hooks(descriptor, ty),
        codec_name: naming::codec_name(decl),
        namespace: decl.namespace.clone(),
        diagnostics: layout.diagnostics,
    };
    Ok(Resolved {
        schema,
        edges: layout.edges,
    })
}

fn lifecycle_hooks<D: TypeDescriptor>(descriptor: &D, ty: &TypeRef) -> LifecycleHooks {
    if !descriptor.implements_interface(ty, CALLBACK_RECEIVER) {
        return LifecycleHooks::default();
    }
    LifecycleHooks {
        has_before_encode: true,
        has_after_decode: true,
        before_encode_via_interface: !descriptor.declares_method(ty, BEFORE_ENCODE),
        after_decode_via_interface: !descriptor.declares_method(ty, AFTER_DECODE),
    }
}

/// Members with assigned keys, ordered for the wire.
pub(super) struct MemberLayout {
    pub key_mode: KeyMode,
    pub members: Vec<MemberSchema>,
    pub edges: Vec<Edge>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Discover serialized members and assign their keys.
///
/// Map mode (forced, or requested by the type) keys every eligible member by
/// name. Otherwise only members with a key attribute take part, and the
/// first key decides between integer and string keys.
pub(super) fn discover_members<D: TypeDescriptor>(
    descriptor: &D,
    policy: Policy<'_>,
    ty: &TypeRef,
    identity: &TypeIdentity,
    decl: &TypeDecl,
) -> Result<MemberLayout, CollectError> {
    let object_attr = Attribute::find_object(&decl.attributes);
    let members = descriptor.members(ty);
    let mut layout = LayoutBuilder::new(identity);

    if object_attr.is_none() {
        layout.diagnostics.push(
            Diagnostic::error(ErrorCode::M2005)
                .with_message(format!(
                    "`{identity}` is serialized but not marked as a serializable object"
                ))
                .with_label(Subject::ty(identity.as_str()), "missing object attribute")
                .with_suggestion("mark the type with the serializable-object attribute"),
        );
    }

    let names_as_keys = object_attr == Some(true);
    if policy.force_map_mode() || names_as_keys {
        layout.key_mode = Some(KeyMode::String);
        for candidate in candidates(&members, true) {
            if names_as_keys && Attribute::find_key(candidate.attributes).is_some() {
                layout.diagnostics.push(
                    Diagnostic::warning(ErrorCode::W1001)
                        .with_message(format!(
                            "key on `{}` is ignored because `{identity}` keys members by name",
                            candidate.name
                        ))
                        .with_label(
                            Subject::member(identity.as_str(), candidate.name),
                            "key attribute ignored",
                        ),
                );
            }
            layout.push_string(&candidate, candidate.name);
        }
    } else {
        for candidate in candidates(&members, false) {
            match Attribute::find_key(candidate.attributes) {
                None if object_attr.is_some() => {
                    layout.diagnostics.push(
                        Diagnostic::error(ErrorCode::M2003)
                            .with_message(format!(
                                "member `{}` of `{identity}` has no key",
                                candidate.name
                            ))
                            .with_label(
                                Subject::member(identity.as_str(), candidate.name),
                                "not serialized",
                            )
                            .with_suggestion("add a key attribute or an ignore attribute"),
                    );
                }
                None => {}
                Some(KeyValue::Null) => {
                    layout.diagnostics.push(
                        Diagnostic::error(ErrorCode::M2004)
                            .with_message(format!(
                                "key of `{}` on `{identity}` is neither an integer nor a string",
                                candidate.name
                            ))
                            .with_label(
                                Subject::member(identity.as_str(), candidate.name),
                                "null key",
                            ),
                    );
                }
                Some(KeyValue::Int(key)) => {
                    layout.fix_mode(&candidate, KeyMode::Int)?;
                    layout.push_int(&candidate, *key);
                }
                Some(KeyValue::Str(name)) => {
                    layout.fix_mode(&candidate, KeyMode::String)?;
                    layout.push_string(&candidate, name);
                }
            }
        }
    }

    Ok(layout.finish())
}

/// A field or property that passed the eligibility filters.
struct Candidate<'m> {
    storage_kind: StorageKind,
    name: &'m str,
    ty: &'m TypeRef,
    attributes: &'m [Attribute],
    is_readable: bool,
    is_writable: bool,
}

/// Instance members that can take part in serialization, properties first.
///
/// Indexers, compiler-generated fields, ignored members, and members that
/// are neither readable nor writable are dropped. In map mode overriding
/// properties are dropped as well; the base declaration represents them.
fn candidates(members: &Members, map_mode: bool) -> Vec<Candidate<'_>> {
    let properties = members
        .properties
        .iter()
        .filter(|p| !p.is_indexer && !(map_mode && p.is_override))
        .map(|p| Candidate {
            storage_kind: StorageKind::Property,
            name: &p.name,
            ty: &p.ty,
            attributes: &p.attributes,
            is_readable: p.is_readable(),
            is_writable: p.is_writable(),
        });
    let fields = members
        .fields
        .iter()
        .filter(|f| !f.is_compiler_generated)
        .map(|f| Candidate {
            storage_kind: StorageKind::Field,
            name: &f.name,
            ty: &f.ty,
            attributes: &f.attributes,
            is_readable: f.is_readable(),
            is_writable: f.is_writable(),
        });

    properties
        .chain(fields)
        .filter(|c| !Attribute::is_ignored(c.attributes))
        .filter(|c| c.is_readable || c.is_writable)
        .collect()
}

struct LayoutBuilder<'i> {
    identity: &'i TypeIdentity,
    key_mode: Option<KeyMode>,
    /// Key to the index of the member that claimed it.
    int_keys: FxHashMap<i32, usize>,
    string_keys: FxHashMap<String, usize>,
    next_ordinal: u32,
    members: Vec<MemberSchema>,
    edges: Vec<Edge>,
    diagnostics: Vec<Diagnostic>,
}

impl<'i> LayoutBuilder<'i> {
    fn new(identity: &'i TypeIdentity) -> Self {
        LayoutBuilder {
            identity,
            key_mode: None,
            int_keys: FxHashMap::default(),
            string_keys: FxHashMap::default(),
            next_ordinal: 0,
            members: Vec::new(),
            edges: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// The first keyed member fixes the key kind of the whole type.
    fn fix_mode(&mut self, candidate: &Candidate<'_>, mode: KeyMode) -> Result<(), CollectError> {
        match self.key_mode {
            None => {
                self.key_mode = Some(mode);
                Ok(())
            }
            Some(expected) if expected == mode => Ok(()),
            Some(expected) => Err(CollectError::MixedKeyMode {
                identity: self.identity.clone(),
                member: candidate.name.to_string(),
                expected,
            }),
        }
    }

    fn push_int(&mut self, candidate: &Candidate<'_>, key: i32) {
        if let Some(&first) = self.int_keys.get(&key) {
            self.duplicate(candidate, first, &key.to_string());
            return;
        }
        self.int_keys.insert(key, self.members.len());
        self.push(candidate, MemberKey::Int(key));
    }

    fn push_string(&mut self, candidate: &Candidate<'_>, name: &str) {
        if let Some(&first) = self.string_keys.get(name) {
            self.duplicate(candidate, first, &format!("\"{name}\""));
            return;
        }
        self.string_keys.insert(name.to_string(), self.members.len());
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        self.push(
            candidate,
            MemberKey::String {
                ordinal,
                name: name.to_string(),
            },
        );
    }

    fn push(&mut self, candidate: &Candidate<'_>, key: MemberKey) {
        let override_codec =
            Attribute::find_custom_formatter(candidate.attributes).map(str::to_string);
        if override_codec.is_none() {
            self.edges.push(Edge::member(candidate.name, candidate.ty));
        }
        self.members.push(MemberSchema {
            storage_kind: candidate.storage_kind,
            is_readable: candidate.is_readable,
            is_writable: candidate.is_writable,
            key,
            source_name: candidate.name.to_string(),
            declared_type: candidate.ty.clone(),
            override_codec,
        });
    }

    /// Report a key claimed twice. The first member keeps the key.
    fn duplicate(&mut self, candidate: &Candidate<'_>, first: usize, key: &str) {
        let first_name = self
            .members
            .get(first)
            .map_or("", |m| m.source_name.as_str());
        let identity = self.identity.as_str();
        let diag = Diagnostic::error(ErrorCode::M2002)
            .with_message(format!(
                "key {key} of `{identity}` is used by both `{first_name}` and `{}`",
                candidate.name
            ))
            .with_label(
                Subject::member(identity, candidate.name),
                format!("key {key} already used"),
            )
            .with_secondary_label(Subject::member(identity, first_name), "first used here")
            .with_suggestion("give every member a unique key");
        self.diagnostics.push(diag);
    }

    fn finish(mut self) -> MemberLayout {
        let key_mode = self.key_mode.unwrap_or_default();
        if key_mode == KeyMode::Int {
            self.members.sort_by_key(|m| m.key.as_int());
        }
        MemberLayout {
            key_mode,
            members: self.members,
            edges: self.edges,
            diagnostics: self.diagnostics,
        }
    }
}
