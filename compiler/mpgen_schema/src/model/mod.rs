//! Schema model records.
//!
//! The engine produces four collections, each keyed and ordered by
//! `TypeIdentity`:
//! - `ObjectSchema`: composite types with member layout and constructor
//! - `EnumSchema`: enumerations
//! - `GenericSchema`: arrays, containers, and user generic instantiations
//! - `UnionSchema`: polymorphic bases with their tagged subtypes
//!
//! Ordering by identity rather than discovery order makes the model
//! identical across runs over the same metadata.

use std::collections::BTreeMap;
use std::fmt;

use mpgen_diagnostic::Diagnostic;
use mpgen_ir::{TypeIdentity, TypeRef};

/// How members of one object are keyed on the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum KeyMode {
    /// Array layout, members addressed by integer key.
    #[default]
    Int,
    /// Map layout, members addressed by string key.
    String,
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Int => f.write_str("integer"),
            KeyMode::String => f.write_str("string"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum StorageKind {
    Field,
    Property,
}

/// The wire key of one member.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum MemberKey {
    Int(i32),
    /// String key plus the hidden ordinal that fixes member order.
    String { ordinal: u32, name: String },
}

impl MemberKey {
    pub fn mode(&self) -> KeyMode {
        match self {
            MemberKey::Int(_) => KeyMode::Int,
            MemberKey::String { .. } => KeyMode::String,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            MemberKey::Int(key) => Some(*key),
            MemberKey::String { .. } => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MemberKey::Int(_) => None,
            MemberKey::String { name, .. } => Some(name),
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKey::Int(key) => write!(f, "{key}"),
            MemberKey::String { name, .. } => write!(f, "\"{name}\""),
        }
    }
}

/// One serialized field or property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MemberSchema {
    pub storage_kind: StorageKind,
    pub is_readable: bool,
    pub is_writable: bool,
    pub key: MemberKey,
    /// Member name in the source type.
    pub source_name: String,
    pub declared_type: TypeRef,
    /// Hand-written codec applied to this member only.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub override_codec: Option<String>,
}

/// Index into `ObjectSchema::members`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct MemberRef(pub usize);

/// Decode and encode callbacks an object opts into.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LifecycleHooks {
    pub has_before_encode: bool,
    pub has_after_decode: bool,
    /// The before-encode callback is only reachable through the interface.
    pub before_encode_via_interface: bool,
    /// The after-decode callback is only reachable through the interface.
    pub after_decode_via_interface: bool,
}

/// A generic parameter of an open object and its rendered constraints.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GenericParamSchema {
    pub name: String,
    pub constraints: Vec<String>,
}

/// Member layout and reconstruction strategy of a composite type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ObjectSchema {
    pub identity: TypeIdentity,
    pub is_reference_type: bool,
    pub is_open_generic: bool,
    pub generic_parameters: Vec<GenericParamSchema>,
    /// Members passed to the decode constructor, in parameter order.
    /// `None` when the value is default-constructed.
    pub constructor_binding: Option<Vec<MemberRef>>,
    pub key_mode: KeyMode,
    /// Ordered by integer key, or by hidden ordinal in string mode.
    pub members: Vec<MemberSchema>,
    pub lifecycle_hooks: LifecycleHooks,
    /// Name of the generated codec type.
    pub codec_name: String,
    pub namespace: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ObjectSchema {
    /// Look up a member by source name.
    pub fn member(&self, source_name: &str) -> Option<&MemberSchema> {
        self.members.iter().find(|m| m.source_name == source_name)
    }

    /// Members bound to constructor parameters, in parameter order.
    pub fn constructor_members(&self) -> impl Iterator<Item = &MemberSchema> {
        self.constructor_binding
            .iter()
            .flatten()
            .filter_map(|MemberRef(index)| self.members.get(*index))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumSchema {
    pub identity: TypeIdentity,
    pub underlying_integer_type: String,
    pub codec_name: String,
    pub namespace: Option<String>,
}

/// An array, container, or user generic type served by a parameterized codec.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GenericSchema {
    pub instantiation_identity: TypeIdentity,
    pub codec_expression: String,
    pub is_open_generic: bool,
}

/// One tagged subtype of a union.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnionCase {
    pub discriminator: i32,
    pub subtype: TypeIdentity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnionSchema {
    pub identity: TypeIdentity,
    /// Ordered by discriminator.
    pub subtypes: Vec<UnionCase>,
    pub codec_name: String,
    pub namespace: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything one closure invocation resolved.
///
/// Read-only once returned by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SchemaModel {
    objects: BTreeMap<TypeIdentity, ObjectSchema>,
    enums: BTreeMap<TypeIdentity, EnumSchema>,
    generics: BTreeMap<TypeIdentity, GenericSchema>,
    unions: BTreeMap<TypeIdentity, UnionSchema>,
}

impl SchemaModel {
    pub fn objects(&self) -> impl Iterator<Item = &ObjectSchema> {
        self.objects.values()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumSchema> {
        self.enums.values()
    }

    pub fn generics(&self) -> impl Iterator<Item = &GenericSchema> {
        self.generics.values()
    }

    pub fn unions(&self) -> impl Iterator<Item = &UnionSchema> {
        self.unions.values()
    }

    pub fn object(&self, identity: &str) -> Option<&ObjectSchema> {
        self.objects.get(identity)
    }

    pub fn enumeration(&self, identity: &str) -> Option<&EnumSchema> {
        self.enums.get(identity)
    }

    pub fn generic(&self, identity: &str) -> Option<&GenericSchema> {
        self.generics.get(identity)
    }

    pub fn union(&self, identity: &str) -> Option<&UnionSchema> {
        self.unions.get(identity)
    }

    /// All attached diagnostics, ordered by the identity they belong to.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        let mut owned: Vec<(&TypeIdentity, &Diagnostic)> = self
            .objects
            .values()
            .flat_map(|o| o.diagnostics.iter().map(move |d| (&o.identity, d)))
            .chain(
                self.unions
                    .values()
                    .flat_map(|u| u.diagnostics.iter().map(move |d| (&u.identity, d))),
            )
            .collect();
        owned.sort_by(|a, b| a.0.cmp(b.0));
        owned.into_iter().map(|(_, d)| d).collect()
    }

    /// Check if any attached diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics().iter().any(|d| d.is_error())
    }

    /// Total number of schema entries.
    pub fn len(&self) -> usize {
        self.objects.len() + self.enums.len() + self.generics.len() + self.unions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fold the model of another root set into this one.
    ///
    /// Entries present in both are resolved from the same metadata, so the
    /// existing entry is kept.
    pub fn merge(&mut self, other: SchemaModel) {
        for (identity, schema) in other.objects {
            self.objects.entry(identity).or_insert(schema);
        }
        for (identity, schema) in other.enums {
            self.enums.entry(identity).or_insert(schema);
        }
        for (identity, schema) in other.generics {
            self.generics.entry(identity).or_insert(schema);
        }
        for (identity, schema) in other.unions {
            self.unions.entry(identity).or_insert(schema);
        }
    }

    pub(crate) fn insert_object(&mut self, schema: ObjectSchema) {
        self.objects.insert(schema.identity.clone(), schema);
    }

    pub(crate) fn insert_enum(&mut self, schema: EnumSchema) {
        self.enums.insert(schema.identity.clone(), schema);
    }

    pub(crate) fn insert_generic(&mut self, schema: GenericSchema) {
        self.generics
            .entry(schema.instantiation_identity.clone())
            .or_insert(schema);
    }

    pub(crate) fn insert_union(&mut self, schema: UnionSchema) {
        self.unions.insert(schema.identity.clone(), schema);
    }
}

#[cfg(test)]
mod tests;
