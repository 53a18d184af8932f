//! mpgen IR - type references and host type metadata
//!
//! This crate is the boundary between the schema engine and the host's type
//! introspection:
//! - `TypeRef` / `TypeIdentity` for structural type expressions and their
//!   canonical keys
//! - Declaration records (`TypeDecl`, members, constructors, attributes)
//! - The `TypeDescriptor` query trait
//! - `MetadataSnapshot`, a frozen implementation of `TypeDescriptor`
//!
//! With the `serde` feature every record deserializes from the snapshot JSON
//! format, and type expressions round-trip through their rendered text.

mod decl;
mod descriptor;
mod snapshot;
mod type_ref;

pub use decl::{
    Accessibility, Attribute, ConstructorDecl, FieldDecl, GenericParam, KeyValue, ParamDecl,
    PropertyDecl, TypeDecl, TypeKind,
};
pub use descriptor::{Members, TypeDescriptor};
pub use snapshot::{MetadataSnapshot, SnapshotError};
pub use type_ref::{ParseTypeError, TypeIdentity, TypeRef, NULLABLE, VALUE_TUPLE};
