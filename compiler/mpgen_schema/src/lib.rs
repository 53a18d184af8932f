//! mpgen Schema - closure and binding resolution for generated codecs.
//!
//! Given root types annotated for binary serialization, this crate computes
//! every type a generated resolver must handle, classifies each one, binds
//! the constructor used on decode, and assigns member keys.
//!
//! # Main Entry Points
//!
//! - [`Collector`]: one closure invocation over a `TypeDescriptor`
//! - [`collect`]: convenience wrapper without cancellation
//! - [`SchemaModel`]: the identity-ordered result handed to an emitter
//!
//! # Module Organization
//!
//! - `collect`: the closure engine and its object, union, and generic
//!   resolvers
//! - `policy`: leaf types and the known container catalog
//! - `model`: schema records
//! - `error`: fatal errors and their diagnostics

mod cancel;
pub mod collect;
mod error;
pub mod model;
mod options;
pub mod policy;

pub use cancel::CancellationFlag;
pub use collect::{collect, resolve_object, Collector};
pub use error::{CollectError, ConstructorFailure, ParamMismatch, ShapeReason};
pub use model::{
    EnumSchema, GenericParamSchema, GenericSchema, KeyMode, LifecycleHooks, MemberKey, MemberRef,
    MemberSchema, ObjectSchema, SchemaModel, StorageKind, UnionCase, UnionSchema,
};
pub use options::CollectorOptions;
pub use policy::Policy;
