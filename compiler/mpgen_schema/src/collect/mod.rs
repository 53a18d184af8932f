//! The schema closure engine.
//!
//! Starting from the roots, every reachable type is classified once and
//! handed to the matching resolver. Resolvers return the types they
//! discovered as edges, which re-enter [`Closure::visit`].
//!
//! # Design
//!
//! - Visited set keyed by `TypeIdentity`: a type is dispatched at most once,
//!   so cyclic graphs terminate
//! - One classification step (`Shape`) decides the resolver up front
//! - Results go straight into a per-invocation `SchemaModel` whose maps are
//!   ordered by identity, so discovery order never leaks into the output
//! - The first fatal error aborts the invocation and drops the partial model

mod ctor;
mod generic;
mod naming;
mod object;
mod union;

use mpgen_ir::{Attribute, TypeDecl, TypeDescriptor, TypeIdentity, TypeKind, TypeRef};
use mpgen_stack::{ensure_sufficient_stack, DepthTracker};
use rustc_hash::FxHashSet;

use crate::error::ShapeReason;
use crate::{
    policy, CancellationFlag, CollectError, CollectorOptions, EnumSchema, ObjectSchema, Policy,
    SchemaModel,
};

/// Default underlying type of an enum whose metadata omits it.
const DEFAULT_ENUM_UNDERLYING: &str = "int";

/// One closure invocation over a type descriptor.
///
/// Each call to [`Collector::collect`] builds its own visited set and model,
/// so independent root sets can run on separate threads against the same
/// descriptor.
pub struct Collector<'a, D: TypeDescriptor> {
    descriptor: &'a D,
    options: &'a CollectorOptions,
    cancel: Option<CancellationFlag>,
}

impl<'a, D: TypeDescriptor> Collector<'a, D> {
    pub fn new(descriptor: &'a D, options: &'a CollectorOptions) -> Self {
        Collector {
            descriptor,
            options,
            cancel: None,
        }
    }

    /// Abort with [`CollectError::Cancelled`] once `flag` is raised.
    #[must_use]
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Compute the closure of `roots`.
    ///
    /// Every root must be an accessible serializable object, union base, or
    /// enum.
    #[tracing::instrument(level = "debug", skip_all, fields(roots = roots.len()))]
    pub fn collect(&self, roots: &[TypeRef]) -> Result<SchemaModel, CollectError> {
        let depth = DepthTracker::new();
        let mut closure = Closure {
            descriptor: self.descriptor,
            policy: Policy::new(self.options),
            cancel: self.cancel.as_ref(),
            depth: &depth,
            visited: FxHashSet::default(),
            model: SchemaModel::default(),
        };

        let roots: Vec<TypeRef> = roots.iter().map(TypeRef::normalize_tuples).collect();
        for root in &roots {
            closure.check_root(root)?;
        }
        for root in &roots {
            closure.visit(root)?;
        }

        tracing::debug!(
            visited = closure.visited.len(),
            entries = closure.model.len(),
            max_depth = depth.max_depth(),
            "closure complete"
        );
        Ok(closure.model)
    }
}

/// Compute the closure of `roots` without cancellation support.
pub fn collect<D: TypeDescriptor>(
    descriptor: &D,
    options: &CollectorOptions,
    roots: &[TypeRef],
) -> Result<SchemaModel, CollectError> {
    Collector::new(descriptor, options).collect(roots)
}

/// Resolve the object layout and constructor of `ty` on its own, without
/// visiting the types its members reference.
pub fn resolve_object<D: TypeDescriptor>(
    descriptor: &D,
    options: &CollectorOptions,
    ty: &TypeRef,
) -> Result<ObjectSchema, CollectError> {
    let ty = ty.normalize_tuples();
    let identity = ty.identity();
    let decl = descriptor
        .declaration(&ty)
        .ok_or_else(|| CollectError::shape(&identity, ShapeReason::Unresolved))?;
    object::resolve(descriptor, Policy::new(options), &ty, &identity, decl).map(|r| r.schema)
}

/// A type discovered by a resolver, and the member that reached it.
pub(crate) struct Edge {
    pub member: Option<String>,
    pub ty: TypeRef,
}

impl Edge {
    pub fn member(name: &str, ty: &TypeRef) -> Self {
        Edge {
            member: Some(name.to_string()),
            ty: ty.clone(),
        }
    }

    pub fn ty(ty: &TypeRef) -> Self {
        Edge {
            member: None,
            ty: ty.clone(),
        }
    }
}

/// A resolved schema plus the edges still to visit.
pub(crate) struct Resolved<T> {
    pub schema: T,
    pub edges: Vec<Edge>,
}

/// How a type is handled, decided once per type.
enum Shape<'d> {
    /// Served by a codec outside the closure.
    Skip,
    Array,
    Nullable,
    Container(&'static str),
    Enum(&'d TypeDecl),
    GenericDefinition(&'d TypeDecl),
    GenericInstance(&'d TypeDecl),
    Union(&'d TypeDecl),
    Object(&'d TypeDecl),
}

/// Working state of one invocation.
struct Closure<'a, D: TypeDescriptor> {
    descriptor: &'a D,
    policy: Policy<'a>,
    cancel: Option<&'a CancellationFlag>,
    depth: &'a DepthTracker,
    visited: FxHashSet<TypeIdentity>,
    model: SchemaModel,
}

impl<'a, D: TypeDescriptor> Closure<'a, D> {
    fn check_root(&self, root: &TypeRef) -> Result<(), CollectError> {
        let identity = root.identity();
        let Some(decl) = self.descriptor.declaration(root) else {
            return Err(CollectError::shape(&identity, ShapeReason::Unresolved));
        };
        let access = self.descriptor.accessibility(root);
        if !access.is_visible_to_codecs() {
            return Err(CollectError::shape(
                &identity,
                ShapeReason::Inaccessible(access),
            ));
        }

        if decl.is_polymorphic_base() {
            return if Attribute::unions(&decl.attributes).next().is_some() {
                Ok(())
            } else {
                Err(CollectError::MissingUnionDeclaration { identity })
            };
        }
        let eligible = match decl.kind {
            TypeKind::Class | TypeKind::Struct => Attribute::find_object(&decl.attributes).is_some(),
            TypeKind::Enum => true,
            TypeKind::Interface => false,
        };
        if eligible {
            Ok(())
        } else {
            Err(CollectError::shape(&identity, ShapeReason::IneligibleRoot))
        }
    }

    /// Visit `ty` unless it was already visited.
    fn visit(&mut self, ty: &TypeRef) -> Result<(), CollectError> {
        let ty = ty.normalize_tuples();
        let identity = ty.identity();
        if !self.visited.insert(identity.clone()) {
            return Ok(());
        }
        if self.cancel.is_some_and(CancellationFlag::is_cancelled) {
            tracing::debug!(ty = %identity, "collection cancelled");
            return Err(CollectError::Cancelled);
        }

        let depth = self.depth;
        let _level = depth.enter();
        ensure_sufficient_stack(|| self.dispatch(&ty, &identity))
    }

    fn visit_edges(&mut self, edges: Vec<Edge>) -> Result<(), CollectError> {
        for edge in edges {
            match edge.member {
                Some(member) => self
                    .visit(&edge.ty)
                    .map_err(|err| err.via_member(&member))?,
                None => self.visit(&edge.ty)?,
            }
        }
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip_all, fields(ty = %identity))]
    fn dispatch(&mut self, ty: &TypeRef, identity: &TypeIdentity) -> Result<(), CollectError> {
        match self.classify(ty, identity)? {
            Shape::Skip => Ok(()),
            Shape::Array => self.collect_array(ty, identity),
            Shape::Nullable => self.collect_nullable(ty, identity),
            Shape::Container(template) => self.collect_container(ty, identity, template),
            Shape::Enum(decl) => {
                self.collect_enum(ty, identity, decl);
                Ok(())
            }
            Shape::GenericDefinition(decl) => self.collect_generic_definition(ty, identity, decl),
            Shape::GenericInstance(decl) => self.collect_generic_instance(ty, identity, decl),
            Shape::Union(decl) => self.collect_union(ty, identity, decl),
            Shape::Object(decl) => self.collect_object(ty, identity, decl),
        }
    }

    fn classify(&self, ty: &TypeRef, identity: &TypeIdentity) -> Result<Shape<'a>, CollectError> {
        let signature = identity.as_str();
        if self.policy.is_terminal(signature) {
            return Ok(Shape::Skip);
        }
        if ty.array_parts().is_some() {
            return Ok(Shape::Array);
        }
        if self.policy.custom_codec(signature).is_some() || ty.is_param() {
            return Ok(Shape::Skip);
        }
        if ty.is_nullable() {
            return Ok(Shape::Nullable);
        }

        let descriptor: &'a D = self.descriptor;
        let decl = descriptor.declaration(ty);
        if ty.is_generic() {
            if let Some(template) = policy::known_container(&ty.unbound_signature()) {
                if decl.is_some_and(|d| Attribute::unions(&d.attributes).next().is_some()) {
                    return Err(CollectError::shape(
                        identity,
                        ShapeReason::ContainerUnionCollision,
                    ));
                }
                return Ok(Shape::Container(template));
            }
        }

        let Some(decl) = decl else {
            return Err(CollectError::shape(identity, ShapeReason::Unresolved));
        };
        if Attribute::find_custom_formatter(&decl.attributes).is_some() {
            return Ok(Shape::Skip);
        }
        let access = descriptor.accessibility(ty);
        if !access.is_visible_to_codecs() {
            return Err(CollectError::shape(
                identity,
                ShapeReason::Inaccessible(access),
            ));
        }

        if decl.kind == TypeKind::Enum {
            return Ok(Shape::Enum(decl));
        }
        if decl.is_polymorphic_base()
            && !decl.external
            && Attribute::unions(&decl.attributes).next().is_none()
        {
            return Err(CollectError::shape(
                identity,
                ShapeReason::UnmarkedPolymorphic,
            ));
        }
        if decl.is_generic() {
            return Ok(if descriptor.is_definition(ty) {
                Shape::GenericDefinition(decl)
            } else {
                Shape::GenericInstance(decl)
            });
        }
        if decl.external {
            return Ok(Shape::Skip);
        }
        if decl.is_polymorphic_base() {
            return Ok(Shape::Union(decl));
        }
        Ok(Shape::Object(decl))
    }

    fn collect_enum(&mut self, ty: &TypeRef, identity: &TypeIdentity, decl: &TypeDecl) {
        let underlying = self
            .descriptor
            .enum_underlying_type(ty)
            .unwrap_or(DEFAULT_ENUM_UNDERLYING);
        self.model.insert_enum(EnumSchema {
            identity: identity.clone(),
            underlying_integer_type: underlying.to_string(),
            codec_name: naming::codec_name(decl),
            namespace: decl.namespace.clone(),
        });
    }

    fn collect_object(
        &mut self,
        ty: &TypeRef,
        identity: &TypeIdentity,
        decl: &TypeDecl,
    ) -> Result<(), CollectError> {
        let Resolved { schema, edges } =
            object::resolve(self.descriptor, self.policy, ty, identity, decl)?;
        tracing::trace!(
            members = schema.members.len(),
            key_mode = ?schema.key_mode,
            "object resolved"
        );
        self.model.insert_object(schema);
        self.visit_edges(edges)
    }

    fn collect_union(
        &mut self,
        ty: &TypeRef,
        identity: &TypeIdentity,
        decl: &TypeDecl,
    ) -> Result<(), CollectError> {
        let Resolved { schema, edges } = union::resolve(self.descriptor, ty, identity, decl)?;
        tracing::trace!(subtypes = schema.subtypes.len(), "union resolved");
        self.model.insert_union(schema);
        self.visit_edges(edges)
    }
}
