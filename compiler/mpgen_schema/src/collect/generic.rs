//! Arrays, nullable values, known containers, and user generic types.

use mpgen_ir::{TypeDecl, TypeDescriptor, TypeIdentity, TypeRef};

use super::{naming, object, Closure};
use crate::error::ShapeReason;
use crate::policy::{self, ENUMERABLE_SIGNATURE, GROUPING_SIGNATURE, LOOKUP_SIGNATURE};
use crate::{CollectError, GenericSchema};

impl<D: TypeDescriptor> Closure<'_, D> {
    /// Arrays pick a codec by rank. Element codecs are resolved on demand,
    /// so the element type is not visited.
    pub(super) fn collect_array(
        &mut self,
        ty: &TypeRef,
        identity: &TypeIdentity,
    ) -> Result<(), CollectError> {
        let Some((element, rank)) = ty.array_parts() else {
            return Ok(());
        };
        let template = policy::array_codec(rank)
            .ok_or_else(|| CollectError::shape(identity, ShapeReason::ArrayRank(rank)))?;
        self.model.insert_generic(GenericSchema {
            instantiation_identity: identity.clone(),
            codec_expression: policy::instantiate(template, element.identity().as_str()),
            is_open_generic: element.is_param(),
        });
        Ok(())
    }

    /// `T?` needs its own entry only when `T` is a value type that is not a
    /// leaf. On a class or interface the annotation is dropped and `T` is
    /// collected as itself.
    pub(super) fn collect_nullable(
        &mut self,
        ty: &TypeRef,
        identity: &TypeIdentity,
    ) -> Result<(), CollectError> {
        let Some(inner) = ty.generic_args().first() else {
            return Ok(());
        };
        self.visit(inner)?;

        let inner_identity = inner.identity();
        if policy::is_leaf(inner_identity.as_str()) {
            return Ok(());
        }
        if self
            .descriptor
            .declaration(inner)
            .is_some_and(|decl| decl.kind.is_reference_type())
        {
            return Ok(());
        }
        self.model.insert_generic(GenericSchema {
            instantiation_identity: identity.clone(),
            codec_expression: policy::instantiate(policy::NULLABLE_CODEC, inner_identity.as_str()),
            is_open_generic: ty.is_open(),
        });
        Ok(())
    }

    pub(super) fn collect_container(
        &mut self,
        ty: &TypeRef,
        identity: &TypeIdentity,
        template: &str,
    ) -> Result<(), CollectError> {
        for arg in ty.generic_args() {
            self.visit(arg)?;
        }

        self.model.insert_generic(GenericSchema {
            instantiation_identity: identity.clone(),
            codec_expression: policy::instantiate(template, &naming::render_args(ty.generic_args())),
            is_open_generic: ty.is_open(),
        });
        if ty.unbound_signature() == LOOKUP_SIGNATURE {
            self.insert_lookup_companions(ty);
        }
        Ok(())
    }

    /// A lookup codec decodes through the grouping and sequence codecs of
    /// its element type.
    fn insert_lookup_companions(&mut self, lookup: &TypeRef) {
        let args = lookup.generic_args();
        let Some(element) = args.get(1) else {
            return;
        };
        let companions = [
            (
                TypeRef::generic("System.Linq.IGrouping", args.to_vec()),
                GROUPING_SIGNATURE,
            ),
            (
                TypeRef::generic("System.Collections.Generic.IEnumerable", vec![element.clone()]),
                ENUMERABLE_SIGNATURE,
            ),
        ];
        for (companion, signature) in companions {
            let Some(template) = policy::known_container(signature) else {
                continue;
            };
            self.model.insert_generic(GenericSchema {
                instantiation_identity: companion.identity(),
                codec_expression: policy::instantiate(
                    template,
                    &naming::render_args(companion.generic_args()),
                ),
                is_open_generic: lookup.is_open(),
            });
        }
    }

    /// A generic definition is resolved like any union or object, and also
    /// gets the open codec that runtime type arguments are substituted into.
    pub(super) fn collect_generic_definition(
        &mut self,
        ty: &TypeRef,
        identity: &TypeIdentity,
        decl: &TypeDecl,
    ) -> Result<(), CollectError> {
        if decl.is_polymorphic_base() {
            self.collect_union(ty, identity, decl)?;
        } else {
            self.collect_object(ty, identity, decl)?;
        }
        self.model.insert_generic(GenericSchema {
            instantiation_identity: identity.clone(),
            codec_expression: naming::user_generic_codec(decl, ty.generic_args()),
            is_open_generic: true,
        });
        Ok(())
    }

    /// A closed instantiation reuses the codec of its definition. Its
    /// substituted member types are visited so nested instantiations get
    /// entries of their own, but no object is registered for it.
    pub(super) fn collect_generic_instance(
        &mut self,
        ty: &TypeRef,
        identity: &TypeIdentity,
        decl: &TypeDecl,
    ) -> Result<(), CollectError> {
        if !decl.is_polymorphic_base() {
            let layout = object::discover_members(self.descriptor, self.policy, ty, identity, decl)?;
            self.visit_edges(layout.edges)?;
        }
        self.visit(&decl.definition_ref())?;
        for arg in ty.generic_args() {
            self.visit(arg)?;
        }

        self.model.insert_generic(GenericSchema {
            instantiation_identity: identity.clone(),
            codec_expression: naming::user_generic_codec(decl, ty.generic_args()),
            is_open_generic: ty.is_open(),
        });
        Ok(())
    }
}
