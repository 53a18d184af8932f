//! The type introspection boundary.
//!
//! The schema engine never inspects host metadata directly; every question it
//! asks goes through `TypeDescriptor`. `MetadataSnapshot` is the in-memory
//! implementation used by the driver and by tests.

use crate::{
    Accessibility, Attribute, ConstructorDecl, FieldDecl, GenericParam, PropertyDecl, TypeDecl,
    TypeRef,
};

/// Fields and properties of a type, inherited ones included.
///
/// Own members come first, then the base type's, then its base's. Member
/// types are expressed in terms of the queried instantiation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Members {
    pub fields: Vec<FieldDecl>,
    pub properties: Vec<PropertyDecl>,
}

/// Read-only queries over host type metadata.
///
/// All queries take the type as a `TypeRef`. Named types are looked up by
/// name; their generic arguments are substituted into member and
/// constructor signatures. Queries on unknown types return empty results.
pub trait TypeDescriptor {
    /// The declaration of a named type.
    fn declaration(&self, ty: &TypeRef) -> Option<&TypeDecl>;

    /// All instance and static members, inherited ones included.
    fn members(&self, ty: &TypeRef) -> Members;

    /// Instance constructors with substituted parameter types, including
    /// the implicit parameterless constructor of a class that declares none.
    fn constructors(&self, ty: &TypeRef) -> Vec<ConstructorDecl>;

    /// Check whether `ty` implements the interface named `interface`,
    /// directly or through its bases.
    fn implements_interface(&self, ty: &TypeRef, interface: &str) -> bool;

    /// Check whether `ty` is `base`, derives from it, or implements it.
    fn is_subtype_of(&self, ty: &TypeRef, base: &TypeRef) -> bool;

    /// Attributes on the type itself.
    fn attributes(&self, ty: &TypeRef) -> &[Attribute] {
        self.declaration(ty).map_or(&[], |decl| &decl.attributes)
    }

    /// Generic arguments of an instantiation.
    fn generic_arguments<'a>(&self, ty: &'a TypeRef) -> &'a [TypeRef] {
        ty.generic_args()
    }

    /// Declared generic parameters of the type's definition.
    fn generic_parameters(&self, ty: &TypeRef) -> &[GenericParam] {
        self.declaration(ty).map_or(&[], |decl| &decl.type_params)
    }

    /// Underlying integer type, if `ty` is an enum.
    fn enum_underlying_type(&self, ty: &TypeRef) -> Option<&str> {
        self.declaration(ty)
            .and_then(|decl| decl.enum_underlying.as_deref())
    }

    /// Effective accessibility: the first level of the containing-type chain
    /// that codecs cannot see, or the type's own accessibility.
    fn accessibility(&self, ty: &TypeRef) -> Accessibility {
        let Some(decl) = self.declaration(ty) else {
            return Accessibility::Public;
        };
        let mut current = decl;
        loop {
            if !current.accessibility.is_visible_to_codecs() {
                return current.accessibility;
            }
            let Some(outer) = current
                .containing_type
                .as_ref()
                .and_then(|name| self.declaration(&TypeRef::named(name.clone())))
            else {
                return decl.accessibility;
            };
            current = outer;
        }
    }

    /// Check whether a method with `name` is declared directly on the type.
    fn declares_method(&self, ty: &TypeRef, name: &str) -> bool {
        self.declaration(ty)
            .is_some_and(|decl| decl.methods.iter().any(|m| m == name))
    }

    /// The generic definition of an instantiation (`Demo.Box<T>` for
    /// `Demo.Box<int>`).
    fn definition(&self, ty: &TypeRef) -> Option<TypeRef> {
        self.declaration(ty)
            .filter(|decl| decl.is_generic())
            .map(TypeDecl::definition_ref)
    }

    /// Check whether `ty` is a generic definition applied to its own parameters.
    fn is_definition(&self, ty: &TypeRef) -> bool {
        self.definition(ty).is_some_and(|def| &def == ty)
    }
}
