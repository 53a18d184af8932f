//! Frozen, in-memory type metadata.
//!
//! A `MetadataSnapshot` is built once from a list of declarations and never
//! changes afterwards. Construction validates the declarations and rewrites
//! references to in-scope generic parameters into `TypeRef::Param`, so every
//! query can substitute arguments structurally.
//!
//! # Design
//!
//! - `BTreeMap` keyed by full name for deterministic iteration
//! - Base chains are checked for cycles up front, so inherited-member walks
//!   always terminate

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    Attribute, ConstructorDecl, FieldDecl, Members, ParamDecl, ParseTypeError, PropertyDecl,
    TypeDecl, TypeDescriptor, TypeKind, TypeRef,
};

/// Errors raised while assembling a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("a type declaration has an empty name")]
    EmptyName,

    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),

    #[error("type `{name}` is nested in undeclared type `{containing}`")]
    UnknownContainingType { name: String, containing: String },

    #[error("type `{0}` is nested in itself")]
    CyclicNesting(String),

    #[error("base type chain of `{0}` is cyclic")]
    CyclicBase(String),
}

/// Type metadata for one compilation.
#[derive(Clone, Debug, Default)]
pub struct MetadataSnapshot {
    types: BTreeMap<String, TypeDecl>,
}

impl MetadataSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        MetadataSnapshot::default()
    }

    /// Build a snapshot from declarations.
    pub fn from_decls(decls: impl IntoIterator<Item = TypeDecl>) -> Result<Self, SnapshotError> {
        let mut types = BTreeMap::new();
        for decl in decls {
            if decl.name.is_empty() {
                return Err(SnapshotError::EmptyName);
            }
            if types.contains_key(&decl.name) {
                return Err(SnapshotError::DuplicateType(decl.name));
            }
            types.insert(decl.name.clone(), decl);
        }

        let names: Vec<String> = types.keys().cloned().collect();
        let mut resolved = FxHashMap::default();
        for name in &names {
            let chain = nesting_chain(&types, name)?;
            let namespace = derive_namespace(&types, &chain);
            let scope: Vec<String> = chain
                .iter()
                .filter_map(|n| types.get(n.as_str()))
                .flat_map(|d| d.type_params.iter().map(|p| p.name.clone()))
                .collect();
            resolved.insert(name.clone(), (namespace, scope));
        }

        for (name, decl) in &mut types {
            if let Some((namespace, scope)) = resolved.remove(name) {
                decl.namespace = namespace;
                bind_decl(decl, &scope);
            }
        }

        let snapshot = MetadataSnapshot { types };
        for name in snapshot.types.keys() {
            snapshot.check_base_chain(name)?;
        }
        Ok(snapshot)
    }

    /// Look up a declaration by full name.
    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(name)
    }

    /// Check if a type is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Iterate declarations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Parse a type expression, treating argument names that match the
    /// declared parameters of the enclosing generic as type parameters.
    ///
    /// `Demo.Box<T>` resolves to the definition of `Demo.Box` when `T` is its
    /// declared parameter and not itself a declared type.
    pub fn resolve_type(&self, text: &str) -> Result<TypeRef, ParseTypeError> {
        let ty = TypeRef::parse(text)?;
        Ok(self.bind_definition_args(&ty, &[]))
    }

    fn bind_definition_args(&self, ty: &TypeRef, scope: &[String]) -> TypeRef {
        match ty {
            TypeRef::Named { name, args } if args.is_empty() => {
                if scope.iter().any(|p| p == name) && !self.contains(name) {
                    TypeRef::param(name.clone())
                } else {
                    ty.clone()
                }
            }
            TypeRef::Named { name, args } => {
                let mut inner: Vec<String> = scope.to_vec();
                if let Some(decl) = self.get(name) {
                    inner.extend(decl.type_params.iter().map(|p| p.name.clone()));
                }
                TypeRef::generic(
                    name.clone(),
                    args.iter()
                        .map(|arg| self.bind_definition_args(arg, &inner))
                        .collect(),
                )
            }
            TypeRef::Array { element, rank } => {
                TypeRef::array(self.bind_definition_args(element, scope), *rank)
            }
            TypeRef::Tuple(elements) => TypeRef::Tuple(
                elements
                    .iter()
                    .map(|e| self.bind_definition_args(e, scope))
                    .collect(),
            ),
            TypeRef::Param(_) => ty.clone(),
        }
    }

    fn lookup(&self, ty: &TypeRef) -> Option<&TypeDecl> {
        ty.name().and_then(|name| self.types.get(name))
    }

    fn check_base_chain(&self, name: &str) -> Result<(), SnapshotError> {
        let mut seen = FxHashSet::default();
        let mut current = Some(name);
        while let Some(n) = current {
            if !seen.insert(n) {
                return Err(SnapshotError::CyclicBase(name.to_string()));
            }
            current = self
                .types
                .get(n)
                .and_then(|d| d.base.as_ref())
                .and_then(TypeRef::name);
        }
        Ok(())
    }

    /// Names of every base type and interface of `name`, transitively.
    fn supertypes<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut out = Vec::new();
        let mut work = vec![name];
        while let Some(current) = work.pop() {
            let Some(decl) = self.types.get(current) else {
                continue;
            };
            let parents = decl
                .base
                .iter()
                .chain(decl.interfaces.iter())
                .filter_map(TypeRef::name);
            for parent in parents {
                if seen.insert(parent) {
                    out.push(parent);
                    work.push(parent);
                }
            }
        }
        out
    }
}

impl TypeDescriptor for MetadataSnapshot {
    fn declaration(&self, ty: &TypeRef) -> Option<&TypeDecl> {
        self.lookup(ty)
    }

    fn members(&self, ty: &TypeRef) -> Members {
        let mut members = Members::default();
        let mut current = Some(ty.clone());
        while let Some(cur) = current.take() {
            let Some(decl) = self.lookup(&cur) else {
                break;
            };
            let bindings = bindings_for(decl, &cur);
            members
                .fields
                .extend(decl.fields.iter().map(|f| FieldDecl {
                    ty: f.ty.substitute(&bindings),
                    ..f.clone()
                }));
            members
                .properties
                .extend(decl.properties.iter().map(|p| PropertyDecl {
                    ty: p.ty.substitute(&bindings),
                    ..p.clone()
                }));
            current = decl.base.as_ref().map(|base| base.substitute(&bindings));
        }
        members
    }

    fn constructors(&self, ty: &TypeRef) -> Vec<ConstructorDecl> {
        let Some(decl) = self.lookup(ty) else {
            return Vec::new();
        };
        // A class without declared constructors gets the implicit public one.
        if decl.constructors.is_empty() && decl.kind == TypeKind::Class && !decl.is_abstract {
            return vec![ConstructorDecl::new(Vec::new())];
        }
        let bindings = bindings_for(decl, ty);
        decl.constructors
            .iter()
            .map(|ctor| ConstructorDecl {
                params: ctor
                    .params
                    .iter()
                    .map(|p| ParamDecl::new(p.name.clone(), p.ty.substitute(&bindings)))
                    .collect(),
                ..ctor.clone()
            })
            .collect()
    }

    fn implements_interface(&self, ty: &TypeRef, interface: &str) -> bool {
        ty.name()
            .is_some_and(|name| self.supertypes(name).iter().any(|s| *s == interface))
    }

    fn is_subtype_of(&self, ty: &TypeRef, base: &TypeRef) -> bool {
        match (ty.name(), base.name()) {
            (Some(name), Some(base_name)) => {
                name == base_name || self.supertypes(name).iter().any(|s| *s == base_name)
            }
            _ => false,
        }
    }
}

/// Map the declared parameters of `decl` to the arguments of `ty`.
fn bindings_for(decl: &TypeDecl, ty: &TypeRef) -> FxHashMap<String, TypeRef> {
    let args = ty.generic_args();
    if args.len() != decl.type_params.len() {
        return FxHashMap::default();
    }
    decl.type_params
        .iter()
        .zip(args)
        .map(|(param, arg)| (param.name.clone(), arg.clone()))
        .collect()
}

/// `name` followed by its containing types, innermost first.
fn nesting_chain(
    types: &BTreeMap<String, TypeDecl>,
    name: &str,
) -> Result<Vec<String>, SnapshotError> {
    let mut chain = vec![name.to_string()];
    let mut current = types.get(name);
    while let Some(containing) = current.and_then(|d| d.containing_type.as_ref()) {
        if chain.contains(containing) {
            return Err(SnapshotError::CyclicNesting(name.to_string()));
        }
        let Some(outer) = types.get(containing) else {
            return Err(SnapshotError::UnknownContainingType {
                name: chain.last().cloned().unwrap_or_default(),
                containing: containing.clone(),
            });
        };
        chain.push(containing.clone());
        current = Some(outer);
    }
    Ok(chain)
}

/// The namespace of the innermost type in `chain`.
///
/// An explicit namespace anywhere in the chain wins; otherwise the outermost
/// type's name prefix is used.
fn derive_namespace(types: &BTreeMap<String, TypeDecl>, chain: &[String]) -> Option<String> {
    for name in chain {
        if let Some(ns) = types.get(name).and_then(|d| d.namespace.clone()) {
            return Some(ns);
        }
    }
    let outermost = chain.last()?;
    outermost
        .rsplit_once('.')
        .map(|(namespace, _)| namespace.to_string())
}

fn bind_decl(decl: &mut TypeDecl, scope: &[String]) {
    if scope.is_empty() {
        return;
    }
    let bind = |ty: &TypeRef| bind_params(ty, scope);

    for field in &mut decl.fields {
        field.ty = bind(&field.ty);
    }
    for prop in &mut decl.properties {
        prop.ty = bind(&prop.ty);
    }
    for ctor in &mut decl.constructors {
        for param in &mut ctor.params {
            param.ty = bind(&param.ty);
        }
    }
    for param in &mut decl.type_params {
        param.constraint_types = param.constraint_types.iter().map(bind).collect();
    }
    decl.base = decl.base.as_ref().map(bind);
    decl.interfaces = decl.interfaces.iter().map(bind).collect();
    for attr in &mut decl.attributes {
        if let Attribute::Union { subtype, .. } = attr {
            *subtype = bind(subtype);
        }
    }
}

/// Rewrite bare names that match an in-scope parameter into `TypeRef::Param`.
fn bind_params(ty: &TypeRef, scope: &[String]) -> TypeRef {
    match ty {
        TypeRef::Named { name, args } if args.is_empty() && scope.iter().any(|p| p == name) => {
            TypeRef::param(name.clone())
        }
        TypeRef::Named { name, args } => TypeRef::generic(
            name.clone(),
            args.iter().map(|arg| bind_params(arg, scope)).collect(),
        ),
        TypeRef::Array { element, rank } => TypeRef::array(bind_params(element, scope), *rank),
        TypeRef::Tuple(elements) => {
            TypeRef::Tuple(elements.iter().map(|e| bind_params(e, scope)).collect())
        }
        TypeRef::Param(_) => ty.clone(),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
