//! Structural type references and their canonical identities.
//!
//! `TypeRef` captures a type expression as the host metadata reports it,
//! before classification by the schema engine:
//! - Named types with optional type arguments: `Demo.Widget`,
//!   `System.Collections.Generic.Dictionary<string, Demo.Widget>`
//! - Generic type parameters: `T`
//! - Arrays of any rank: `int[]`, `Demo.Cell[,]`
//! - Syntactic tuples: `(int, string)`
//!
//! # Canonical form
//!
//! `TypeIdentity` is the rendered, tuple-normalized form of a `TypeRef`. Two
//! instantiations of the same generic with identical arguments render to the
//! same string, so identity equality, hashing, and ordering all work on the
//! rendered text.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Name of the nullable value-type wrapper. Rendered as `T?`.
pub const NULLABLE: &str = "System.Nullable";

/// Name of the canonical tuple shape syntactic tuples are normalized to.
pub const VALUE_TUPLE: &str = "System.ValueTuple";

/// Largest tuple arity before the remaining elements nest into a trailing tuple.
const TUPLE_ARITY_LIMIT: usize = 7;

/// A structural type reference.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum TypeRef {
    /// A named type with optional type arguments.
    /// Examples: `Demo.Node`, `System.Collections.Generic.List<Demo.Node>`
    Named {
        /// Fully qualified name without generic arity.
        name: String,
        /// Generic type arguments, empty if non-generic.
        args: Vec<TypeRef>,
    },

    /// A generic type parameter: `T`.
    Param(String),

    /// An array type: `T[]` (rank 1), `T[,]` (rank 2), ...
    Array {
        /// Element type.
        element: Box<TypeRef>,
        /// Number of dimensions (at least 1).
        rank: u32,
    },

    /// A syntactic tuple: `(T, U)`.
    Tuple(Vec<TypeRef>),
}

impl TypeRef {
    /// Create a named type without type arguments.
    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Create a named type with type arguments.
    #[inline]
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args,
        }
    }

    /// Create a generic type parameter reference.
    #[inline]
    pub fn param(name: impl Into<String>) -> Self {
        TypeRef::Param(name.into())
    }

    /// Create an array type.
    #[inline]
    pub fn array(element: TypeRef, rank: u32) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank,
        }
    }

    /// Create a nullable value type `T?`.
    #[inline]
    pub fn nullable(inner: TypeRef) -> Self {
        TypeRef::generic(NULLABLE, vec![inner])
    }

    /// Create a syntactic tuple.
    #[inline]
    pub fn tuple(elements: Vec<TypeRef>) -> Self {
        TypeRef::Tuple(elements)
    }

    /// Parse a type from its rendered form.
    pub fn parse(text: &str) -> Result<Self, ParseTypeError> {
        parse::parse(text)
    }

    /// The fully qualified name of a named type.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Generic arguments of a named type; empty for every other shape.
    pub fn generic_args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// Check if this is a named type with at least one type argument.
    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generic_args().is_empty()
    }

    /// Check if this is a generic type parameter.
    #[inline]
    pub fn is_param(&self) -> bool {
        matches!(self, TypeRef::Param(_))
    }

    /// Check if this is `System.Nullable<T>`.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeRef::Named { name, args } if name == NULLABLE && args.len() == 1)
    }

    /// Element type and rank of an array type.
    pub fn array_parts(&self) -> Option<(&TypeRef, u32)> {
        match self {
            TypeRef::Array { element, rank } => Some((element, *rank)),
            _ => None,
        }
    }

    /// Check whether a type parameter occurs anywhere inside this type.
    pub fn is_open(&self) -> bool {
        match self {
            TypeRef::Param(_) => true,
            TypeRef::Named { args, .. } => args.iter().any(TypeRef::is_open),
            TypeRef::Array { element, .. } => element.is_open(),
            TypeRef::Tuple(elements) => elements.iter().any(TypeRef::is_open),
        }
    }

    /// The unbound generic signature used for container catalog lookup.
    ///
    /// `Dictionary<string, int>` becomes `System.Collections.Generic.Dictionary<,>`.
    /// Non-generic types render as themselves.
    pub fn unbound_signature(&self) -> String {
        match self.normalize_tuples() {
            TypeRef::Named { name, args } if !args.is_empty() => {
                format!("{name}<{}>", ",".repeat(args.len() - 1))
            }
            other => other.to_string(),
        }
    }

    /// Rewrite syntactic tuples into the canonical `System.ValueTuple` shape.
    ///
    /// Tuples longer than seven elements nest the remainder into an eighth
    /// tuple argument, matching the host's tuple layout.
    pub fn normalize_tuples(&self) -> TypeRef {
        match self {
            TypeRef::Tuple(elements) => {
                let mut normalized: Vec<TypeRef> =
                    elements.iter().map(TypeRef::normalize_tuples).collect();
                if normalized.len() > TUPLE_ARITY_LIMIT {
                    let rest = normalized.split_off(TUPLE_ARITY_LIMIT);
                    normalized.push(TypeRef::Tuple(rest).normalize_tuples());
                }
                TypeRef::generic(VALUE_TUPLE, normalized)
            }
            TypeRef::Named { name, args } => TypeRef::Named {
                name: name.clone(),
                args: args.iter().map(TypeRef::normalize_tuples).collect(),
            },
            TypeRef::Array { element, rank } => TypeRef::array(element.normalize_tuples(), *rank),
            TypeRef::Param(_) => self.clone(),
        }
    }

    /// Replace type parameters using `bindings`; unbound parameters stay as-is.
    pub fn substitute(&self, bindings: &FxHashMap<String, TypeRef>) -> TypeRef {
        match self {
            TypeRef::Param(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            TypeRef::Named { name, args } => TypeRef::Named {
                name: name.clone(),
                args: args.iter().map(|arg| arg.substitute(bindings)).collect(),
            },
            TypeRef::Array { element, rank } => TypeRef::array(element.substitute(bindings), *rank),
            TypeRef::Tuple(elements) => {
                TypeRef::Tuple(elements.iter().map(|e| e.substitute(bindings)).collect())
            }
        }
    }

    /// The canonical identity of this type.
    pub fn identity(&self) -> TypeIdentity {
        TypeIdentity::from(self)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { name, args } if name == NULLABLE && args.len() == 1 => {
                write!(f, "{}?", args[0])
            }
            TypeRef::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_list(f, args)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Param(name) => f.write_str(name),
            TypeRef::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                write!(f, "{element}[{commas}]")
            }
            TypeRef::Tuple(elements) => {
                f.write_str("(")?;
                write_list(f, elements)?;
                f.write_str(")")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeRef]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl TryFrom<String> for TypeRef {
    type Error = ParseTypeError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&text)
    }
}

impl From<TypeRef> for String {
    fn from(ty: TypeRef) -> Self {
        ty.to_string()
    }
}

impl std::str::FromStr for TypeRef {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

/// Canonical, stable key for a type.
///
/// Holds the rendered, tuple-normalized type. Cheap to clone.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity(Arc<str>);

impl TypeIdentity {
    /// The canonical rendering.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&TypeRef> for TypeIdentity {
    fn from(ty: &TypeRef) -> Self {
        TypeIdentity(Arc::from(ty.normalize_tuples().to_string()))
    }
}

impl Borrow<str> for TypeIdentity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TypeIdentity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TypeIdentity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let ty = TypeRef::parse(&text).map_err(serde::de::Error::custom)?;
        Ok(ty.identity())
    }
}

/// Error produced when a rendered type cannot be parsed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid type `{input}` at offset {offset}: {message}")]
pub struct ParseTypeError {
    /// The text that failed to parse.
    pub input: String,
    /// Byte offset of the failure.
    pub offset: usize,
    /// What was expected.
    pub message: &'static str,
}

mod parse;
