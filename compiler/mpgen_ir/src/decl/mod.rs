//! Host type metadata records.
//!
//! These are the frozen facts the introspection facility reports about each
//! declared type: its kind, visibility, attributes, members, and
//! constructors. Type expressions inside a declaration are `TypeRef`s; names
//! of the declaration's own generic parameters appear as `TypeRef::Param`
//! once the declaration is registered in a `MetadataSnapshot`.

use crate::TypeRef;

/// Declared accessibility of a type or member.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Accessibility {
    #[default]
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    PrivateProtected,
    Private,
}

impl Accessibility {
    /// Generated codecs live in the same compilation, so only public and
    /// internal symbols are reachable from them.
    #[inline]
    pub fn is_visible_to_codecs(self) -> bool {
        matches!(self, Accessibility::Public | Accessibility::Internal)
    }
}

/// The declaration kind of a named type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
}

impl TypeKind {
    /// Classes and interfaces are reference types.
    #[inline]
    pub fn is_reference_type(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Interface)
    }
}

/// The value carried by a key attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum KeyValue {
    Int(i32),
    Str(String),
    /// The attribute was applied with a null argument.
    Null,
}

/// Serialization attributes recognized on types, members, and constructors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Attribute {
    /// Marks a class or struct as serializable.
    SerializableObject {
        /// Use member names as string keys for every member.
        #[cfg_attr(feature = "serde", serde(default))]
        key_as_property_name: bool,
    },
    /// One discriminator to subtype mapping of a union base.
    Union { discriminator: i32, subtype: TypeRef },
    /// Designates the constructor used on decode.
    SerializationConstructor,
    /// Assigns a member's wire key.
    Key { value: KeyValue },
    /// Excludes a member.
    IgnoreMember,
    /// Excludes a member (data-contract flavor).
    IgnoreDataMember,
    /// A hand-written codec that replaces generated code.
    CustomFormatter { formatter: String },
}

impl Attribute {
    /// The serializable-object attribute in `attrs`, if any.
    pub fn find_object(attrs: &[Attribute]) -> Option<bool> {
        attrs.iter().find_map(|attr| match attr {
            Attribute::SerializableObject {
                key_as_property_name,
            } => Some(*key_as_property_name),
            _ => None,
        })
    }

    /// The first key attribute in `attrs`, if any.
    pub fn find_key(attrs: &[Attribute]) -> Option<&KeyValue> {
        attrs.iter().find_map(|attr| match attr {
            Attribute::Key { value } => Some(value),
            _ => None,
        })
    }

    /// The first custom-formatter attribute in `attrs`, if any.
    pub fn find_custom_formatter(attrs: &[Attribute]) -> Option<&str> {
        attrs.iter().find_map(|attr| match attr {
            Attribute::CustomFormatter { formatter } => Some(formatter.as_str()),
            _ => None,
        })
    }

    /// Every union declaration in `attrs`, in declaration order.
    pub fn unions(attrs: &[Attribute]) -> impl Iterator<Item = (i32, &TypeRef)> {
        attrs.iter().filter_map(|attr| match attr {
            Attribute::Union {
                discriminator,
                subtype,
            } => Some((*discriminator, subtype)),
            _ => None,
        })
    }

    /// Check whether `attrs` excludes the member from serialization.
    pub fn is_ignored(attrs: &[Attribute]) -> bool {
        attrs
            .iter()
            .any(|attr| matches!(attr, Attribute::IgnoreMember | Attribute::IgnoreDataMember))
    }

    /// Check whether `attrs` designates a serialization constructor.
    pub fn is_serialization_constructor(attrs: &[Attribute]) -> bool {
        attrs
            .iter()
            .any(|attr| matches!(attr, Attribute::SerializationConstructor))
    }
}

/// A generic type parameter and its constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GenericParam {
    pub name: String,
    /// `notnull`
    pub not_null: bool,
    /// `class`
    pub reference_type: bool,
    /// `class?` (only meaningful with `reference_type`)
    pub nullable_reference_type: bool,
    /// `struct`
    pub value_type: bool,
    /// `unmanaged` (implies `value_type`)
    pub unmanaged: bool,
    /// Interface and base-class constraints, in declaration order.
    pub constraint_types: Vec<TypeRef>,
    /// `new()`
    pub default_constructor: bool,
}

impl GenericParam {
    pub fn new(name: impl Into<String>) -> Self {
        GenericParam {
            name: name.into(),
            ..GenericParam::default()
        }
    }

    /// Constraints in the order the host language requires them:
    /// primary constraint first, constraint types next, `new()` last.
    pub fn constraint_list(&self) -> Vec<String> {
        let mut constraints = Vec::new();
        if self.not_null {
            constraints.push("notnull".to_string());
        }
        if self.reference_type {
            constraints.push(if self.nullable_reference_type { "class?" } else { "class" }.to_string());
        }
        if self.value_type || self.unmanaged {
            constraints.push(if self.unmanaged { "unmanaged" } else { "struct" }.to_string());
        }
        constraints.extend(self.constraint_types.iter().map(ToString::to_string));
        if self.default_constructor {
            constraints.push("new()".to_string());
        }
        constraints
    }
}

/// An instance or static field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: TypeRef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub accessibility: Accessibility,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_readonly: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_static: bool,
    /// Backing fields and other compiler-synthesized storage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_compiler_generated: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Vec<Attribute>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        FieldDecl {
            name: name.into(),
            ty,
            accessibility: Accessibility::Public,
            is_readonly: false,
            is_static: false,
            is_compiler_generated: false,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }

    pub fn is_readable(&self) -> bool {
        !self.is_static && self.accessibility.is_visible_to_codecs()
    }

    pub fn is_writable(&self) -> bool {
        self.is_readable() && !self.is_readonly
    }
}

/// A property. Accessor accessibility is `None` when the accessor is absent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: TypeRef,
    #[cfg_attr(feature = "serde", serde(default = "default_accessor"))]
    pub getter: Option<Accessibility>,
    #[cfg_attr(feature = "serde", serde(default = "default_accessor"))]
    pub setter: Option<Accessibility>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_static: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_indexer: bool,
    /// Overrides a base declaration of the same property.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_override: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Vec<Attribute>,
}

#[cfg(feature = "serde")]
#[allow(clippy::unnecessary_wraps)]
fn default_accessor() -> Option<Accessibility> {
    Some(Accessibility::Public)
}

impl PropertyDecl {
    /// A public read-write property.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        PropertyDecl {
            name: name.into(),
            ty,
            getter: Some(Accessibility::Public),
            setter: Some(Accessibility::Public),
            is_static: false,
            is_indexer: false,
            is_override: false,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Remove the setter.
    #[must_use]
    pub fn get_only(mut self) -> Self {
        self.setter = None;
        self
    }

    #[must_use]
    pub fn overriding(mut self) -> Self {
        self.is_override = true;
        self
    }

    pub fn is_readable(&self) -> bool {
        !self.is_static && self.getter.is_some_and(Accessibility::is_visible_to_codecs)
    }

    pub fn is_writable(&self) -> bool {
        !self.is_static && self.setter.is_some_and(Accessibility::is_visible_to_codecs)
    }
}

/// A constructor parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: TypeRef,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        ParamDecl {
            name: name.into(),
            ty,
        }
    }
}

/// An instance constructor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ConstructorDecl {
    pub accessibility: Accessibility,
    pub params: Vec<ParamDecl>,
    pub attributes: Vec<Attribute>,
}

impl ConstructorDecl {
    /// A public constructor with the given parameters.
    pub fn new(params: Vec<ParamDecl>) -> Self {
        ConstructorDecl {
            accessibility: Accessibility::Public,
            params,
            attributes: Vec::new(),
        }
    }

    /// Mark as the designated serialization constructor.
    #[must_use]
    pub fn designated(mut self) -> Self {
        self.attributes.push(Attribute::SerializationConstructor);
        self
    }

    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn is_designated(&self) -> bool {
        Attribute::is_serialization_constructor(&self.attributes)
    }
}

/// A named type declaration.
///
/// `name` is the fully qualified name without generic arity; nested types
/// use `.` between the containing type and themselves (`Demo.Outer.Inner`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub accessibility: Accessibility,
    /// Containing namespace. Derived from `name` when absent.
    pub namespace: Option<String>,
    /// Full name of the enclosing type for nested declarations.
    pub containing_type: Option<String>,
    /// Declared in referenced metadata rather than the compilation itself.
    pub external: bool,
    pub type_params: Vec<GenericParam>,
    pub attributes: Vec<Attribute>,
    pub base: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub fields: Vec<FieldDecl>,
    pub properties: Vec<PropertyDecl>,
    pub constructors: Vec<ConstructorDecl>,
    /// Names of methods declared directly on the type.
    pub methods: Vec<String>,
    /// Underlying integer type of an enum.
    pub enum_underlying: Option<String>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        TypeDecl {
            name: name.into(),
            kind,
            ..TypeDecl::default()
        }
    }

    /// A class carrying the serializable-object attribute.
    pub fn object(name: impl Into<String>) -> Self {
        TypeDecl::new(name, TypeKind::Class).with_attribute(Attribute::SerializableObject {
            key_as_property_name: false,
        })
    }

    /// An enum with the given underlying integer type.
    pub fn enumeration(name: impl Into<String>, underlying: impl Into<String>) -> Self {
        TypeDecl {
            enum_underlying: Some(underlying.into()),
            ..TypeDecl::new(name, TypeKind::Enum)
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    #[must_use]
    pub fn with_type_param(mut self, param: GenericParam) -> Self {
        self.type_params.push(param);
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, ctor: ConstructorDecl) -> Self {
        self.constructors.push(ctor);
        self
    }

    #[must_use]
    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn with_method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(name.into());
        self
    }

    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn nested_in(mut self, containing: impl Into<String>) -> Self {
        self.containing_type = Some(containing.into());
        self
    }

    #[must_use]
    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Name relative to the namespace: `Outer.Inner` for a nested type.
    pub fn relative_name(&self) -> &str {
        match &self.namespace {
            Some(ns) => self
                .name
                .strip_prefix(ns.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(&self.name),
            None => &self.name,
        }
    }

    /// Check whether the type is generic.
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// The generic definition: the type applied to its own parameters.
    pub fn definition_ref(&self) -> TypeRef {
        TypeRef::generic(
            self.name.clone(),
            self.type_params
                .iter()
                .map(|p| TypeRef::param(p.name.clone()))
                .collect(),
        )
    }

    /// Interfaces and abstract classes are polymorphic bases.
    pub fn is_polymorphic_base(&self) -> bool {
        self.kind == TypeKind::Interface || (self.kind == TypeKind::Class && self.is_abstract)
    }
}
