//! Fatal collection errors.
//!
//! Any of these aborts the closure for the whole root set; no partial model
//! is returned. Recoverable findings are `Diagnostic`s attached to the
//! schema they concern instead.

use std::fmt;

use mpgen_diagnostic::{Diagnostic, ErrorCode, Subject};
use mpgen_ir::{Accessibility, TypeIdentity};

use crate::KeyMode;

/// Why a type cannot be classified.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeReason {
    /// Arrays above four dimensions have no codec.
    ArrayRank(u32),
    /// The type is not present in the metadata.
    Unresolved,
    /// The type or one of its containing types is hidden from generated code.
    Inaccessible(Accessibility),
    /// A known container type also declares union subtypes.
    ContainerUnionCollision,
    /// A root is not a serializable object, union, or enum.
    IneligibleRoot,
    /// An interface or abstract class without union declarations, reached
    /// through a member.
    UnmarkedPolymorphic,
}

impl ShapeReason {
    pub fn code(self) -> ErrorCode {
        match self {
            ShapeReason::ArrayRank(_) => ErrorCode::M1001,
            ShapeReason::Unresolved => ErrorCode::M1002,
            ShapeReason::Inaccessible(_) => ErrorCode::M1003,
            ShapeReason::ContainerUnionCollision => ErrorCode::M1004,
            ShapeReason::IneligibleRoot => ErrorCode::M1005,
            ShapeReason::UnmarkedPolymorphic => ErrorCode::M1006,
        }
    }
}

impl fmt::Display for ShapeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeReason::ArrayRank(rank) => {
                write!(f, "arrays of rank {rank} are not supported (at most 4)")
            }
            ShapeReason::Unresolved => f.write_str("the type is not declared in the metadata"),
            ShapeReason::Inaccessible(access) => {
                write!(f, "the type is not visible to generated code ({access:?})")
            }
            ShapeReason::ContainerUnionCollision => {
                f.write_str("a known container type cannot also declare union subtypes")
            }
            ShapeReason::IneligibleRoot => f.write_str(
                "a root must be a serializable object, a union interface or abstract class, or an enum",
            ),
            ShapeReason::UnmarkedPolymorphic => f.write_str(
                "an interface or abstract class needs union declarations to be serialized",
            ),
        }
    }
}

/// Why a constructor parameter does not bind to a member.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamMismatch {
    /// No member carries the parameter's key or name.
    MissingMember,
    /// More than one member name matches case-insensitively.
    AmbiguousName,
    /// The member's declared type differs from the parameter type.
    TypeMismatch,
    /// The member cannot be read back on encode.
    NotReadable,
}

impl fmt::Display for ParamMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamMismatch::MissingMember => f.write_str("no member has a matching key"),
            ParamMismatch::AmbiguousName => f.write_str("several members match its name"),
            ParamMismatch::TypeMismatch => f.write_str("the member type differs"),
            ParamMismatch::NotReadable => f.write_str("the member is not readable"),
        }
    }
}

/// Why no decode constructor could be bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructorFailure {
    /// A reference type has no accessible constructor.
    NoAccessibleConstructor,
    /// Every accessible constructor has a parameter that does not bind.
    NoMatch,
    /// More than one constructor is designated for serialization.
    AmbiguousDesignation,
    /// A parameter of the designated constructor does not bind.
    DesignatedParam { param: String, mismatch: ParamMismatch },
}

impl ConstructorFailure {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConstructorFailure::NoAccessibleConstructor | ConstructorFailure::NoMatch => {
                ErrorCode::M3001
            }
            ConstructorFailure::AmbiguousDesignation => ErrorCode::M3002,
            ConstructorFailure::DesignatedParam { .. } => ErrorCode::M3003,
        }
    }
}

impl fmt::Display for ConstructorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructorFailure::NoAccessibleConstructor => {
                f.write_str("the type has no public or internal constructor")
            }
            ConstructorFailure::NoMatch => {
                f.write_str("no constructor's parameters match the serialized members")
            }
            ConstructorFailure::AmbiguousDesignation => {
                f.write_str("more than one constructor is marked as the serialization constructor")
            }
            ConstructorFailure::DesignatedParam { param, mismatch } => write!(
                f,
                "parameter `{param}` of the serialization constructor does not bind: {mismatch}"
            ),
        }
    }
}

/// A fatal error that aborts collection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CollectError {
    #[error("cannot serialize `{identity}`: {reason}")]
    UnsupportedShape {
        identity: TypeIdentity,
        /// Member through which the type was reached, when known.
        member: Option<String>,
        reason: ShapeReason,
    },

    #[error("member `{member}` of `{identity}` is keyed differently from the {expected} keys before it")]
    MixedKeyMode {
        identity: TypeIdentity,
        member: String,
        expected: KeyMode,
    },

    #[error("cannot bind a constructor for `{identity}`: {reason}")]
    NoViableConstructor {
        identity: TypeIdentity,
        reason: ConstructorFailure,
    },

    #[error("root `{identity}` is an interface or abstract class without union declarations")]
    MissingUnionDeclaration { identity: TypeIdentity },

    #[error("collection was cancelled")]
    Cancelled,
}

impl CollectError {
    pub(crate) fn shape(identity: &TypeIdentity, reason: ShapeReason) -> Self {
        CollectError::UnsupportedShape {
            identity: identity.clone(),
            member: None,
            reason,
        }
    }

    /// Attach the member through which the failing type was reached, unless
    /// a deeper member is already recorded.
    #[must_use]
    pub(crate) fn via_member(self, name: &str) -> Self {
        match self {
            CollectError::UnsupportedShape {
                identity,
                member: None,
                reason,
            } => CollectError::UnsupportedShape {
                identity,
                member: Some(name.to_string()),
                reason,
            },
            other => other,
        }
    }

    /// The offending type, if any.
    pub fn identity(&self) -> Option<&TypeIdentity> {
        match self {
            CollectError::UnsupportedShape { identity, .. }
            | CollectError::MixedKeyMode { identity, .. }
            | CollectError::NoViableConstructor { identity, .. }
            | CollectError::MissingUnionDeclaration { identity } => Some(identity),
            CollectError::Cancelled => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CollectError::UnsupportedShape { reason, .. } => reason.code(),
            CollectError::MixedKeyMode { .. } => ErrorCode::M2001,
            CollectError::NoViableConstructor { reason, .. } => reason.code(),
            CollectError::MissingUnionDeclaration { .. } => ErrorCode::M4001,
            CollectError::Cancelled => ErrorCode::M9001,
        }
    }

    /// Convert to a diagnostic for reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            CollectError::UnsupportedShape {
                identity,
                member,
                reason,
            } => {
                let diag = match member {
                    Some(member) => diag
                        .with_label(Subject::ty(identity.as_str()), reason.to_string())
                        .with_secondary_label(
                            Subject::ty(identity.as_str()),
                            format!("reached through member `{member}`"),
                        ),
                    None => diag.with_label(Subject::ty(identity.as_str()), reason.to_string()),
                };
                match reason {
                    ShapeReason::Inaccessible(_) => {
                        diag.with_suggestion("make the type and its containing types public or internal")
                    }
                    ShapeReason::Unresolved => diag.with_suggestion(
                        "add the type to the metadata snapshot or list it in `ignoredTypeNames`",
                    ),
                    ShapeReason::UnmarkedPolymorphic => diag.with_suggestion(
                        "declare its subtypes with union attributes or use a concrete member type",
                    ),
                    _ => diag,
                }
            }
            CollectError::MixedKeyMode {
                identity,
                member,
                expected,
            } => diag
                .with_label(
                    Subject::member(identity.as_str(), member),
                    format!("expected a {expected} key"),
                )
                .with_note("the first keyed member fixes the key kind for the whole type"),
            CollectError::NoViableConstructor { identity, reason } => {
                let subject = match reason {
                    ConstructorFailure::DesignatedParam { param, .. } => {
                        Subject::member(identity.as_str(), param)
                    }
                    _ => Subject::ty(identity.as_str()),
                };
                diag.with_label(subject, reason.to_string()).with_suggestion(
                    "add a constructor whose parameters match the keyed members by key or name",
                )
            }
            CollectError::MissingUnionDeclaration { identity } => diag
                .with_label(Subject::ty(identity.as_str()), "no union subtypes declared")
                .with_suggestion("declare at least one discriminator and subtype with a union attribute"),
            CollectError::Cancelled => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpgen_ir::TypeRef;
    use pretty_assertions::assert_eq;

    fn identity(name: &str) -> TypeIdentity {
        TypeRef::named(name).identity()
    }

    #[test]
    fn test_via_member_keeps_innermost() {
        let err = CollectError::shape(&identity("Demo.Hidden"), ShapeReason::Unresolved)
            .via_member("Inner")
            .via_member("Outer");
        assert_eq!(
            err,
            CollectError::UnsupportedShape {
                identity: identity("Demo.Hidden"),
                member: Some("Inner".to_string()),
                reason: ShapeReason::Unresolved,
            }
        );
    }

    #[test]
    fn test_codes() {
        let id = identity("Demo.Widget");
        assert_eq!(
            CollectError::shape(&id, ShapeReason::ArrayRank(5)).code(),
            ErrorCode::M1001
        );
        assert_eq!(
            CollectError::NoViableConstructor {
                identity: id.clone(),
                reason: ConstructorFailure::AmbiguousDesignation,
            }
            .code(),
            ErrorCode::M3002
        );
        assert_eq!(
            CollectError::MissingUnionDeclaration { identity: id.clone() }.code(),
            ErrorCode::M4001
        );
        assert_eq!(
            CollectError::shape(&id, ShapeReason::UnmarkedPolymorphic).code(),
            ErrorCode::M1006
        );
        assert_eq!(CollectError::Cancelled.code(), ErrorCode::M9001);
    }

    #[test]
    fn test_mixed_key_diagnostic_names_member() {
        let err = CollectError::MixedKeyMode {
            identity: identity("Demo.Widget"),
            member: "Label".to_string(),
            expected: KeyMode::Int,
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::M2001);
        assert_eq!(
            diag.subject(),
            Some(&Subject::member("Demo.Widget", "Label"))
        );
        assert!(diag.message.contains("integer keys"));
    }

    #[test]
    fn test_designated_param_diagnostic_names_param() {
        let err = CollectError::NoViableConstructor {
            identity: identity("Demo.Person"),
            reason: ConstructorFailure::DesignatedParam {
                param: "age".to_string(),
                mismatch: ParamMismatch::TypeMismatch,
            },
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::M3003);
        assert_eq!(diag.subject(), Some(&Subject::member("Demo.Person", "age")));
        assert_eq!(
            err.to_string(),
            "cannot bind a constructor for `Demo.Person`: parameter `age` of the serialization constructor does not bind: the member type differs"
        );
    }
}
