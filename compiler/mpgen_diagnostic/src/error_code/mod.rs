//! Error codes for all schema diagnostics.
//!
//! Each error code is a unique identifier (e.g., `M2002`) with the first digit
//! indicating the area. Used for `explain` lookups and documentation.

use std::fmt;

/// Error codes for all schema diagnostics.
///
/// Format: M#### where first digit indicates area:
/// - M1xxx: Closure and shape errors
/// - M2xxx: Member key errors
/// - M3xxx: Constructor binding errors
/// - M4xxx: Union errors
/// - M9xxx: Internal errors
///
/// Warnings use W####.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorCode {
    // Closure / Shape Errors (M1xxx)
    /// Type shape cannot be serialized
    M1001,
    /// Type not found in metadata
    M1002,
    /// Type not visible to generated code
    M1003,
    /// Known container type also declares union subtypes
    M1004,
    /// Root type is not a serializable object, union, or enum
    M1005,
    /// Interface or abstract class without union declarations reached through a member
    M1006,

    // Key Errors (M2xxx)
    /// Integer and string keys mixed on one type
    M2001,
    /// Duplicate member key
    M2002,
    /// Member without a key on a serializable object
    M2003,
    /// Key attribute with neither an integer nor a string
    M2004,
    /// Type reached without the serializable-object attribute
    M2005,

    // Constructor Errors (M3xxx)
    /// No constructor can be bound to the members
    M3001,
    /// More than one designated serialization constructor
    M3002,
    /// Designated constructor parameter does not match a member
    M3003,

    // Union Errors (M4xxx)
    /// Polymorphic root without union declarations
    M4001,
    /// Duplicate union discriminator
    M4002,
    /// Union subtype does not derive from the union base
    M4003,

    // Internal Errors (M9xxx)
    /// Collection cancelled
    M9001,
    /// Invalid metadata or options input
    M9002,

    // Warnings
    /// Key attribute ignored because the type uses member names as keys
    W1001,
}

impl ErrorCode {
    /// All defined error codes, for exhaustive iteration.
    pub const ALL: &[ErrorCode] = &[
        // Closure / Shape
        ErrorCode::M1001,
        ErrorCode::M1002,
        ErrorCode::M1003,
        ErrorCode::M1004,
        ErrorCode::M1005,
        ErrorCode::M1006,
        // Keys
        ErrorCode::M2001,
        ErrorCode::M2002,
        ErrorCode::M2003,
        ErrorCode::M2004,
        ErrorCode::M2005,
        // Constructors
        ErrorCode::M3001,
        ErrorCode::M3002,
        ErrorCode::M3003,
        // Unions
        ErrorCode::M4001,
        ErrorCode::M4002,
        ErrorCode::M4003,
        // Internal
        ErrorCode::M9001,
        ErrorCode::M9002,
        // Warnings
        ErrorCode::W1001,
    ];

    /// Get the code as a string (e.g., "M2002").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::M1001 => "M1001",
            ErrorCode::M1002 => "M1002",
            ErrorCode::M1003 => "M1003",
            ErrorCode::M1004 => "M1004",
            ErrorCode::M1005 => "M1005",
            ErrorCode::M1006 => "M1006",
            ErrorCode::M2001 => "M2001",
            ErrorCode::M2002 => "M2002",
            ErrorCode::M2003 => "M2003",
            ErrorCode::M2004 => "M2004",
            ErrorCode::M2005 => "M2005",
            ErrorCode::M3001 => "M3001",
            ErrorCode::M3002 => "M3002",
            ErrorCode::M3003 => "M3003",
            ErrorCode::M4001 => "M4001",
            ErrorCode::M4002 => "M4002",
            ErrorCode::M4003 => "M4003",
            ErrorCode::M9001 => "M9001",
            ErrorCode::M9002 => "M9002",
            ErrorCode::W1001 => "W1001",
        }
    }

    /// One-line summary of what the code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::M1001 => "type shape cannot be serialized",
            ErrorCode::M1002 => "type not found in metadata",
            ErrorCode::M1003 => "type is not visible to generated code",
            ErrorCode::M1004 => "known container type declares union subtypes",
            ErrorCode::M1005 => "root type is not serializable",
            ErrorCode::M1006 => "member type is an unmarked interface or abstract class",
            ErrorCode::M2001 => "integer and string keys are mixed",
            ErrorCode::M2002 => "duplicate member key",
            ErrorCode::M2003 => "member has no key",
            ErrorCode::M2004 => "key is neither an integer nor a string",
            ErrorCode::M2005 => "type is missing the serializable-object attribute",
            ErrorCode::M3001 => "no constructor matches the serialized members",
            ErrorCode::M3002 => "more than one serialization constructor",
            ErrorCode::M3003 => "serialization constructor parameter does not match a member",
            ErrorCode::M4001 => "polymorphic root has no union declarations",
            ErrorCode::M4002 => "duplicate union discriminator",
            ErrorCode::M4003 => "union subtype does not derive from the union base",
            ErrorCode::M9001 => "collection was cancelled",
            ErrorCode::M9002 => "invalid metadata or options input",
            ErrorCode::W1001 => "key attribute ignored in map mode",
        }
    }

    /// Check if this is a closure/shape error (M1xxx range).
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::M1001
                | ErrorCode::M1002
                | ErrorCode::M1003
                | ErrorCode::M1004
                | ErrorCode::M1005
                | ErrorCode::M1006
        )
    }

    /// Check if this is a key error (M2xxx range).
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::M2001
                | ErrorCode::M2002
                | ErrorCode::M2003
                | ErrorCode::M2004
                | ErrorCode::M2005
        )
    }

    /// Check if this is a constructor binding error (M3xxx range).
    pub fn is_constructor_error(&self) -> bool {
        matches!(self, ErrorCode::M3001 | ErrorCode::M3002 | ErrorCode::M3003)
    }

    /// Check if this is a union error (M4xxx range).
    pub fn is_union_error(&self) -> bool {
        matches!(self, ErrorCode::M4001 | ErrorCode::M4002 | ErrorCode::M4003)
    }

    /// Check if this is an internal error (M9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::M9001 | ErrorCode::M9002)
    }

    /// Check if this is a warning code (Wxxxx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W1001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"M2002"` or `"w1001"`.
///
/// Case-insensitive. Derived from [`ErrorCode::ALL`] and [`ErrorCode::as_str()`].
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
