//! Decode constructor binding.
//!
//! A designated constructor is bound or rejected on its own. Otherwise the
//! accessible constructors are tried from most to fewest parameters and the
//! first one whose every parameter binds to a member wins.

use std::cmp::Reverse;

use mpgen_ir::ConstructorDecl;
use smallvec::SmallVec;

use crate::{ConstructorFailure, KeyMode, MemberRef, MemberSchema, ParamMismatch};

/// Bind a constructor to `members`.
///
/// Returns `None` for a value type without accessible constructors; it is
/// default-constructed and populated through writable members.
pub(super) fn bind(
    constructors: &[ConstructorDecl],
    members: &[MemberSchema],
    key_mode: KeyMode,
    is_reference_type: bool,
) -> Result<Option<Vec<MemberRef>>, ConstructorFailure> {
    let mut accessible: SmallVec<[&ConstructorDecl; 4]> = constructors
        .iter()
        .filter(|ctor| ctor.accessibility.is_visible_to_codecs())
        .collect();

    let mut designated = accessible.iter().filter(|ctor| ctor.is_designated());
    if let Some(ctor) = designated.next() {
        if designated.next().is_some() {
            return Err(ConstructorFailure::AmbiguousDesignation);
        }
        return try_bind(ctor, members, key_mode).map(Some).map_err(|(param, mismatch)| {
            ConstructorFailure::DesignatedParam {
                param: param.to_string(),
                mismatch,
            }
        });
    }

    if accessible.is_empty() {
        return if is_reference_type {
            Err(ConstructorFailure::NoAccessibleConstructor)
        } else {
            Ok(None)
        };
    }

    accessible.sort_by_key(|ctor| Reverse(ctor.params.len()));
    for ctor in &accessible {
        match try_bind(ctor, members, key_mode) {
            Ok(binding) => return Ok(Some(binding)),
            Err((param, mismatch)) => {
                tracing::trace!(
                    params = ctor.params.len(),
                    param,
                    %mismatch,
                    "constructor rejected"
                );
            }
        }
    }
    Err(ConstructorFailure::NoMatch)
}

/// Bind every parameter of `ctor`, or name the first one that fails.
fn try_bind<'c>(
    ctor: &'c ConstructorDecl,
    members: &[MemberSchema],
    key_mode: KeyMode,
) -> Result<Vec<MemberRef>, (&'c str, ParamMismatch)> {
    ctor.params
        .iter()
        .enumerate()
        .map(|(position, param)| {
            let fail = |mismatch| (param.name.as_str(), mismatch);
            let index = match key_mode {
                KeyMode::Int => find_by_key(members, position),
                KeyMode::String => find_by_name(members, &param.name),
            }
            .map_err(fail)?;

            let member = &members[index];
            if member.declared_type.identity() != param.ty.identity() {
                return Err(fail(ParamMismatch::TypeMismatch));
            }
            if !member.is_readable {
                return Err(fail(ParamMismatch::NotReadable));
            }
            Ok(MemberRef(index))
        })
        .collect()
}

/// Parameter `position` binds to the member keyed `position`.
fn find_by_key(members: &[MemberSchema], position: usize) -> Result<usize, ParamMismatch> {
    let key = i32::try_from(position).map_err(|_| ParamMismatch::MissingMember)?;
    members
        .iter()
        .position(|m| m.key.as_int() == Some(key))
        .ok_or(ParamMismatch::MissingMember)
}

/// A parameter binds to the one member whose string key matches its name,
/// ignoring case.
fn find_by_name(members: &[MemberSchema], name: &str) -> Result<usize, ParamMismatch> {
    let mut matches = members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.key.as_str().is_some_and(|key| eq_ignore_case(key, name)))
        .map(|(index, _)| index);
    match (matches.next(), matches.next()) {
        (Some(index), None) => Ok(index),
        (None, _) => Err(ParamMismatch::MissingMember),
        (Some(_), Some(_)) => Err(ParamMismatch::AmbiguousName),
    }
}

/// Unicode case-insensitive comparison; identifiers are not limited to ASCII.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
