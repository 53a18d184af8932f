//! Union classification.

use mpgen_diagnostic::{Diagnostic, ErrorCode, Subject};
use mpgen_ir::{Attribute, TypeDecl, TypeDescriptor, TypeIdentity, TypeRef};
use rustc_hash::FxHashMap;

use super::{Edge, Resolved};
use crate::{CollectError, UnionCase, UnionSchema};

/// Resolve the tagged subtypes of a union base.
///
/// Subtypes are ordered by discriminator. A discriminator used twice keeps
/// its first subtype and reports the rest; a subtype that does not derive
/// from the base is reported but kept.
pub(super) fn resolve<D: TypeDescriptor>(
    descriptor: &D,
    ty: &TypeRef,
    identity: &TypeIdentity,
    decl: &TypeDecl,
) -> Result<Resolved<UnionSchema>, CollectError> {
    let mut declared: Vec<(i32, &TypeRef)> = Attribute::unions(&decl.attributes).collect();
    if declared.is_empty() {
        return Err(CollectError::MissingUnionDeclaration {
            identity: identity.clone(),
        });
    }
    declared.sort_by_key(|(discriminator, _)| *discriminator);

    let mut claimed: FxHashMap<i32, &TypeRef> = FxHashMap::default();
    let mut subtypes = Vec::with_capacity(declared.len());
    let mut edges = Vec::with_capacity(declared.len());
    let mut diagnostics = Vec::new();

    for (discriminator, subtype) in declared {
        if let Some(first) = claimed.get(&discriminator) {
            diagnostics.push(
                Diagnostic::error(ErrorCode::M4002)
                    .with_message(format!(
                        "discriminator {discriminator} of `{identity}` is declared for both `{first}` and `{subtype}`"
                    ))
                    .with_label(
                        Subject::member(identity.as_str(), subtype.to_string()),
                        format!("discriminator {discriminator} already taken"),
                    )
                    .with_secondary_label(
                        Subject::member(identity.as_str(), first.to_string()),
                        "first declared here",
                    ),
            );
            continue;
        }
        claimed.insert(discriminator, subtype);

        if !descriptor.is_subtype_of(subtype, ty) {
            diagnostics.push(
                Diagnostic::error(ErrorCode::M4003)
                    .with_message(format!("`{subtype}` does not derive from `{identity}`"))
                    .with_label(
                        Subject::member(identity.as_str(), subtype.to_string()),
                        format!("declared as subtype {discriminator}"),
                    ),
            );
        }

        subtypes.push(UnionCase {
            discriminator,
            subtype: subtype.identity(),
        });
        edges.push(Edge::ty(subtype));
    }

    let schema = UnionSchema {
        identity: identity.clone(),
        subtypes,
        codec_name: decl.simple_name().to_string(),
        namespace: decl.namespace.clone(),
        diagnostics,
    };
    Ok(Resolved { schema, edges })
}
