//! Generated codec names.

use mpgen_ir::{TypeDecl, TypeRef};

/// Name of the generated codec type for an object or enum.
///
/// Generic definitions keep their bare name; other types join their
/// containing types with `_` (`Outer_Inner`).
pub(super) fn codec_name(decl: &TypeDecl) -> String {
    if decl.is_generic() {
        decl.simple_name().to_string()
    } else {
        decl.relative_name().replace('.', "_")
    }
}

/// Comma-joined canonical renderings of type arguments.
pub(super) fn render_args(args: &[TypeRef]) -> String {
    args.iter()
        .map(|arg| arg.identity().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Codec expression for a user generic type: `Formatters::Demo.BoxFormatter<int>`.
pub(super) fn user_generic_codec(decl: &TypeDecl, args: &[TypeRef]) -> String {
    let mut codec = String::from("Formatters::");
    if let Some(namespace) = &decl.namespace {
        codec.push_str(namespace);
        codec.push('.');
    }
    codec.push_str(decl.simple_name());
    codec.push_str("Formatter<");
    codec.push_str(&render_args(args));
    codec.push('>');
    codec
}
