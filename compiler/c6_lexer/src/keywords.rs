//! Reserved words and directives.
//!
//! Lookup is an exact match on the whole identifier, so `structx` stays an
//! identifier.

use c6_ir::TokenKind;

/// Keyword for `ident`, if reserved.
pub(crate) fn lookup(ident: &[u8]) -> Option<TokenKind> {
    Some(match ident {
        b"if" => TokenKind::If,
        b"else" => TokenKind::Else,
        b"while" => TokenKind::While,
        b"struct" => TokenKind::Struct,
        b"func" => TokenKind::Func,
        b"var" => TokenKind::Var,
        b"defer" => TokenKind::Defer,
        b"return" => TokenKind::Return,
        b"break" => TokenKind::Break,
        b"continue" => TokenKind::Continue,
        b"nil" => TokenKind::Nil,
        _ => return None,
    })
}

/// Directive for the name following `#`.
pub(crate) fn lookup_directive(name: &[u8]) -> Option<TokenKind> {
    match name {
        b"load" => Some(TokenKind::Load),
        b"foreign" => Some(TokenKind::Foreign),
        b"opaque" => Some(TokenKind::Opaque),
        b"extern" => Some(TokenKind::Extern),
        b"export_scope" => Some(TokenKind::ExportScope),
        b"module_scope" => Some(TokenKind::ModuleScope),
        _ => None,
    }
}
