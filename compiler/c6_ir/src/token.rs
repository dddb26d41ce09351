//! Token types produced by the lexer.

use super::Span;
use std::fmt;

/// A token: a kind plus the byte range it covers.
///
/// Tokens own no string data; the text is recovered by slicing the source
/// with [`Token::span`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

crate::static_assert_size!(Token, 12);

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Start offset of the token.
    #[inline]
    pub const fn offset(&self) -> u32 {
        self.span.start
    }

    /// Text of the token in `source`.
    #[inline]
    pub fn text(self, source: &str) -> &str {
        self.span.text(source)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds.
///
/// Lexical errors are kinds too: the lexer never fails, it hands the
/// parser an error token and the parser turns it into a hard failure.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum TokenKind {
    // Literals and names
    Identifier,
    Number,
    StringLiteral,

    // Keywords
    If,
    Else,
    While,
    Struct,
    Func,
    Var,
    Defer,
    Return,
    Break,
    Continue,
    Nil,

    // Directives
    Load,
    Foreign,
    Opaque,
    Extern,
    ExportScope,
    ModuleScope,

    // Punctuation
    ColonColon,
    ColonEqual,
    Colon,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Equal,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    ShiftLeft,
    ShiftRight,
    AmpAmp,
    PipePipe,

    // Lexical errors
    UnexpectedSequenceOfChars,
    UnterminatedString,
    NewlineInString,
    UnknownEscapeSequence,
    UnknownDirective,

    Eof,
}

impl TokenKind {
    /// Whether this kind reports a lexical error.
    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            TokenKind::UnexpectedSequenceOfChars
                | TokenKind::UnterminatedString
                | TokenKind::NewlineInString
                | TokenKind::UnknownEscapeSequence
                | TokenKind::UnknownDirective
        )
    }

    /// Human-readable name used in diagnostics.
    pub const fn display_name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::Struct => "`struct`",
            TokenKind::Func => "`func`",
            TokenKind::Var => "`var`",
            TokenKind::Defer => "`defer`",
            TokenKind::Return => "`return`",
            TokenKind::Break => "`break`",
            TokenKind::Continue => "`continue`",
            TokenKind::Nil => "`nil`",
            TokenKind::Load => "`#load`",
            TokenKind::Foreign => "`#foreign`",
            TokenKind::Opaque => "`#opaque`",
            TokenKind::Extern => "`#extern`",
            TokenKind::ExportScope => "`#export_scope`",
            TokenKind::ModuleScope => "`#module_scope`",
            TokenKind::ColonColon => "`::`",
            TokenKind::ColonEqual => "`:=`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Ellipsis => "`...`",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::LeftBrace => "`{`",
            TokenKind::RightBrace => "`}`",
            TokenKind::LeftBracket => "`[`",
            TokenKind::RightBracket => "`]`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Ampersand => "`&`",
            TokenKind::Pipe => "`|`",
            TokenKind::Caret => "`^`",
            TokenKind::Tilde => "`~`",
            TokenKind::Bang => "`!`",
            TokenKind::Equal => "`=`",
            TokenKind::EqualEqual => "`==`",
            TokenKind::BangEqual => "`!=`",
            TokenKind::Less => "`<`",
            TokenKind::LessEqual => "`<=`",
            TokenKind::Greater => "`>`",
            TokenKind::GreaterEqual => "`>=`",
            TokenKind::ShiftLeft => "`<<`",
            TokenKind::ShiftRight => "`>>`",
            TokenKind::AmpAmp => "`&&`",
            TokenKind::PipePipe => "`||`",
            TokenKind::UnexpectedSequenceOfChars => "unexpected characters",
            TokenKind::UnterminatedString => "unterminated string literal",
            TokenKind::NewlineInString => "newline in string literal",
            TokenKind::UnknownEscapeSequence => "unknown escape sequence",
            TokenKind::UnknownDirective => "unknown directive",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
