#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(source);
    let mut out = Vec::new();
    loop {
        let token = lexer.eat();
        out.push(token.kind);
        if token.kind == TokenKind::Eof || token.kind.is_error() {
            return out;
        }
    }
}

#[test]
fn test_offsets_and_reset() {
    let mut lexer = Lexer::new("1 + 2");
    let first = lexer.eat();
    let plus = lexer.eat();
    let two = lexer.eat();
    assert_eq!(
        [first.span.start, plus.span.start, two.span.start],
        [0, 2, 4]
    );
    assert_eq!(lexer.eat().kind, TokenKind::Eof);

    lexer.reset(first);
    let again: Vec<u32> = (0..3).map(|_| lexer.eat().span.start).collect();
    assert_eq!(again, vec![0, 2, 4]);
}

#[test]
fn test_peek_is_stable() {
    let mut lexer = Lexer::new("foo bar");
    let a = lexer.peek();
    assert_eq!(lexer.peek(), a);
    assert_eq!(lexer.eat(), a);
    assert_eq!(lexer.peek().text("foo bar"), "bar");
    assert_eq!(lexer.position(), 4);
}

#[test]
fn test_keyword_vs_identifier() {
    assert_eq!(kinds("struct"), vec![TokenKind::Struct, TokenKind::Eof]);
    let mut lexer = Lexer::new("structx");
    let token = lexer.eat();
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(lexer.text(token.span), "structx");
    assert_eq!(
        kinds("if else while func var defer return break continue nil"),
        vec![
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Func,
            TokenKind::Var,
            TokenKind::Defer,
            TokenKind::Return,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Nil,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_struct_declaration() {
    let src = "MyStruct :: struct {\n\tfield1: type1;\n}\n";
    let tokens = tokenize(src).unwrap();
    let summary: Vec<(TokenKind, &str)> = tokens.iter().map(|t| (t.kind, t.text(src))).collect();
    assert_eq!(
        summary,
        vec![
            (TokenKind::Identifier, "MyStruct"),
            (TokenKind::ColonColon, "::"),
            (TokenKind::Struct, "struct"),
            (TokenKind::LeftBrace, "{"),
            (TokenKind::Identifier, "field1"),
            (TokenKind::Colon, ":"),
            (TokenKind::Identifier, "type1"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::RightBrace, "}"),
            (TokenKind::Eof, ""),
        ]
    );
    assert_eq!(tokens.last().unwrap().span, Span::point(39));
}

#[test]
fn test_longest_operator_match() {
    assert_eq!(
        kinds(":: := : == = != ! <= << < >= >> > && & || | ..."),
        vec![
            TokenKind::ColonColon,
            TokenKind::ColonEqual,
            TokenKind::Colon,
            TokenKind::EqualEqual,
            TokenKind::Equal,
            TokenKind::BangEqual,
            TokenKind::Bang,
            TokenKind::LessEqual,
            TokenKind::ShiftLeft,
            TokenKind::Less,
            TokenKind::GreaterEqual,
            TokenKind::ShiftRight,
            TokenKind::Greater,
            TokenKind::AmpAmp,
            TokenKind::Ampersand,
            TokenKind::PipePipe,
            TokenKind::Pipe,
            TokenKind::Ellipsis,
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("+-*/%^~;,()[]{}."),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Caret,
            TokenKind::Tilde,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
            TokenKind::Dot,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_number_trailing_dot() {
    let src = "5.(f32) 1.25 7.x";
    let tokens = tokenize(src).unwrap();
    let summary: Vec<&str> = tokens.iter().map(|t| t.text(src)).collect();
    assert_eq!(
        summary,
        vec!["5", ".", "(", "f32", ")", "1.25", "7", ".", "x", ""]
    );
}

#[test]
fn test_comments_are_skipped() {
    let src = "a // comment := \"\n// another\nb";
    assert_eq!(
        kinds(src),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
    );
    assert_eq!(kinds("x / y"), vec![
        TokenKind::Identifier,
        TokenKind::Slash,
        TokenKind::Identifier,
        TokenKind::Eof
    ]);
}

#[test]
fn test_string_literal() {
    let src = r#"s := "a\"b\n";"#;
    let tokens = tokenize(src).unwrap();
    assert_eq!(tokens[2].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[2].text(src), r#""a\"b\n""#);
    assert_eq!(tokens[3].kind, TokenKind::Semicolon);
}

#[test]
fn test_directives() {
    assert_eq!(
        kinds("#load #foreign"),
        vec![TokenKind::Load, TokenKind::Foreign, TokenKind::Eof]
    );
    assert_eq!(
        kinds("#opaque #extern #export_scope #module_scope #externs"),
        vec![
            TokenKind::Opaque,
            TokenKind::Extern,
            TokenKind::ExportScope,
            TokenKind::ModuleScope,
            TokenKind::UnknownDirective
        ]
    );
    let err = tokenize("#import \"x\"").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0006);
    assert_eq!(err.message, "unknown directive `#import`");
    assert_eq!(err.span, Span::new(0, 7));
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("x := \"abc").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0001);
    assert_eq!(err.span, Span::new(5, 9));
}

#[test]
fn test_newline_in_string() {
    let err = tokenize("x := \"ab\nc\"").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0004);
    assert_eq!(err.span.start, 5);
}

#[test]
fn test_unknown_escape() {
    let err = tokenize(r#""ok\q""#).unwrap_err();
    assert_eq!(err.code, ErrorCode::E0005);
    assert_eq!(err.message, r"unknown escape sequence `\q`");
    assert_eq!(err.span, Span::new(3, 5));
}

#[test]
fn test_unexpected_characters() {
    assert_eq!(
        kinds("a @"),
        vec![TokenKind::Identifier, TokenKind::UnexpectedSequenceOfChars]
    );
    let err = tokenize("é").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0002);
    assert_eq!(err.span, Span::new(0, 2));
    assert_eq!(err.message, "unexpected character `é`");
}

#[test]
fn test_eof_is_sticky() {
    let mut lexer = Lexer::new("  ");
    assert_eq!(lexer.eat().kind, TokenKind::Eof);
    assert_eq!(lexer.eat().kind, TokenKind::Eof);
    assert_eq!(lexer.peek().span, Span::point(2));
}

#[test]
fn test_lex_error_diagnostic() {
    let err = tokenize("$").unwrap_err();
    let diag = err.to_diagnostic(FileIndex::new(3));
    assert_eq!(diag.file, FileIndex::new(3));
    assert_eq!(diag.code, ErrorCode::E0002);
}

fn source_strategy() -> impl Strategy<Value = String> {
    let atoms = prop::sample::select(vec![
        "a", "x1", "_y", "if", "struct", "42", "3.5", "\"s\"", "::", ":=", ":", "(", ")", "{", "}",
        "+", "-", "*", "<<", "<=", "==", "!", ".", "...", ";", ",", "#load", "// c\n",
    ]);
    let seps = prop::sample::select(vec![" ", "\n", "\t", ""]);
    prop::collection::vec((atoms, seps), 0..24).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(a, s)| format!("{a}{s}"))
            .collect::<String>()
    })
}

proptest! {
    #[test]
    fn prop_peek_then_eat_agree(src in source_strategy()) {
        let mut lexer = Lexer::new(&src);
        for _ in 0..64 {
            let peeked = lexer.peek();
            prop_assert_eq!(lexer.peek(), peeked);
            let eaten = lexer.eat();
            prop_assert_eq!(eaten, peeked);
            prop_assert!(eaten.span.start <= eaten.span.end);
            if eaten.kind == TokenKind::Eof {
                break;
            }
        }
    }

    #[test]
    fn prop_reset_replays_stream(src in source_strategy(), pick in 0usize..32) {
        let Ok(tokens) = tokenize(&src) else {
            return Ok(());
        };
        let pick = pick % tokens.len();
        let mut lexer = Lexer::new(&src);
        for _ in 0..tokens.len() {
            lexer.eat();
        }
        lexer.reset(tokens[pick]);
        for expected in &tokens[pick..] {
            prop_assert_eq!(lexer.eat(), *expected);
        }
    }

    #[test]
    fn prop_next_token_is_pure(src in source_strategy(), offset in 0usize..64) {
        let offset = u32::try_from(offset.min(src.len())).unwrap();
        prop_assert_eq!(
            next_token(src.as_bytes(), offset),
            next_token(src.as_bytes(), offset)
        );
    }
}
