//! Files and declarations.
//!
//! ```text
//! file        = { "#load" string ";" | declaration | var_def }
//! declaration = ident "::" ( struct | func | expr ";" )
//! struct      = "struct" "{" { var_def } "}"
//! func        = "func" "(" params ")" [ returns ] ( block | "#foreign" [ string ] ";" )
//! params      = [ group { "," group } ] [ "," "..." ]  |  "..."
//! group       = ident { "," ident } ":" type
//! returns     = type | "(" [ type { "," type } ] ")"
//! ```

use c6_diagnostic::ErrorCode;
use c6_ir::{NodeFlags, NodeId, NodeKind, Span, Token, TokenKind};

use crate::{PResult, ParseError, Parser};

/// Contents of a string literal token, quotes excluded.
fn unquoted(token: Token) -> Span {
    Span::new(token.span.start + 1, token.span.end - 1)
}

impl Parser<'_> {
    pub(crate) fn parse_file(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let mut declarations = Vec::new();
            while !p.check(TokenKind::Eof) {
                declarations.push(p.parse_top_level()?);
            }
            let declarations = p.pool.alloc_list(declarations);
            let span = Span::new(0, p.source_len());
            Ok(p.pool.alloc(NodeKind::File { declarations }, span))
        })
    }

    fn parse_top_level(&mut self) -> PResult<NodeId> {
        let start = self.peek();
        if start.kind == TokenKind::Load {
            return self.parse_load();
        }
        self.first_of(&[Self::parse_declaration, Self::parse_variable_definition])
            .map_err(|err| {
                if err.offset() == start.span.start && !err.code.is_lexical() {
                    self.error_expected(ErrorCode::E1009, "declaration", start)
                } else {
                    err
                }
            })
    }

    fn parse_load(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let directive = p.expect(TokenKind::Load)?;
            let path = p.expect(TokenKind::StringLiteral)?;
            let semi = p.expect(TokenKind::Semicolon)?;
            Ok(p.pool.alloc(
                NodeKind::LoadDirective {
                    path: unquoted(path),
                },
                Span::new(directive.span.start, semi.span.end),
            ))
        })
    }

    /// `name :: thing`. Structs and functions take the name themselves;
    /// anything else becomes a `Const`.
    pub(crate) fn parse_declaration(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let name = p.expect_identifier()?;
            p.expect(TokenKind::ColonColon)?;
            let value = p.first_of(&[Self::parse_struct, Self::parse_function, Self::parse_expr])?;

            let node = p.pool.get_mut(value);
            if let NodeKind::Struct { name: slot, .. } | NodeKind::Function { name: slot, .. } =
                &mut node.kind
            {
                *slot = Some(name.span);
                node.span = Span::new(name.span.start, node.span.end);
                return Ok(value);
            }

            let semi = p.expect(TokenKind::Semicolon)?;
            Ok(p.pool.alloc(
                NodeKind::Const {
                    name: name.span,
                    value,
                },
                Span::new(name.span.start, semi.span.end),
            ))
        })
    }

    fn parse_struct(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let keyword = p.expect(TokenKind::Struct)?;
            p.expect(TokenKind::LeftBrace)?;
            let mut members = Vec::new();
            while !p.check(TokenKind::RightBrace) {
                members.push(p.parse_variable_definition()?);
            }
            let close = p.bump();
            let members = p.pool.alloc_list(members);
            Ok(p.pool.alloc(
                NodeKind::Struct {
                    name: None,
                    members,
                },
                Span::new(keyword.span.start, close.span.end),
            ))
        })
    }

    fn parse_function(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let keyword = p.expect(TokenKind::Func)?;
            p.expect(TokenKind::LeftParen)?;
            let (params, variadic) = p.parse_params()?;
            let returns = p.parse_returns()?;

            let mut flags = NodeFlags::empty();
            if variadic {
                flags |= NodeFlags::VARIADIC;
            }

            let (body, library, end) = if p.eat_if(TokenKind::Foreign).is_some() {
                flags |= NodeFlags::FOREIGN;
                let library = p.eat_if(TokenKind::StringLiteral).map(unquoted);
                let semi = p.expect(TokenKind::Semicolon)?;
                (NodeId::INVALID, library, semi.span.end)
            } else {
                let next = p.peek();
                if next.kind != TokenKind::LeftBrace {
                    return Err(p.error_expected(
                        ErrorCode::E1006,
                        "function body or `#foreign`",
                        next,
                    ));
                }
                let body = p.parse_block()?;
                (body, None, p.pool.span(body).end)
            };

            let params = p.pool.alloc_list(params);
            let returns = p.pool.alloc_list(returns);
            let func = p.pool.alloc(
                NodeKind::Function {
                    name: None,
                    params,
                    returns,
                    body,
                    library,
                },
                Span::new(keyword.span.start, end),
            );
            p.pool.get_mut(func).flags = flags;
            Ok(func)
        })
    }

    /// Parameters after `(`, through the closing `)`. Returns the `Var`
    /// nodes and whether the list ended in `...`.
    fn parse_params(&mut self) -> PResult<(Vec<NodeId>, bool)> {
        let mut params = Vec::new();
        if self.eat_if(TokenKind::RightParen).is_some() {
            return Ok((params, false));
        }
        loop {
            if let Some(dots) = self.eat_if(TokenKind::Ellipsis) {
                if self.eat_if(TokenKind::RightParen).is_none() {
                    return Err(ParseError::new(
                        ErrorCode::E1005,
                        dots.span,
                        "variadic `...` must be the last parameter",
                    ));
                }
                return Ok((params, true));
            }
            self.parse_param_group(&mut params)?;
            if self.eat_if(TokenKind::Comma).is_none() {
                self.expect(TokenKind::RightParen)?;
                return Ok((params, false));
            }
        }
    }

    /// `a, b: T`. Every name in the group gets the same type node.
    fn parse_param_group(&mut self, params: &mut Vec<NodeId>) -> PResult<()> {
        let mut names = vec![self.expect_identifier()?];
        while self.eat_if(TokenKind::Comma).is_some() {
            names.push(self.expect_identifier()?);
        }
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let end = self.pool.span(ty).end;
        for name in names {
            params.push(self.pool.alloc(
                NodeKind::Var {
                    name: name.span,
                    ty,
                    initializer: NodeId::INVALID,
                },
                Span::new(name.span.start, end),
            ));
        }
        Ok(())
    }

    fn parse_returns(&mut self) -> PResult<Vec<NodeId>> {
        if self.eat_if(TokenKind::LeftParen).is_some() {
            let mut types = Vec::new();
            if self.eat_if(TokenKind::RightParen).is_some() {
                return Ok(types);
            }
            types.push(self.parse_type()?);
            while self.eat_if(TokenKind::Comma).is_some() {
                types.push(self.parse_type()?);
            }
            self.expect(TokenKind::RightParen)?;
            return Ok(types);
        }
        if self.at_type_start() {
            return Ok(vec![self.parse_type()?]);
        }
        Ok(Vec::new())
    }
}
