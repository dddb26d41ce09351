//! Statements and variable definitions.
//!
//! ```text
//! block     = "{" { statement } "}"
//! statement = block
//!           | "if" expr statement [ "else" statement ]
//!           | "while" expr statement
//!           | "defer" statement
//!           | "return" [ exprs ] ";"
//!           | "break" ";" | "continue" ";"
//!           | declaration | var_def
//!           | exprs "=" exprs ";"
//!           | expr ";"
//! var_def   = [ "var" ] ident { "," ident }
//!             ( ":=" exprs | ":" [ type ] [ "=" exprs ] ) ";"
//! ```

use c6_diagnostic::ErrorCode;
use c6_ir::{NodeId, NodeKind, Span, TokenKind};

use crate::{PResult, ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_block(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let open = p.expect(TokenKind::LeftBrace)?;
            let mut statements = Vec::new();
            while !p.check(TokenKind::RightBrace) {
                statements.push(p.parse_statement()?);
            }
            let close = p.bump();
            let statements = p.pool.alloc_list(statements);
            Ok(p.pool.alloc(
                NodeKind::Block { statements },
                Span::new(open.span.start, close.span.end),
            ))
        })
    }

    pub(crate) fn parse_statement(&mut self) -> PResult<NodeId> {
        let start = self.peek();
        match start.kind {
            TokenKind::LeftBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Defer => self.parse_defer(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => self.parse_jump(NodeKind::Break),
            TokenKind::Continue => self.parse_jump(NodeKind::Continue),
            TokenKind::Var => self.parse_variable_definition(),
            _ => self
                .first_of(&[
                    Self::parse_declaration,
                    Self::parse_variable_definition,
                    Self::parse_assignment,
                    Self::parse_expression_statement,
                ])
                .map_err(|err| {
                    if err.offset() == start.span.start && !err.code.is_lexical() {
                        self.error_expected(ErrorCode::E1001, "statement", start)
                    } else {
                        err
                    }
                }),
        }
    }

    fn parse_if(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let keyword = p.expect(TokenKind::If)?;
            let condition = p.parse_expr()?;
            let then_branch = p.parse_statement()?;
            let else_branch = if p.eat_if(TokenKind::Else).is_some() {
                p.parse_statement()?
            } else {
                NodeId::INVALID
            };
            let last = if else_branch.is_present() {
                else_branch
            } else {
                then_branch
            };
            let span = Span::new(keyword.span.start, p.pool.span(last).end);
            Ok(p.pool.alloc(
                NodeKind::If {
                    condition,
                    then_branch,
                    else_branch,
                },
                span,
            ))
        })
    }

    fn parse_while(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let keyword = p.expect(TokenKind::While)?;
            let condition = p.parse_expr()?;
            let body = p.parse_statement()?;
            let span = Span::new(keyword.span.start, p.pool.span(body).end);
            Ok(p.pool.alloc(NodeKind::While { condition, body }, span))
        })
    }

    fn parse_defer(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let keyword = p.expect(TokenKind::Defer)?;
            let statement = p.parse_statement()?;
            let span = Span::new(keyword.span.start, p.pool.span(statement).end);
            Ok(p.pool.alloc(NodeKind::Defer { statement }, span))
        })
    }

    fn parse_return(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let keyword = p.expect(TokenKind::Return)?;
            let values = if p.check(TokenKind::Semicolon) {
                Vec::new()
            } else {
                p.parse_expr_list()?
            };
            let semi = p.expect(TokenKind::Semicolon)?;
            let values = p.pool.alloc_list(values);
            Ok(p.pool.alloc(
                NodeKind::Return { values },
                Span::new(keyword.span.start, semi.span.end),
            ))
        })
    }

    /// `break;` and `continue;`.
    fn parse_jump(&mut self, kind: NodeKind) -> PResult<NodeId> {
        self.attempt(|p| {
            let keyword = p.bump();
            let semi = p.expect(TokenKind::Semicolon)?;
            Ok(p.pool.alloc(kind, Span::new(keyword.span.start, semi.span.end)))
        })
    }

    fn parse_assignment(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let targets = p.parse_expr_list()?;
            p.expect(TokenKind::Equal)?;
            let values = p.parse_expr_list()?;
            let semi = p.expect(TokenKind::Semicolon)?;
            let start = p.pool.span(targets[0]).start;
            let targets = p.pool.alloc_list(targets);
            let values = p.pool.alloc_list(values);
            Ok(p.pool.alloc(
                NodeKind::Assignment { targets, values },
                Span::new(start, semi.span.end),
            ))
        })
    }

    fn parse_expression_statement(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let expr = p.parse_expr()?;
            let semi = p.expect(TokenKind::Semicolon)?;
            let span = Span::new(p.pool.span(expr).start, semi.span.end);
            Ok(p.pool.alloc(NodeKind::ExpressionStatement { expr }, span))
        })
    }

    /// `a, b := x, y;` or `a, b: T = x, y;` with an optional leading `var`.
    ///
    /// A type, an initializer list, or both must be present. Initializers,
    /// when given, pair up with the names one to one.
    pub(crate) fn parse_variable_definition(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let keyword = p.eat_if(TokenKind::Var);
            let first = p.expect_identifier()?;
            let start = keyword.map_or(first.span.start, |k| k.span.start);
            let mut names = vec![first];
            while p.eat_if(TokenKind::Comma).is_some() {
                names.push(p.expect_identifier()?);
            }

            let (ty, inits) = if p.eat_if(TokenKind::ColonEqual).is_some() {
                (NodeId::INVALID, p.parse_expr_list()?)
            } else {
                let colon = p.peek();
                if colon.kind != TokenKind::Colon {
                    return Err(p.error_expected(ErrorCode::E1001, "`:` or `:=`", colon));
                }
                p.bump();
                let ty = if p.at_type_start() {
                    p.parse_type()?
                } else {
                    NodeId::INVALID
                };
                let inits = if p.eat_if(TokenKind::Equal).is_some() {
                    p.parse_expr_list()?
                } else {
                    Vec::new()
                };
                if !ty.is_present() && inits.is_empty() {
                    let found = p.peek();
                    return Err(p.error_expected(ErrorCode::E1008, "type or initializer", found));
                }
                (ty, inits)
            };

            if !inits.is_empty() && inits.len() != names.len() {
                let span = p.pool.span(inits[0]).merge(p.pool.span(inits[inits.len() - 1]));
                return Err(ParseError::new(
                    ErrorCode::E1007,
                    span,
                    format!(
                        "{} name(s) declared but {} initializer(s) given",
                        names.len(),
                        inits.len()
                    ),
                ));
            }
            let semi = p.expect(TokenKind::Semicolon)?;

            let mut vars = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                let initializer = inits.get(i).copied().unwrap_or(NodeId::INVALID);
                let end = if initializer.is_present() {
                    p.pool.span(initializer).end
                } else if ty.is_present() {
                    p.pool.span(ty).end
                } else {
                    name.span.end
                };
                vars.push(p.pool.alloc(
                    NodeKind::Var {
                        name: name.span,
                        ty,
                        initializer,
                    },
                    Span::new(name.span.start, end),
                ));
            }
            let vars = p.pool.alloc_list(vars);
            Ok(p.pool.alloc(
                NodeKind::VariableDefinition { vars },
                Span::new(start, semi.span.end),
            ))
        })
    }
}
