//! Parser for the sandbox script language.
//!
//! A recursive-descent parser over the full token list, so arrow functions
//! can be recognised by looking ahead past their parameter list.

use std::rc::Rc;

use evalconsole_foundation::{Error, Result};

use crate::ast::{ArrowDef, BinaryOp, Expr, LogicalOp, Stmt, UnaryOp};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Maximum depth of one expression tree, counting brackets, parentheses,
/// arrow bodies, unary operators and links in operator or call chains.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parses source text into statements.
///
/// # Errors
///
/// Returns a `SyntaxError` if the source cannot be parsed.
pub fn parse(source: &str) -> Result<Vec<Stmt>> {
    Parser::new(source).parse_program()
}

/// Parser for sandbox source code.
pub struct Parser<'src> {
    /// Source text (for arrow function source slices).
    source: &'src str,
    /// All tokens, ending with `Eof`.
    tokens: Vec<Token>,
    /// Index of the current token.
    pos: usize,
    /// Current expression nesting.
    depth: usize,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: Lexer::tokenize_all(source),
            pos: 0,
            depth: 0,
        }
    }

    /// Parses a statement list. Statements end at `;` or a line break.
    ///
    /// # Errors
    ///
    /// Returns a `SyntaxError` if the source cannot be parsed.
    pub fn parse_program(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            while self.eat(&TokenKind::Semicolon) {}
            if self.at(&TokenKind::Eof) {
                break;
            }
            stmts.push(self.parse_statement()?);
            if !self.eat(&TokenKind::Semicolon)
                && !self.at(&TokenKind::Eof)
                && !self.after_line_break()
            {
                return Err(self.unexpected());
            }
        }
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> Result<Stmt> {
        if let TokenKind::Ident(word) = &self.current().kind {
            if matches!(word.as_str(), "let" | "var" | "const") {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(&TokenKind::Assign)?;
                let value = self.parse_expr()?;
                return Ok(Stmt::Declare(name, value));
            }
        }
        Ok(Stmt::Expr(self.parse_expr()?))
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.nested(Self::parse_assignment)
    }

    /// Runs `parse` one level deeper. Chain links counted inside are released
    /// when it returns.
    fn nested(&mut self, parse: fn(&mut Self) -> Result<Expr>) -> Result<Expr> {
        let depth = self.depth;
        let result = self.enter().and_then(|()| parse(self));
        self.depth = depth;
        result
    }

    /// Counts one level of expression depth: a nested expression, a unary
    /// operand, or one more link in an operator or postfix chain.
    fn enter(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::syntax("expression too deeply nested"));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_assignment(&mut self) -> Result<Expr> {
        if let Some(arrow) = self.try_parse_arrow()? {
            return Ok(arrow);
        }

        let target = self.parse_or()?;
        if self.eat(&TokenKind::Assign) {
            if !matches!(target, Expr::Ident(_) | Expr::Member(..) | Expr::Index(..)) {
                return Err(Error::syntax("invalid left-hand side in assignment"));
            }
            let value = self.parse_expr()?;
            return Ok(Expr::Assign(Box::new(target), Box::new(value)));
        }
        Ok(target)
    }

    /// Parses `x => body` or `(a, b) => body` if the upcoming tokens form one.
    fn try_parse_arrow(&mut self) -> Result<Option<Expr>> {
        let start = self.pos;
        let params = match &self.current().kind {
            TokenKind::Ident(name) if self.peek_kind(1) == Some(&TokenKind::Arrow) => {
                let name = name.clone();
                self.advance();
                vec![name]
            }
            TokenKind::LParen => match self.scan_params() {
                Some(params) => params,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };

        self.expect(&TokenKind::Arrow)?;
        let body = self.parse_expr()?;
        let source_start = self.tokens[start].start;
        let source_end = self.tokens[self.pos - 1].end;
        let source = self.source[source_start..source_end].to_string();

        Ok(Some(Expr::Arrow(Rc::new(ArrowDef {
            params,
            body,
            source,
        }))))
    }

    /// Scans `( ident, ... ) =>`, consuming the parameter list only on success.
    fn scan_params(&mut self) -> Option<Vec<String>> {
        let mut offset = 1;
        let mut params = Vec::new();
        loop {
            match self.peek_kind(offset)? {
                TokenKind::RParen => {
                    offset += 1;
                    break;
                }
                TokenKind::Ident(name) => {
                    params.push(name.clone());
                    offset += 1;
                    match self.peek_kind(offset)? {
                        TokenKind::Comma => offset += 1,
                        TokenKind::RParen => {}
                        _ => return None,
                    }
                }
                _ => return None,
            }
        }
        if self.peek_kind(offset) != Some(&TokenKind::Arrow) {
            return None;
        }
        self.pos += offset;
        Some(params)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::OrOr) {
            self.enter()?;
            let right = self.parse_and()?;
            left = Expr::Logical(LogicalOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::AndAnd) {
            self.enter()?;
            let right = self.parse_equality()?;
            left = Expr::Logical(LogicalOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.current().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                _ => return Ok(left),
            };
            self.advance();
            self.enter()?;
            let right = self.parse_comparison()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                _ => return Ok(left),
            };
            self.advance();
            self.enter()?;
            let right = self.parse_additive()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            self.enter()?;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            self.enter()?;
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.current().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.nested(Self::parse_unary)?;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if matches!(
                self.current().kind,
                TokenKind::Dot | TokenKind::LBracket | TokenKind::LParen
            ) {
                self.enter()?;
            }
            if self.eat(&TokenKind::Dot) {
                let name = self.expect_ident()?;
                expr = Expr::Member(Box::new(expr), name);
            } else if self.eat(&TokenKind::LBracket) {
                let index = self.parse_expr()?;
                self.expect(&TokenKind::RBracket)?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else if self.eat(&TokenKind::LParen) {
                let args = self.parse_list(&TokenKind::RParen)?;
                expr = Expr::Call(Box::new(expr), args);
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let kind = self.current().kind.clone();
        match kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Str(s))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(match name.as_str() {
                    "true" => Expr::Bool(true),
                    "false" => Expr::Bool(false),
                    "null" => Expr::Null,
                    "undefined" => Expr::Undefined,
                    _ => Expr::Ident(name),
                })
            }
            TokenKind::LBracket => {
                self.advance();
                Ok(Expr::Array(self.parse_list(&TokenKind::RBracket)?))
            }
            TokenKind::LBrace => {
                self.advance();
                self.parse_object()
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parses comma-separated expressions up to `close`. Trailing commas are allowed.
    fn parse_list(&mut self, close: &TokenKind) -> Result<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.eat(close) {
            items.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(close)?;
                break;
            }
        }
        Ok(items)
    }

    /// Parses the body of an object literal after `{`.
    fn parse_object(&mut self) -> Result<Expr> {
        let mut props = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            let key = match self.current().kind.clone() {
                TokenKind::Ident(name) | TokenKind::Str(name) => name,
                TokenKind::Number(n) => evalconsole_render::format_number(n),
                _ => return Err(self.unexpected()),
            };
            self.advance();
            self.expect(&TokenKind::Colon)?;
            props.push((key, self.parse_expr()?));
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace)?;
                break;
            }
        }
        Ok(Expr::Object(props))
    }

    fn current(&self) -> &Token {
        // The token list always ends with Eof and `pos` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// True if a newline separates the current token from the previous one.
    fn after_line_break(&self) -> bool {
        let Some(prev) = self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) else {
            return false;
        };
        self.source
            .get(prev.end..self.current().start)
            .is_some_and(|gap| gap.contains('\n'))
    }

    fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        if let TokenKind::Ident(name) = &self.current().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> Error {
        match &self.current().kind {
            TokenKind::Error(msg) => Error::syntax(msg.clone()),
            TokenKind::Eof => Error::syntax("unexpected end of input"),
            other => Error::syntax(format!("unexpected {}", other.name())),
        }
    }
}
