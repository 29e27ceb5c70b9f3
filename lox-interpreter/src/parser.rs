use lox_core::{Token, Type};
use tracing::debug;

use crate::ast::{Expr, Stmt};
use crate::error::Error;
use crate::limits::MAX_NESTING_DEPTH;

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    depth: usize,

    // Syntax errors don't stop the parser, each one aborts a single declaration only
    errors: Vec<Error>,
}

/// Statements and syntax errors of a whole program. Statements that failed to parse are not
/// in `statements`, the ones around them are.
#[derive(Debug, PartialEq)]
pub struct Parsed {
    pub statements: Vec<Stmt>,
    pub errors: Vec<Error>,
}

impl Parsed {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// Helper alias for shorter return types
type BlockResult = Result<Vec<Stmt>, Error>;
type StmtResult = Result<Stmt, Error>;
type ExprResult = Result<Expr, Error>;

impl<'a> Parser<'a> {
    /// `tokens` must end with an `Eof` token, as every scanned stream does.
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(matches!(tokens.last(), Some(token) if token.ty == Type::Eof));
        Parser {
            tokens,
            current: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Parsed {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        Parsed {
            statements,
            errors: self.errors,
        }
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let res = if self.match_one(Type::Var) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match res {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.errors.push(err);
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> StmtResult {
        let name = self
            .consume(Type::Identifier, "Expect variable name.")?
            .clone();

        let mut init = None;
        if self.match_one(Type::Equal) {
            init = Some(self.expression()?);
        }

        self.consume(Type::SemiColon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::var(name, init))
    }

    fn statement(&mut self) -> StmtResult {
        self.nested(|parser| {
            if parser.match_one(Type::If) {
                parser.if_statement()
            } else if parser.match_one(Type::Print) {
                parser.print_statement()
            } else if parser.match_one(Type::LeftBrace) {
                Ok(Stmt::block(parser.block()?))
            } else {
                parser.expression_statement()
            }
        })
    }

    fn block(&mut self) -> BlockResult {
        let mut stmts = Vec::new();
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                stmts.push(stmt);
            }
        }
        self.consume(Type::RightBrace, "Expect '}' after block.")?;
        Ok(stmts)
    }

    fn expression_statement(&mut self) -> StmtResult {
        let expr = self.expression()?;
        self.consume(Type::SemiColon, "Expect ';' after expression.")?;
        Ok(Stmt::expression(expr))
    }

    fn if_statement(&mut self) -> StmtResult {
        self.consume(Type::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after if condition.")?;

        // The else is attached to the innermost `if`, the one whose branch was just parsed
        let then_branch = self.statement()?;
        let mut else_branch = None;
        if self.match_one(Type::Else) {
            else_branch = Some(self.statement()?);
        }

        Ok(Stmt::if_(condition, then_branch, else_branch))
    }

    fn print_statement(&mut self) -> StmtResult {
        let expr = self.expression()?;
        self.consume(Type::SemiColon, "Expect ';' after value.")?;
        Ok(Stmt::print(expr))
    }

    fn expression(&mut self) -> ExprResult {
        self.nested(|parser| parser.assignment())
    }

    fn assignment(&mut self) -> ExprResult {
        let expr = self.or_expression()?;
        if self.match_one(Type::Equal) {
            let equals = self.previous().clone();
            let value = self.nested(|parser| parser.assignment())?;

            match expr {
                Expr::Variable { name } => Ok(Expr::assign(name, value)),
                // Not worth aborting the declaration over, the parser is not confused
                expr => {
                    self.errors
                        .push(Error::syntax(&equals, "Invalid assignment target."));
                    Ok(expr)
                }
            }
        } else {
            Ok(expr)
        }
    }

    fn or_expression(&mut self) -> ExprResult {
        let mut expr = self.and_expression()?;
        while self.match_one(Type::Or) {
            let operator = self.previous().clone();
            let right = self.and_expression()?;
            expr = Expr::logical(expr, operator, right);
        }
        Ok(expr)
    }

    fn and_expression(&mut self) -> ExprResult {
        let mut expr = self.equality()?;
        while self.match_one(Type::And) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::logical(expr, operator, right);
        }
        Ok(expr)
    }

    fn equality(&mut self) -> ExprResult {
        let mut expr = self.comparison()?;
        while self.match_either(&[Type::BangEqual, Type::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> ExprResult {
        let mut expr = self.term()?;
        while self.match_either(&[
            Type::Greater,
            Type::GreaterEqual,
            Type::Less,
            Type::LessEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> ExprResult {
        let mut expr = self.factor()?;
        while self.match_either(&[Type::Plus, Type::Minus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> ExprResult {
        let mut expr = self.unary()?;
        while self.match_either(&[Type::Slash, Type::Star]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ExprResult {
        if self.match_either(&[Type::Bang, Type::Minus]) {
            let operator = self.previous().clone();
            let right = self.nested(|parser| parser.unary())?;
            Ok(Expr::unary(operator, right))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> ExprResult {
        if self.match_one(Type::True) {
            Ok(Expr::literal(true))
        } else if self.match_one(Type::False) {
            Ok(Expr::literal(false))
        } else if self.match_one(Type::Nil) {
            Ok(Expr::nil())
        } else if self.match_either(&[Type::Number, Type::String]) {
            match &self.previous().literal {
                Some(literal) => Ok(Expr::literal(literal.clone())),
                None => Err(Error::syntax(self.previous(), "Unexpected token.")),
            }
        } else if self.match_one(Type::LeftParen) {
            let expr = self.expression()?;
            self.consume(Type::RightParen, "Expect ')' after expression.")?;
            Ok(Expr::grouping(expr))
        } else if self.match_one(Type::Identifier) {
            Ok(Expr::variable(self.previous().clone()))
        } else {
            Err(Error::syntax(self.peek(), "Unexpected token."))
        }
    }

    // Runs `f` one nesting level deeper, refusing to go past `MAX_NESTING_DEPTH`
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::syntax(self.peek(), "Too much nesting."));
        }

        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    fn is_at_end(&self) -> bool {
        self.peek().ty == Type::Eof
    }

    fn check(&self, ty: Type) -> bool {
        if self.is_at_end() {
            false
        } else {
            self.peek().ty == ty
        }
    }

    fn consume(&mut self, ty: Type, msg: &str) -> Result<&Token, Error> {
        if self.check(ty) {
            Ok(self.advance())
        } else {
            Err(Error::syntax(self.peek(), msg))
        }
    }

    // Discards tokens until the end of the broken statement, so that a single mistake is
    // reported once instead of cascading into the statements after it.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().ty == Type::SemiColon || self.peek().ty.starts_statement() {
                return;
            }

            self.advance();
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn match_either(&mut self, types: &[Type]) -> bool {
        for ty in types {
            if self.match_one(*ty) {
                // Already skipped in the `match_one`, just return result
                return true;
            }
        }

        false
    }

    fn match_one(&mut self, ty: Type) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }
}
