use crate::ast::{Expr, Stmt};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::token::{Literal, Token, TokenKind};
use crate::value::Value;

/// Statements that parsed cleanly plus every syntax error met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub statements: Vec<Stmt>,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

type ParseOutcome<T> = Result<T, SyntaxError>;

/// Recursive-descent parser over a scanned token stream.
///
/// A failing declaration is recorded and skipped by `synchronize`, so one run
/// reports every independent error in the input.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<SyntaxError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let (line, offset) = tokens
                .last()
                .map(|t| (t.line, t.span.end))
                .unwrap_or((1, 0));
            tokens.push(Token::eof(line, offset));
        }
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> ParseResult {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        ParseResult {
            statements,
            errors: self.errors,
        }
    }

    /// Parses a single expression followed by end of input.
    pub fn parse_expression(mut self) -> Result<Expr, Vec<SyntaxError>> {
        let parsed = self.expression().and_then(|expr| {
            if self.is_at_end() {
                Ok(expr)
            } else {
                Err(self.error_at_current("Expect end of expression."))
            }
        });
        match parsed {
            Ok(expr) if self.errors.is_empty() => Ok(expr),
            Ok(_) => Err(self.errors),
            Err(error) => {
                self.errors.push(error);
                Err(self.errors)
            }
        }
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.matches(&[TokenKind::Var]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.errors.push(error);
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> ParseOutcome<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;
        let initializer = if self.matches(&[TokenKind::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> ParseOutcome<Stmt> {
        if self.matches(&[TokenKind::If]) {
            return self.if_statement();
        }
        if self.matches(&[TokenKind::Print]) {
            return self.print_statement();
        }
        if self.matches(&[TokenKind::While]) {
            return self.while_statement();
        }
        if self.matches(&[TokenKind::LeftBrace]) {
            return Ok(Stmt::Block(self.block()?));
        }
        self.expression_statement()
    }

    fn if_statement(&mut self) -> ParseOutcome<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        // A dangling else belongs to the nearest if.
        let else_branch = if self.matches(&[TokenKind::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn print_statement(&mut self) -> ParseOutcome<Stmt> {
        let keyword = self.previous().clone();
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print { keyword, expr })
    }

    fn while_statement(&mut self) -> ParseOutcome<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after while condition.")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body })
    }

    fn block(&mut self) -> ParseOutcome<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> ParseOutcome<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    fn expression(&mut self) -> ParseOutcome<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseOutcome<Expr> {
        let expr = self.or()?;

        if self.matches(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            if let Expr::Variable(name) = expr {
                return Ok(Expr::assign(name, value));
            }
            // Reported without unwinding: the statement is still well formed.
            self.errors.push(SyntaxError::at_token(
                SyntaxErrorKind::InvalidAssignmentTarget,
                &equals,
                "Invalid assignment target.",
            ));
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseOutcome<Expr> {
        let mut expr = self.and()?;
        while self.matches(&[TokenKind::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::logical(expr, operator, right);
        }
        Ok(expr)
    }

    fn and(&mut self) -> ParseOutcome<Expr> {
        let mut expr = self.equality()?;
        while self.matches(&[TokenKind::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::logical(expr, operator, right);
        }
        Ok(expr)
    }

    fn equality(&mut self) -> ParseOutcome<Expr> {
        let mut expr = self.comparison()?;
        while self.matches(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> ParseOutcome<Expr> {
        let mut expr = self.term()?;
        while self.matches(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> ParseOutcome<Expr> {
        let mut expr = self.factor()?;
        while self.matches(&[TokenKind::Minus, TokenKind::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> ParseOutcome<Expr> {
        let mut expr = self.unary()?;
        while self.matches(&[TokenKind::Slash, TokenKind::Star]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ParseOutcome<Expr> {
        if self.matches(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let operand = self.unary()?;
            return Ok(Expr::unary(operator, operand));
        }
        self.primary()
    }

    fn primary(&mut self) -> ParseOutcome<Expr> {
        let token = self.peek().clone();
        let expr = match token.kind {
            TokenKind::False => Expr::Literal(Value::Bool(false)),
            TokenKind::True => Expr::Literal(Value::Bool(true)),
            TokenKind::Nil => Expr::Literal(Value::Nil),
            TokenKind::Number | TokenKind::String => Expr::Literal(literal_value(&token)),
            TokenKind::Identifier => Expr::Variable(token),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
                return Ok(Expr::grouping(inner));
            }
            _ => return Err(self.error_at_current("Expect expression.")),
        };
        self.advance();
        Ok(expr)
    }

    // Token stream primitives

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|kind| self.check(*kind)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseOutcome<Token> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.error_at_current(message))
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.current.min(last)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn error_at_current(&self, message: &str) -> SyntaxError {
        SyntaxError::at_token(SyntaxErrorKind::UnexpectedToken, self.peek(), message)
    }

    /// Discards tokens until a likely statement boundary.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            if self.peek().kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }
}

fn literal_value(token: &Token) -> Value {
    match &token.literal {
        Some(Literal::Number(n)) => Value::Number(*n),
        Some(Literal::String(s)) => Value::string(s),
        None => Value::Nil,
    }
}

/// Parses a token stream into statements, collecting every syntax error.
pub fn parse(tokens: Vec<Token>) -> ParseResult {
    Parser::new(tokens).parse()
}
