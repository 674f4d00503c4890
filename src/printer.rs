//! Prefix (Lisp-style) rendering of the AST, and a reader for the expression
//! form so printed trees can be checked structurally.
//!
//! `1 + 2 * 3` prints as `(+ 1 (* 2 3))`, `(1)` as `(group 1)`. Strings are
//! quoted so the output can be read back.

use crate::ast::{Expr, Stmt};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::lexer::scan;
use crate::token::{Literal, Token, TokenKind};
use crate::value::{format_number, Value};

pub fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal(value) => print_literal(value),
        Expr::Grouping(inner) => parenthesize("group", &[inner.as_ref()]),
        Expr::Unary { operator, operand } => parenthesize(&operator.lexeme, &[operand.as_ref()]),
        Expr::Binary {
            left,
            operator,
            right,
        }
        | Expr::Logical {
            left,
            operator,
            right,
        } => parenthesize(&operator.lexeme, &[left.as_ref(), right.as_ref()]),
        Expr::Variable(name) => name.lexeme.clone(),
        Expr::Assign { name, value } => format!("(= {} {})", name.lexeme, print_expr(value)),
    }
}

pub fn print_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Expression(expr) => format!("(; {})", print_expr(expr)),
        Stmt::Print { expr, .. } => format!("(scream {})", print_expr(expr)),
        Stmt::Var {
            name,
            initializer: Some(init),
        } => format!("(var {} {})", name.lexeme, print_expr(init)),
        Stmt::Var { name, .. } => format!("(var {})", name.lexeme),
        Stmt::Block(statements) => {
            let mut out = String::from("(block");
            for stmt in statements {
                out.push(' ');
                out.push_str(&print_stmt(stmt));
            }
            out.push(')');
            out
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => match else_branch {
            Some(else_branch) => format!(
                "(if {} {} {})",
                print_expr(condition),
                print_stmt(then_branch),
                print_stmt(else_branch)
            ),
            None => format!("(if {} {})", print_expr(condition), print_stmt(then_branch)),
        },
        Stmt::While { condition, body } => {
            format!("(while {} {})", print_expr(condition), print_stmt(body))
        }
    }
}

fn print_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => format_number(*n),
        other => other.to_string(),
    }
}

fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
    let mut out = format!("({}", name);
    for expr in exprs {
        out.push(' ');
        out.push_str(&print_expr(expr));
    }
    out.push(')');
    out
}

/// Reads an expression back from the prefix form `print_expr` produces.
pub fn read_expr(text: &str) -> Result<Expr, SyntaxError> {
    let scanned = scan(text);
    if let Some(error) = scanned.errors.into_iter().next() {
        return Err(error);
    }
    let mut reader = Reader {
        tokens: scanned.tokens,
        current: 0,
    };
    let expr = reader.expr()?;
    if !reader.peek().is_eof() {
        return Err(reader.error("Expect end of input."));
    }
    Ok(expr)
}

fn unexpected(token: &Token, message: &str) -> SyntaxError {
    SyntaxError::at_token(SyntaxErrorKind::UnexpectedToken, token, message)
}

struct Reader {
    tokens: Vec<Token>,
    current: usize,
}

impl Reader {
    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is_eof() {
            self.current += 1;
        }
        token
    }

    fn error(&self, message: &str) -> SyntaxError {
        unexpected(self.peek(), message)
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token, SyntaxError> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn expr(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.advance();
        let expr = match token.kind {
            TokenKind::Nil => Expr::Literal(Value::Nil),
            TokenKind::True => Expr::Literal(Value::Bool(true)),
            TokenKind::False => Expr::Literal(Value::Bool(false)),
            TokenKind::Number | TokenKind::String => match token.literal {
                Some(Literal::Number(n)) => Expr::Literal(Value::Number(n)),
                Some(Literal::String(s)) => Expr::Literal(Value::from(s)),
                None => Expr::Literal(Value::Nil),
            },
            TokenKind::Identifier => Expr::Variable(token),
            TokenKind::LeftParen => return self.form(),
            _ => return Err(unexpected(&token, "Expect expression.")),
        };
        Ok(expr)
    }

    /// The rest of a parenthesized form, after its `(`.
    fn form(&mut self) -> Result<Expr, SyntaxError> {
        let head = self.advance();
        let expr = match head.kind {
            TokenKind::Identifier if head.lexeme == "group" => Expr::grouping(self.expr()?),
            TokenKind::Equal => {
                let name = self.expect(TokenKind::Identifier, "Expect variable name.")?;
                Expr::assign(name, self.expr()?)
            }
            TokenKind::And | TokenKind::Or => {
                let left = self.expr()?;
                Expr::logical(left, head, self.expr()?)
            }
            TokenKind::Bang => Expr::unary(head, self.expr()?),
            TokenKind::Minus => {
                let first = self.expr()?;
                if self.peek().kind == TokenKind::RightParen {
                    Expr::unary(head, first)
                } else {
                    Expr::binary(first, head, self.expr()?)
                }
            }
            TokenKind::Plus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::EqualEqual
            | TokenKind::BangEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::Less
            | TokenKind::LessEqual => {
                let left = self.expr()?;
                Expr::binary(left, head, self.expr()?)
            }
            _ => return Err(unexpected(&head, "Expect operator.")),
        };
        self.expect(TokenKind::RightParen, "Expect ')' after form.")?;
        Ok(expr)
    }
}
