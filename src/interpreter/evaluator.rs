use crate::ast::{Expr, Stmt};
use crate::token::{Token, TokenKind};
use crate::value::{format_number, Value};
use super::environment::Environment;
use super::error::{RuntimeError, RuntimeErrorKind};
use std::io::{self, Write};

type EvalResult<T> = Result<T, RuntimeError>;

/// Longest string, in bytes, that `*` may build.
pub const MAX_REPEAT_LEN: usize = 1 << 30;

/// Tree-walking interpreter. `scream` output goes to `W`.
pub struct Interpreter<W: Write = io::Stdout> {
    env: Environment,
    out: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W) -> Self {
        Self {
            env: Environment::new(),
            out,
        }
    }

    /// Runs statements in order. The first runtime error stops the run;
    /// globals defined so far stay in place for the next call.
    pub fn interpret(&mut self, statements: &[Stmt]) -> EvalResult<()> {
        statements.iter().try_for_each(|stmt| self.execute(stmt))
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn execute(&mut self, statement: &Stmt) -> EvalResult<()> {
        match statement {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print { keyword, expr } => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)
                    .map_err(|e| RuntimeError::new(keyword, RuntimeErrorKind::Output(e.to_string())))
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.env.define(name.lexeme.as_str(), value);
                Ok(())
            }
            Stmt::Block(statements) => self.execute_block(statements),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
        }
    }

    fn execute_block(&mut self, statements: &[Stmt]) -> EvalResult<()> {
        self.env.push_scope();
        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));
        // Popped on the error path too, so a failed block leaves no scope behind.
        self.env.pop_scope();
        result
    }

    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary { operator, operand } => {
                let value = self.evaluate(operand)?;
                eval_unary_op(operator, &value)
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                eval_binary_op(&left, operator, &right)
            }
            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let decided = match operator.kind {
                    TokenKind::Or => left.is_truthy(),
                    _ => !left.is_truthy(),
                };
                if decided {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }
            Expr::Variable(name) => self.env.get(&name.lexeme).ok_or_else(|| undefined(name)),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                if self.env.assign(&name.lexeme, value.clone()) {
                    Ok(value)
                } else {
                    Err(undefined(name))
                }
            }
        }
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError::new(name, RuntimeErrorKind::UndefinedVariable(name.lexeme.clone()))
}

fn eval_unary_op(operator: &Token, value: &Value) -> EvalResult<Value> {
    match operator.kind {
        TokenKind::Bang => Ok(Value::Bool(!value.is_truthy())),
        TokenKind::Minus => value
            .as_number()
            .map(|n| Value::Number(-n))
            .ok_or_else(|| RuntimeError::new(operator, RuntimeErrorKind::OperandNotNumber)),
        _ => unreachable!("parser only builds unary `!` and `-`, got {}", operator.kind),
    }
}

fn eval_binary_op(left: &Value, operator: &Token, right: &Value) -> EvalResult<Value> {
    let fail = |kind| Err(RuntimeError::new(operator, kind));

    match operator.kind {
        TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
        TokenKind::BangEqual => Ok(Value::Bool(left != right)),
        TokenKind::Plus => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{}{}", a, b))),
            (Value::String(a), Value::Number(b)) => {
                Ok(Value::string(format!("{}{}", a, format_number(*b))))
            }
            (Value::Number(a), Value::String(b)) => {
                Ok(Value::string(format!("{}{}", format_number(*a), b)))
            }
            _ => fail(RuntimeErrorKind::InvalidAddOperands),
        },
        TokenKind::Star => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
            (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
                repeat(s, *n).map_err(|kind| RuntimeError::new(operator, kind))
            }
            _ => fail(RuntimeErrorKind::OperandsNotNumbers),
        },
        TokenKind::Slash => {
            if matches!(right, Value::Number(n) if *n == 0.0) {
                return fail(RuntimeErrorKind::DivisionByZero);
            }
            match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
                _ => fail(RuntimeErrorKind::OperandsNotNumbers),
            }
        }
        TokenKind::Minus
        | TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::Less
        | TokenKind::LessEqual => {
            let (Value::Number(a), Value::Number(b)) = (left, right) else {
                return fail(RuntimeErrorKind::OperandsNotNumbers);
            };
            Ok(match operator.kind {
                TokenKind::Minus => Value::Number(a - b),
                TokenKind::Greater => Value::Bool(a > b),
                TokenKind::GreaterEqual => Value::Bool(a >= b),
                TokenKind::Less => Value::Bool(a < b),
                _ => Value::Bool(a <= b),
            })
        }
        _ => unreachable!("parser never builds binary {}", operator.kind),
    }
}

/// `s` repeated `trunc(count)` times, capped at `MAX_REPEAT_LEN` bytes.
fn repeat(s: &str, count: f64) -> Result<Value, RuntimeErrorKind> {
    if !count.is_finite() || count < 0.0 {
        return Err(RuntimeErrorKind::InvalidRepeatCount);
    }
    let count = count.trunc();
    if s.is_empty() || count == 0.0 {
        return Ok(Value::string(""));
    }
    if count > MAX_REPEAT_LEN as f64 {
        return Err(RuntimeErrorKind::RepeatTooLarge);
    }
    let times = count as usize;
    match s.len().checked_mul(times) {
        Some(len) if len <= MAX_REPEAT_LEN => Ok(Value::string(s.repeat(times))),
        _ => Err(RuntimeErrorKind::RepeatTooLarge),
    }
}
