use crate::diagnostic::{Diagnostic, Label};
use crate::token::Token;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("Operand must be a number.")]
    OperandNotNumber,
    #[error("Operands must be numbers.")]
    OperandsNotNumbers,
    #[error("Dividing by zero is not cool.")]
    DivisionByZero,
    #[error("Operands must be either numbers or strings.")]
    InvalidAddOperands,
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),
    #[error("String repeat count must be a non-negative number.")]
    InvalidRepeatCount,
    #[error("String repeat result is too large.")]
    RepeatTooLarge,
    #[error("Failed to write output: {0}")]
    Output(String),
}

impl RuntimeErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeErrorKind::UndefinedVariable(_) => "E0201",
            RuntimeErrorKind::OperandNotNumber
            | RuntimeErrorKind::OperandsNotNumbers
            | RuntimeErrorKind::InvalidAddOperands => "E0202",
            RuntimeErrorKind::DivisionByZero => "E0203",
            RuntimeErrorKind::InvalidRepeatCount | RuntimeErrorKind::RepeatTooLarge => "E0204",
            RuntimeErrorKind::Output(_) => "E0205",
        }
    }
}

/// An evaluation failure, attributed to the token whose operation failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}\n[line {}]", .token.line)]
pub struct RuntimeError {
    pub token: Token,
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub fn new(token: &Token, kind: RuntimeErrorKind) -> Self {
        Self {
            token: token.clone(),
            kind,
        }
    }

    pub fn line(&self) -> usize {
        self.token.line
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Convert to a diagnostic for pretty printing
    pub fn to_diagnostic(&self) -> Diagnostic {
        let span = self.token.span;
        let diagnostic = Diagnostic::error(self.message()).with_code(self.kind.code());
        match &self.kind {
            RuntimeErrorKind::UndefinedVariable(name) => diagnostic
                .with_label(Label::primary(span, "not found in this scope"))
                .with_help(format!("declare it first with `var {} = ...;`", name)),
            RuntimeErrorKind::DivisionByZero => {
                diagnostic.with_label(Label::primary(span, "division by zero here"))
            }
            RuntimeErrorKind::InvalidRepeatCount => {
                diagnostic.with_label(Label::primary(span, "repeat count must be 0 or more"))
            }
            RuntimeErrorKind::RepeatTooLarge => diagnostic
                .with_label(Label::primary(span, "repeated string would be too long"))
                .with_help("use a smaller repeat count"),
            _ => diagnostic.with_label(Label::primary(span, "")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Span;
    use crate::token::TokenKind;

    #[test]
    fn test_display_appends_line() {
        let token = Token::new(TokenKind::Slash, "/", 4, Span::new(10, 11));
        let error = RuntimeError::new(&token, RuntimeErrorKind::DivisionByZero);
        assert_eq!(error.to_string(), "Dividing by zero is not cool.\n[line 4]");
        assert_eq!(error.line(), 4);
    }

    #[test]
    fn test_undefined_variable_diagnostic() {
        let token = Token::new(TokenKind::Identifier, "ghost", 1, Span::new(7, 12));
        let error = RuntimeError::new(&token, RuntimeErrorKind::UndefinedVariable("ghost".into()));
        assert_eq!(error.message(), "Undefined variable 'ghost'.");

        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.code.as_deref(), Some("E0201"));
        assert_eq!(diagnostic.labels[0].span, Span::new(7, 12));
        assert_eq!(diagnostic.notes.len(), 1);
    }
}
