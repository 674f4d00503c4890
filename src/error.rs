use crate::diagnostic::{Diagnostic, Label, Span};
use crate::interpreter::RuntimeError;
use crate::token::Token;
use thiserror::Error;

/// Which kind of malformed input a syntax error describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedComment,
    MalformedNumber,
    UnexpectedToken,
    InvalidAssignmentTarget,
}

impl SyntaxErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            SyntaxErrorKind::UnexpectedCharacter => "E0001",
            SyntaxErrorKind::UnterminatedString => "E0002",
            SyntaxErrorKind::UnterminatedComment => "E0003",
            SyntaxErrorKind::MalformedNumber => "E0004",
            SyntaxErrorKind::UnexpectedToken => "E0101",
            SyntaxErrorKind::InvalidAssignmentTarget => "E0102",
        }
    }
}

/// A scan-time or parse-time error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error{}: {message}", location_suffix(.location))]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub line: usize,
    /// `at end` or `at 'lexeme'` for parse errors, absent for scan errors.
    pub location: Option<String>,
    pub message: String,
    pub span: Span,
}

fn location_suffix(location: &Option<String>) -> String {
    location
        .as_ref()
        .map(|location| format!(" {}", location))
        .unwrap_or_default()
}

impl SyntaxError {
    /// An error found while scanning, attributed to a line only.
    pub fn scan(kind: SyntaxErrorKind, line: usize, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            location: None,
            message: message.into(),
            span,
        }
    }

    /// An error found while parsing, attributed to the offending token.
    pub fn at_token(kind: SyntaxErrorKind, token: &Token, message: impl Into<String>) -> Self {
        let location = if token.is_eof() {
            "at end".to_string()
        } else {
            format!("at '{}'", token.lexeme)
        };
        Self {
            kind,
            line: token.line,
            location: Some(location),
            message: message.into(),
            span: token.span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self.kind {
            SyntaxErrorKind::UnexpectedCharacter => "not valid here",
            SyntaxErrorKind::UnterminatedString => "string starts here",
            SyntaxErrorKind::UnterminatedComment => "comment starts here",
            SyntaxErrorKind::InvalidAssignmentTarget => "cannot assign to this",
            _ => "",
        };
        let diagnostic = Diagnostic::error(self.message.clone())
            .with_code(self.kind.code())
            .with_label(Label::primary(self.span, label));

        match self.kind {
            SyntaxErrorKind::UnterminatedString => diagnostic.with_help("close the string with `\"`"),
            SyntaxErrorKind::UnterminatedComment => diagnostic.with_help("close the comment with `*/`"),
            SyntaxErrorKind::InvalidAssignmentTarget => {
                diagnostic.with_help("only a variable name can appear left of `=`")
            }
            _ => match &self.location {
                Some(location) => diagnostic.with_note(format!("error occurred {}", location)),
                None => diagnostic,
            },
        }
    }
}

/// Any error the pipeline can produce.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Syntax(error) => error.to_diagnostic(),
            Error::Runtime(error) => error.to_diagnostic(),
        }
    }
}
