use crate::diagnostic::{LineIndex, Span};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::token::{Literal, Token, TokenKind};
use chumsky::prelude::*;

/// Raw lexer output, before tokens get their text, line and literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Token(TokenKind),
    Number,
    String,
    Identifier,
    Comment,
    Unexpected(char),
    UnterminatedString,
    UnterminatedComment,
}

pub fn lexer<'src>(
) -> impl Parser<'src, &'src str, Vec<(Lexeme, SimpleSpan)>, extra::Err<Simple<'src, char>>> {
    let whitespace = one_of(" \r\t\n").repeated();

    let line_comment = just("//").then(none_of("\n").repeated()).to(Lexeme::Comment);

    let block_comment = just("/*")
        .then(any().and_is(just("*/").not()).repeated())
        .then(just("*/"))
        .to(Lexeme::Comment);

    let unterminated_comment = just("/*")
        .then(any().repeated())
        .to(Lexeme::UnterminatedComment);

    let number = text::digits(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to(Lexeme::Number);

    let string = just('"')
        .then(none_of("\"").repeated())
        .then(just('"'))
        .to(Lexeme::String);

    let unterminated_string = just('"')
        .then(any().repeated())
        .to(Lexeme::UnterminatedString);

    let ident = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
                .repeated(),
        )
        .to_slice()
        .map(|s: &str| match TokenKind::keyword(s) {
            Some(kind) => Lexeme::Token(kind),
            None => Lexeme::Identifier,
        });

    let op_double = choice((
        just("!=").to(TokenKind::BangEqual),
        just("==").to(TokenKind::EqualEqual),
        just(">=").to(TokenKind::GreaterEqual),
        just("<=").to(TokenKind::LessEqual),
    ));

    let op_single = choice((
        just('(').to(TokenKind::LeftParen),
        just(')').to(TokenKind::RightParen),
        just('{').to(TokenKind::LeftBrace),
        just('}').to(TokenKind::RightBrace),
        just(',').to(TokenKind::Comma),
        just('.').to(TokenKind::Dot),
        just('-').to(TokenKind::Minus),
        just('+').to(TokenKind::Plus),
        just(';').to(TokenKind::Semicolon),
        just('*').to(TokenKind::Star),
        just('/').to(TokenKind::Slash),
        just('!').to(TokenKind::Bang),
        just('=').to(TokenKind::Equal),
        just('>').to(TokenKind::Greater),
        just('<').to(TokenKind::Less),
    ));

    let op = op_double.or(op_single).map(Lexeme::Token);

    let unexpected = any().map(Lexeme::Unexpected);

    // Comments must be tried before the `/` operator, terminated forms before
    // their unterminated fallbacks.
    let lexeme = choice((
        line_comment,
        block_comment,
        unterminated_comment,
        number,
        string,
        unterminated_string,
        ident,
        op,
        unexpected,
    ))
    .map_with(|lexeme, e| (lexeme, e.span()))
    .then_ignore(whitespace.clone());

    whitespace
        .ignore_then(lexeme.repeated().collect())
        .then_ignore(end())
}

/// Tokens and errors produced by one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<SyntaxError>,
}

impl ScanResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Turns source text into tokens, recovering from bad input one lexeme at a time.
pub struct Scanner<'a> {
    source: &'a str,
    lines: LineIndex,
    tokens: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn scan_tokens(mut self) -> ScanResult {
        match lexer().parse(self.source).into_output() {
            Some(lexemes) => {
                for (lexeme, span) in lexemes {
                    self.add_lexeme(lexeme, Span::new(span.start, span.end));
                }
            }
            None => {
                let span = Span::new(0, self.source.len());
                self.error(SyntaxErrorKind::UnexpectedCharacter, span, "Could not scan input.");
            }
        }

        let end = self.source.len();
        self.tokens.push(Token::eof(self.lines.line(end), end));

        ScanResult {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    fn add_lexeme(&mut self, lexeme: Lexeme, span: Span) {
        let source = self.source;
        let text = &source[span.start..span.end];
        match lexeme {
            Lexeme::Comment => {}
            Lexeme::Token(kind) => self.add_token(kind, span, None),
            Lexeme::Identifier => self.add_token(TokenKind::Identifier, span, None),
            Lexeme::Number => match text.parse::<f64>() {
                Ok(n) => self.add_token(TokenKind::Number, span, Some(Literal::Number(n))),
                Err(_) => self.error(SyntaxErrorKind::MalformedNumber, span, "Malformed number."),
            },
            Lexeme::String => {
                let value = text[1..text.len() - 1].to_string();
                self.add_token(TokenKind::String, span, Some(Literal::String(value)));
            }
            Lexeme::Unexpected(c) => {
                let span = Span::new(span.start, span.start + c.len_utf8());
                self.error(SyntaxErrorKind::UnexpectedCharacter, span, "Unexpected character.");
            }
            Lexeme::UnterminatedString => {
                let span = Span::new(span.start, span.start + 1);
                self.error(SyntaxErrorKind::UnterminatedString, span, "Unterminated string.");
            }
            Lexeme::UnterminatedComment => {
                let span = Span::new(span.start, span.start + 2);
                self.error(SyntaxErrorKind::UnterminatedComment, span, "Unterminated block comment.");
            }
        }
    }

    fn add_token(&mut self, kind: TokenKind, span: Span, literal: Option<Literal>) {
        let line = self.lines.line(span.start);
        let token = Token::new(kind, &self.source[span.start..span.end], line, span);
        self.tokens.push(match literal {
            Some(literal) => token.with_literal(literal),
            None => token,
        });
    }

    fn error(&mut self, kind: SyntaxErrorKind, span: Span, message: &str) {
        let line = self.lines.line(span.start);
        self.errors.push(SyntaxError::scan(kind, line, span, message));
    }
}

/// Scans `source` into tokens terminated by a single EOF token.
pub fn scan(source: &str) -> ScanResult {
    Scanner::new(source).scan_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_arithmetic_tokens() {
        let result = scan("3 + 4 * 5");
        assert!(result.is_ok());
        assert_eq!(
            kinds("3 + 4 * 5"),
            vec![
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Star,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
        assert_eq!(result.tokens[0].literal, Some(Literal::Number(3.0)));
        assert_eq!(result.tokens[4].lexeme, "5");
    }

    #[test]
    fn test_empty_source_is_just_eof() {
        let result = scan("");
        assert_eq!(result.tokens.len(), 1);
        assert!(result.tokens[0].is_eof());
        assert_eq!(result.tokens[0].lexeme, "");
        assert_eq!(result.tokens[0].line, 1);

        assert_eq!(kinds("  \t\r\n  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds("! != = == > >= < <="),
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Eof
            ]
        );
        assert_eq!(
            kinds("!==="),
            vec![TokenKind::BangEqual, TokenKind::EqualEqual, TokenKind::Eof]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("var scream print _x x1 whiles"),
            vec![
                TokenKind::Var,
                TokenKind::Print,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
        assert_eq!(
            kinds("and class else false fun for if nil or return super this true while"),
            vec![
                TokenKind::And,
                TokenKind::Class,
                TokenKind::Else,
                TokenKind::False,
                TokenKind::Fun,
                TokenKind::For,
                TokenKind::If,
                TokenKind::Nil,
                TokenKind::Or,
                TokenKind::Return,
                TokenKind::Super,
                TokenKind::This,
                TokenKind::True,
                TokenKind::While,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let result = scan("12 3.25 7.");
        let literals: Vec<_> = result.tokens.iter().filter_map(|t| t.literal.clone()).collect();
        assert_eq!(
            literals,
            vec![Literal::Number(12.0), Literal::Number(3.25), Literal::Number(7.0)]
        );
        assert_eq!(
            kinds("7."),
            vec![TokenKind::Number, TokenKind::Dot, TokenKind::Eof]
        );
        assert_eq!(
            kinds(".5"),
            vec![TokenKind::Dot, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn test_strings_span_lines() {
        let result = scan("\"hello\nworld\" x");
        assert!(result.is_ok());
        assert_eq!(result.tokens[0].kind, TokenKind::String);
        assert_eq!(result.tokens[0].literal, Some(Literal::String("hello\nworld".into())));
        assert_eq!(result.tokens[0].lexeme, "\"hello\nworld\"");
        assert_eq!(result.tokens[1].line, 2);
    }

    #[test]
    fn test_comments() {
        let result = scan("// nothing here\n1 /* block\n comment */ / 2 // trailing");
        assert!(result.is_ok());
        assert_eq!(
            result.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Number, TokenKind::Slash, TokenKind::Number, TokenKind::Eof]
        );
        assert_eq!(result.tokens[0].line, 2);
        assert_eq!(result.tokens[1].line, 3);
    }

    #[test]
    fn test_unexpected_character_recovers() {
        let result = scan("1 @ 2 # 3");
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].message, "Unexpected character.");
        assert_eq!(result.errors[0].span, Span::new(2, 3));
        assert_eq!(
            result.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Number, TokenKind::Number, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string_stops_at_eof() {
        let result = scan("var a = \"oops\nmore");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, SyntaxErrorKind::UnterminatedString);
        assert_eq!(result.errors[0].line, 1);
        assert_eq!(
            result.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Var, TokenKind::Identifier, TokenKind::Equal, TokenKind::Eof]
        );
        assert_eq!(result.tokens.last().map(|t| t.line), Some(2));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let result = scan("1 /* never\nclosed");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, SyntaxErrorKind::UnterminatedComment);
        assert_eq!(kinds("1 /* never"), vec![TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn test_rescanning_is_deterministic() {
        let source = "var a = 1;\n{ var b = a * 2; scream b; } // done";
        assert_eq!(scan(source), scan(source));
    }

    #[test]
    fn test_eof_line_counts_trailing_newlines() {
        let result = scan("scream 1;\n\n");
        assert_eq!(result.tokens.last().map(|t| t.line), Some(3));
    }
}
