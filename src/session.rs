use crate::diagnostic::{ErrorLog, Reporter};
use crate::error::Error;
use crate::interpreter::{parse, Interpreter};
use crate::lexer::scan;
use std::io::{self, Write};

/// How a single run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    SyntaxError,
    RuntimeError,
}

impl Status {
    pub fn is_ok(self) -> bool {
        self == Status::Completed
    }

    /// Process exit code, following the BSD `sysexits` convention.
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Completed => 0,
            Status::SyntaxError => 65,
            Status::RuntimeError => 70,
        }
    }
}

/// Runs source texts against one long-lived interpreter, so globals defined
/// by one run are visible to the next.
pub struct Session<W: Write = io::Stdout> {
    interpreter: Interpreter<W>,
}

impl Session<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Session<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Session<W> {
    pub fn with_output(out: W) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
        }
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    /// Scans, parses and, when both are clean, interprets `source`.
    /// Every error found is handed to `reporter`.
    pub fn run(&mut self, source: &str, reporter: &mut impl Reporter) -> Status {
        reporter.trace(&format!("Scanning {} bytes", source.len()));
        let scanned = scan(source);
        scanned.errors.iter().for_each(|e| reporter.syntax_error(e));
        let mut had_error = !scanned.is_ok();

        reporter.trace(&format!("Parsing {} tokens", scanned.tokens.len()));
        let parsed = parse(scanned.tokens);
        parsed.errors.iter().for_each(|e| reporter.syntax_error(e));
        had_error |= !parsed.is_ok();

        if had_error {
            reporter.trace("Skipping execution due to syntax errors");
            return Status::SyntaxError;
        }

        reporter.trace(&format!("Interpreting {} statements", parsed.statements.len()));
        match self.interpreter.interpret(&parsed.statements) {
            Ok(()) => Status::Completed,
            Err(error) => {
                reporter.runtime_error(&error);
                Status::RuntimeError
            }
        }
    }
}

/// Runs `source` in a fresh session and returns what it printed.
pub fn parse_and_run(source: &str) -> Result<String, Vec<Error>> {
    let mut session = Session::with_output(Vec::new());
    let mut log = ErrorLog::new();
    let status = session.run(source, &mut log);

    if status.is_ok() {
        Ok(String::from_utf8_lossy(&session.into_output()).into_owned())
    } else {
        let ErrorLog {
            syntax_errors,
            runtime_errors,
        } = log;
        Err(syntax_errors
            .into_iter()
            .map(Error::from)
            .chain(runtime_errors.into_iter().map(Error::from))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyntaxError;
    use crate::interpreter::RuntimeError;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Reporter for Recorder {
        fn syntax_error(&mut self, error: &SyntaxError) {
            self.events.push(format!("syntax: {}", error));
        }

        fn runtime_error(&mut self, error: &RuntimeError) {
            self.events.push(format!("runtime: {}", error.message()));
        }

        fn trace(&mut self, message: &str) {
            self.events.push(format!("trace: {}", message));
        }
    }

    #[test]
    fn test_run_completes() {
        let mut session = Session::with_output(Vec::new());
        let mut log = ErrorLog::new();
        let status = session.run("scream 1 + 2;", &mut log);
        assert_eq!(status, Status::Completed);
        assert!(log.is_empty());
        assert_eq!(session.into_output(), b"3\n");
    }

    #[test]
    fn test_scan_and_parse_errors_both_reported() {
        let mut session = Session::with_output(Vec::new());
        let mut log = ErrorLog::new();
        let status = session.run("scream @;\nscream 2", &mut log);
        assert_eq!(status, Status::SyntaxError);
        assert_eq!(status.exit_code(), 65);
        assert_eq!(log.syntax_errors.len(), 3);
        assert!(session.into_output().is_empty());
    }

    #[test]
    fn test_syntax_error_prevents_execution() {
        let mut session = Session::with_output(Vec::new());
        let mut log = ErrorLog::new();
        session.run("scream \"side effect\"; 1 +;", &mut log);
        assert!(session.into_output().is_empty());
    }

    #[test]
    fn test_runtime_error_status() {
        let mut session = Session::with_output(Vec::new());
        let mut recorder = Recorder::default();
        let status = session.run("scream -\"a\";", &mut recorder);
        assert_eq!(status.exit_code(), 70);
        assert!(recorder
            .events
            .contains(&"runtime: Operand must be a number.".to_string()));
        assert!(recorder.events[0].starts_with("trace: Scanning"));
    }

    #[test]
    fn test_state_persists_across_runs() {
        let mut session = Session::with_output(Vec::new());
        let mut log = ErrorLog::new();
        session.run("var greeting = \"hi\";", &mut log);
        session.run("scream oops;", &mut log);
        session.run("scream greeting;", &mut log);
        assert_eq!(log.runtime_errors.len(), 1);
        assert_eq!(session.into_output(), b"hi\n");
    }

    #[test]
    fn test_parse_and_run_helper() {
        assert_eq!(parse_and_run("scream \"ab\" * 3;").unwrap(), "ababab\n");

        let errors = parse_and_run("10 / 0;").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("Dividing by zero"));
    }
}
