#![allow(dead_code)]

use aroi::diagnostic::ErrorLog;
use aroi::{parse_and_run, Error, Session, Status};

/// Runs `source` and returns its printed output, panicking on any error.
pub fn run_ok(source: &str) -> String {
    match parse_and_run(source) {
        Ok(output) => output,
        Err(errors) => panic!("Expected success, got errors: {:?}", errors),
    }
}

/// Runs `source` and returns the display form of every error it produced.
pub fn run_err(source: &str) -> Vec<String> {
    match parse_and_run(source) {
        Ok(output) => panic!("Expected errors, got output: {:?}", output),
        Err(errors) => errors.iter().map(Error::to_string).collect(),
    }
}

/// Runs `source` keeping output printed before any runtime error.
pub fn run_capturing(source: &str) -> (Status, String, ErrorLog) {
    let mut session = Session::with_output(Vec::new());
    let mut log = ErrorLog::new();
    let status = session.run(source, &mut log);
    let output = String::from_utf8(session.into_output()).unwrap();
    (status, output, log)
}

pub fn lines(output: &str) -> Vec<&str> {
    output.lines().collect()
}
