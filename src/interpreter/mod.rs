pub mod parser;
pub mod environment;
pub mod error;
pub mod evaluator;

pub use error::{RuntimeError, RuntimeErrorKind};
pub use environment::Environment;
pub use parser::{parse, ParseResult, Parser};
pub use evaluator::Interpreter;
