pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod printer;
pub mod session;
pub mod token;
pub mod value;

pub use ast::{Expr, Stmt};
pub use error::{Error, SyntaxError};
pub use interpreter::{Interpreter, RuntimeError};
pub use lexer::scan;
pub use session::{parse_and_run, Session, Status};
pub use token::{Token, TokenKind};
pub use value::Value;
