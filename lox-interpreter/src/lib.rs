pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod interpreter;
pub mod lox;
pub mod parser;
pub mod printer;
pub mod value;

mod env;
mod limits;

pub use diagnostic::{Diagnostic, Diagnostics, Reporter};
pub use error::{Error, RuntimeError};
pub use interpreter::Interpreter;
pub use lox::{Lox, Outcome, RunOptions};
pub use parser::{Parsed, Parser};
