use std::io;

use lox_core::Token;
use thiserror::Error;

/// Static errors, found before any statement is executed.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error(transparent)]
    Lexical(#[from] lox_core::Error),

    #[error("{msg}")]
    Syntax {
        token: Token,

        // line is copied from token, this is required because thiserror doesn't support field
        // access, e.g {token.line:?}, in error strings
        line: usize,
        msg: String,
    },
}

impl Error {
    pub(crate) fn syntax(token: &Token, msg: &str) -> Self {
        Error::Syntax {
            token: token.clone(),
            line: token.line,
            msg: String::from(msg),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Error::Lexical(err) => err.line(),
            Error::Syntax { line, .. } => *line,
        }
    }

    pub fn location(&self) -> String {
        match self {
            Error::Lexical(err) => err.location(),
            Error::Syntax { token, .. } => token.location(),
        }
    }
}

/// Errors that abort the current run of the interpreter.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{msg}")]
    Type { token: Token, msg: &'static str },

    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { token: Token, name: String },

    #[error("Division by zero.")]
    DivisionByZero { token: Token },

    #[error("Could not write output: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    pub(crate) fn type_error(token: &Token, msg: &'static str) -> Self {
        RuntimeError::Type {
            token: token.clone(),
            msg,
        }
    }

    pub(crate) fn undefined_variable(token: &Token) -> Self {
        RuntimeError::UndefinedVariable {
            token: token.clone(),
            name: token.lexeme.clone(),
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            RuntimeError::Type { token, .. }
            | RuntimeError::UndefinedVariable { token, .. }
            | RuntimeError::DivisionByZero { token } => Some(token),
            RuntimeError::Output(_) => None,
        }
    }

    // A failing output sink is not tied to any source line, it is reported at line 0
    pub fn line(&self) -> usize {
        self.token().map_or(0, |token| token.line)
    }

    pub fn location(&self) -> String {
        self.token().map(Token::location).unwrap_or_default()
    }
}
