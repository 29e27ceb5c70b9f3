use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Unterminated string.")]
    UnterminatedString { line: usize },

    #[error("Unexpected character.")]
    UnexpectedCharacter { ch: char, line: usize },
}

impl Error {
    pub fn line(&self) -> usize {
        match self {
            Error::UnterminatedString { line } => *line,
            Error::UnexpectedCharacter { line, .. } => *line,
        }
    }

    // Lexical errors are not attached to a token, so there is nothing to point at
    pub fn location(&self) -> String {
        String::new()
    }
}
