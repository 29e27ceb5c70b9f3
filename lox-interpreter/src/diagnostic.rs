use std::fmt::{Display, Formatter};
use std::io;
use std::io::Write;

/// Receives every lexical, syntax and runtime error of a run.
pub trait Reporter {
    fn report(&mut self, line: usize, location: &str, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub location: String,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error{}: {}", self.line, self.location, self.message)
    }
}

/// Keeps the reported diagnostics in order, for callers that inspect them afterwards.
#[derive(Debug, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }
}

impl Reporter for Diagnostics {
    fn report(&mut self, line: usize, location: &str, message: &str) {
        self.0.push(Diagnostic {
            line,
            location: String::from(location),
            message: String::from(message),
        });
    }
}

/// Writes each diagnostic to standard error as soon as it is reported.
#[derive(Debug, Default)]
pub struct Stderr;

impl Reporter for Stderr {
    fn report(&mut self, line: usize, location: &str, message: &str) {
        let diagnostic = Diagnostic {
            line,
            location: String::from(location),
            message: String::from(message),
        };
        // nowhere left to report a failing stderr to
        let _ = writeln!(io::stderr(), "{}", diagnostic);
    }
}
