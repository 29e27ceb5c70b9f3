use std::io::Write;

use lox_core::scan;
use tracing::debug;

use crate::diagnostic::Reporter;
use crate::error::{Error, RuntimeError};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::printer::print_program;

#[derive(Debug, Default, Clone, Copy)]
pub struct RunOptions {
    /// Write every scanned token to the output before parsing.
    pub dump_tokens: bool,
    /// Write the parsed program, fully parenthesized, to the output before running it.
    pub dump_ast: bool,
    /// Run whatever statements survived parsing even when there were static errors.
    pub keep_going: bool,
}

/// How a single run ended. Static errors win over runtime errors, a program with both only
/// gets to run with `keep_going`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    StaticError,
    RuntimeError,
}

/// Runs source text through the whole pipeline. The interpreter lives as long as the runner,
/// so globals defined by one `run` are visible to the next.
pub struct Lox<'a> {
    interpreter: Interpreter<'a>,
    options: RunOptions,
}

impl<'a> Lox<'a> {
    pub fn new(stdout: &'a mut dyn Write, options: RunOptions) -> Self {
        Lox {
            interpreter: Interpreter::new(stdout),
            options,
        }
    }

    pub fn run(&mut self, src: &str, reporter: &mut dyn Reporter) -> Outcome {
        let scanned = scan(src);
        for err in &scanned.errors {
            report_static(reporter, &Error::from(err.clone()));
        }

        if self.options.dump_tokens {
            if let Err(err) = self.dump_tokens(&scanned.tokens) {
                report_runtime(reporter, &err);
                return Outcome::RuntimeError;
            }
        }

        let parsed = Parser::new(&scanned.tokens).parse();
        for err in &parsed.errors {
            report_static(reporter, err);
        }

        let had_static_error = scanned.has_errors() || parsed.has_errors();
        if had_static_error && !self.options.keep_going {
            debug!("static errors, not running the program");
            return Outcome::StaticError;
        }

        if self.options.dump_ast {
            let printed = print_program(&parsed.statements);
            if let Err(err) = self.interpreter.output().write_all(printed.as_bytes()) {
                report_runtime(reporter, &RuntimeError::from(err));
                return Outcome::RuntimeError;
            }
        }

        match self.interpreter.interpret(&parsed.statements) {
            Err(err) => {
                report_runtime(reporter, &err);
                Outcome::RuntimeError
            }
            Ok(()) if had_static_error => Outcome::StaticError,
            Ok(()) => Outcome::Ok,
        }
    }

    fn dump_tokens(&mut self, tokens: &[lox_core::Token]) -> Result<(), RuntimeError> {
        let output = self.interpreter.output();
        for token in tokens {
            writeln!(output, "{}", token)?;
        }
        Ok(())
    }
}

fn report_static(reporter: &mut dyn Reporter, err: &Error) {
    reporter.report(err.line(), &err.location(), &err.to_string());
}

fn report_runtime(reporter: &mut dyn Reporter, err: &RuntimeError) {
    reporter.report(err.line(), &err.location(), &err.to_string());
}
