use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use lox_interpreter::diagnostic::Stderr;
use lox_interpreter::{Lox, Outcome, RunOptions};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const EXIT_STATIC_ERROR: u8 = 65;
const EXIT_RUNTIME_ERROR: u8 = 70;
const EXIT_IO_ERROR: u8 = 74;

/// Tree-walking interpreter for Lox. Runs FILE, or starts a REPL when no file is given.
#[derive(Parser)]
#[command(name = "lox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Script to run
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print every scanned token before parsing
    #[arg(long)]
    tokens: bool,

    /// Print the parsed program before running it
    #[arg(long)]
    ast: bool,

    /// Run the statements that parsed even if others had errors
    #[arg(long)]
    keep_going: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let options = RunOptions {
        dump_tokens: cli.tokens,
        dump_ast: cli.ast,
        keep_going: cli.keep_going,
    };

    match &cli.file {
        Some(path) => run_file(path, options),
        None => run_prompt(options),
    }
}

fn run_file(path: &Path, options: RunOptions) -> ExitCode {
    let src = match fs::read_to_string(path) {
        Ok(src) => src,
        Err(err) => {
            error!(path = %path.display(), "could not read script: {}", err);
            return ExitCode::from(EXIT_IO_ERROR);
        }
    };

    let mut stdout = io::stdout();
    let mut lox = Lox::new(&mut stdout, options);
    match lox.run(&src, &mut Stderr) {
        Outcome::Ok => ExitCode::SUCCESS,
        Outcome::StaticError => ExitCode::from(EXIT_STATIC_ERROR),
        Outcome::RuntimeError => ExitCode::from(EXIT_RUNTIME_ERROR),
    }
}

// Errors on one line are reported and forgotten, the session goes on with the next line
fn run_prompt(options: RunOptions) -> ExitCode {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            error!("could not start the line editor: {}", err);
            return ExitCode::from(EXIT_IO_ERROR);
        }
    };

    let mut stdout = io::stdout();
    let mut lox = Lox::new(&mut stdout, options);
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let outcome = lox.run(&line, &mut Stderr);
                debug!(?outcome, "line done");
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return ExitCode::SUCCESS,
            Err(err) => {
                error!("could not read line: {}", err);
                return ExitCode::from(EXIT_IO_ERROR);
            }
        }
    }
}
