use std::{
    fs::read_to_string,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use clap::Parser;
use matlang::{
    display_error, front_end, interpreter::interpreter::run, lexer::lexer::tokenize, Rejection,
};
use tracing_subscriber::EnvFilter;

/// Type checks and runs a matrix language program
#[derive(Parser, Debug)]
#[command(name = "matlang", version, about, long_about = None)]
struct Cli {
    /// Program to run
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Stop after type checking
    #[arg(long)]
    check: bool,

    /// Print the token stream and exit
    #[arg(long)]
    tokens: bool,
}

fn main() -> ExitCode {
    // Silent unless MATLANG_LOG is set
    if let Ok(filter) = EnvFilter::try_from_env("MATLANG_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let file_name = cli.file.to_string_lossy().to_string();

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Cannot open {} file: {}", file_name, error);
            return ExitCode::from(2);
        }
    };

    let stdout = io::stdout();
    let stderr = io::stderr();

    if cli.tokens {
        return match tokenize(&source) {
            Ok(tokens) => {
                tokens.iter().for_each(|token| token.debug());
                ExitCode::SUCCESS
            }
            Err(error) => {
                let _ = display_error(&error, &file_name, &source, &mut stderr.lock());
                ExitCode::SUCCESS
            }
        };
    }

    let program = match front_end(&source) {
        Ok(program) => program,
        Err(Rejection::Lexical(error)) | Err(Rejection::Syntax(error)) => {
            let _ = display_error(&error, &file_name, &source, &mut stderr.lock());
            return ExitCode::SUCCESS;
        }
        Err(Rejection::Static(diagnostics)) => {
            let mut out = stdout.lock();
            for diagnostic in diagnostics {
                let _ = writeln!(out, "{}", diagnostic);
            }
            return ExitCode::SUCCESS;
        }
    };

    if cli.check {
        return ExitCode::SUCCESS;
    }

    let start = Instant::now();
    let result = run(&program.ast, stdout.lock());
    tracing::debug!(elapsed = ?start.elapsed(), "ran");

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = display_error(&error, &file_name, &source, &mut stderr.lock());
            ExitCode::from(1)
        }
    }
}
