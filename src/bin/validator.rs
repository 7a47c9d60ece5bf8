//! BookPack Validator CLI
//!
//! Validates one BookPack directory and prints a check-by-check
//! transcript. Exit code 0 when the run passes (warnings are OK),
//! 1 when any error-level check failed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bookpack::report::CheckStatus;
use bookpack::{PackValidator, ValidationOutcome};

#[derive(Parser)]
#[command(name = "bookpack-validator")]
#[command(about = "Validate a BookPack directory against the v1 schema")]
struct Cli {
    /// Path to the BookPack directory (e.g., public/books/brothers-karamazov)
    book_dir: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> ExitCode {
    let book_dir = std::path::absolute(&cli.book_dir).unwrap_or(cli.book_dir);
    let validator = PackValidator::new(&book_dir);

    println!();
    println!("Validating BookPack: {}", book_dir.display());
    println!("Book ID: {}", validator.book_id());
    println!("{}", "-".repeat(60));

    let report = validator.run();
    for line in &report.lines {
        match line.status {
            CheckStatus::Warning if cli.strict => {
                println!("  {:<8}{}  (strict)", CheckStatus::Error, line.message);
            }
            status => println!("  {:<8}{}", status, line.message),
        }
    }

    let outcome = ValidationOutcome::from_report(&report, cli.strict);
    println!("{}", "-".repeat(60));
    if !outcome.passed {
        println!(
            "FAILED: {} error(s), {} warning(s)",
            outcome.errors.len(),
            outcome.warnings.len()
        );
        ExitCode::FAILURE
    } else if !outcome.warnings.is_empty() {
        println!("PASSED with {} warning(s)", outcome.warnings.len());
        ExitCode::SUCCESS
    } else {
        println!("PASSED: all checks OK");
        ExitCode::SUCCESS
    }
}
