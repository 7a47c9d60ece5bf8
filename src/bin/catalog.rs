//! Catalog Builder CLI
//!
//! Scans a directory of BookPack directories and rebuilds the aggregate
//! catalog.json that the catalog page loads at runtime.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bookpack::scan_books_dir;

#[derive(Parser)]
#[command(name = "bookpack-catalog")]
#[command(about = "Rebuild catalog.json from BookPack directories")]
struct Cli {
    /// Path to the books directory (e.g., public/books)
    #[arg(long)]
    books_dir: PathBuf,

    /// Output path for catalog.json (default: <books_dir>/../catalog.json)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let books_dir = std::path::absolute(&cli.books_dir).unwrap_or(cli.books_dir);
    let out_path = match cli.out {
        Some(out) => std::path::absolute(&out).unwrap_or(out),
        None => books_dir
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("catalog.json"),
    };

    println!("Scanning: {}", books_dir.display());
    let scan = scan_books_dir(&books_dir)?;
    for skipped in &scan.skipped {
        eprintln!("  SKIP {}: {}", skipped.name, skipped.reason);
    }
    for book in &scan.catalog.books {
        println!("  OK   {}: {} by {}", book.id, book.title, book.author);
    }
    println!();
    println!("Found {} book(s)", scan.catalog.books.len());

    scan.catalog
        .write_to(&out_path)
        .with_context(|| format!("unable to write {}", out_path.display()))?;

    println!("Wrote: {}", out_path.display());
    Ok(())
}
