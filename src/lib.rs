//! BookPack Validator
//!
//! A BookPack is a directory-based content package describing one book
//! as a sequence of chapters, each an incremental snapshot/delta pair,
//! plus a registry of the characters its content nodes reference. This
//! crate validates such packages for cross-file referential and count
//! consistency, and builds the aggregate catalog over a library of them.
//!
//! ## Package layout
//!
//! ```text
//! <book-id>/
//! ├── book.json              — id, title, author, schemaVersion "1.0",
//! │                            optional coverImage / chapterCount / characterCount
//! ├── chapters/
//! │   ├── index.json         — [{chapter, snapshot, delta}, ...]
//! │   ├── <snapshot>.json    — {nodes: [{id?, ...}, ...]}
//! │   └── <delta>.json       — opaque; only existence is checked
//! └── characters/
//!     └── index.json         — {characterId: {...}, ...}
//! ```
//!
//! Findings come in two severities: errors fail the run, warnings are
//! advisory unless strict mode promotes them. Snapshots are assumed
//! cumulative: the final chapter's snapshot carries every node ever
//! introduced, and is the only one checked against the character
//! registry. Package authors are responsible for that precondition; the
//! validator does not verify it.

pub mod catalog;
pub mod error;
pub mod loader;
pub mod report;
pub mod validate;

pub use catalog::{
    build_catalog, read_book_meta, scan_books_dir, Catalog, CatalogEntry, CatalogScan, SkippedBook,
};
pub use error::{PackError, Result};
pub use loader::{LoadOutcome, PackLoader};
pub use report::{CheckStatus, TranscriptLine, ValidationOutcome, ValidationReport};
pub use validate::{validate, PackValidator};
