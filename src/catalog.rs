//! Catalog metadata extraction
//!
//! The catalog is an aggregate index over a directory of BookPack
//! directories, built from each package's `book.json` alone. Extraction
//! is deliberately forgiving: a directory without a readable `book.json`
//! carrying `id`, `title`, and `author` is skipped with an advisory
//! notice, never an error. The record shape stays aligned with the
//! `book.json` contract the validator enforces.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PackError, Result};

/// Flattened per-package record as it appears in `catalog.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub chapter_count: i64,
    #[serde(default)]
    pub character_count: i64,
}

/// The aggregate catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub books: Vec<CatalogEntry>,
}

impl Catalog {
    /// Serialize as pretty JSON with a trailing newline and write to
    /// `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut rendered = serde_json::to_string_pretty(self)?;
        rendered.push('\n');
        fs::write(path, rendered)?;
        Ok(())
    }
}

/// A directory the scan rejected, with the reason it was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBook {
    /// Directory basename of the rejected package.
    pub name: String,
    /// Human-readable reason, e.g. "no book.json".
    pub reason: String,
}

/// Result of scanning a books directory: the catalog plus every
/// rejected subdirectory. Rejections are advisory; they never fail the
/// scan.
#[derive(Debug, Clone, Default)]
pub struct CatalogScan {
    pub catalog: Catalog,
    pub skipped: Vec<SkippedBook>,
}

fn load_catalog_entry(book_dir: &Path) -> std::result::Result<CatalogEntry, String> {
    let book_json = book_dir.join("book.json");
    if !book_json.is_file() {
        return Err("no book.json".to_string());
    }
    let raw = fs::read_to_string(&book_json)
        .map_err(|err| format!("book.json unreadable: {err}"))?;
    serde_json::from_str(&raw).map_err(|err| format!("book.json invalid: {err}"))
}

/// Read one package's `book.json` and flatten it into a catalog entry.
///
/// Returns `None` when the file is absent, undecodable, or missing any
/// of `id`/`title`/`author`; count fields default to 0 and the cover
/// image is carried through as-is.
pub fn read_book_meta(book_dir: &Path) -> Option<CatalogEntry> {
    let basename = book_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match load_catalog_entry(book_dir) {
        Ok(entry) => Some(entry),
        Err(reason) => {
            debug!(book = %basename, %reason, "book skipped");
            None
        }
    }
}

/// Scan a directory of BookPack directories, keeping both the accepted
/// entries and the rejected directories with their skip reasons.
///
/// Immediate subdirectories only, visited in name order;
/// non-directories are ignored outright.
pub fn scan_books_dir(books_dir: &Path) -> Result<CatalogScan> {
    if !books_dir.is_dir() {
        return Err(PackError::BooksDirNotFound(books_dir.to_path_buf()));
    }

    let mut scan = CatalogScan::default();
    for entry in WalkDir::new(books_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        match load_catalog_entry(entry.path()) {
            Ok(meta) => scan.catalog.books.push(meta),
            Err(reason) => {
                debug!(book = %name, %reason, "book skipped");
                scan.skipped.push(SkippedBook { name, reason });
            }
        }
    }

    Ok(scan)
}

/// Scan a directory of BookPack directories and assemble the catalog,
/// discarding the skip records.
pub fn build_catalog(books_dir: &Path) -> Result<Catalog> {
    Ok(scan_books_dir(books_dir)?.catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_book(dir: &Path, id: &str, body: &str) {
        let book = dir.join(id);
        fs::create_dir_all(&book).unwrap();
        fs::write(book.join("book.json"), body).unwrap();
    }

    #[test]
    fn entries_without_required_fields_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_book(dir.path(), "complete", r#"{"id":"complete","title":"T","author":"A"}"#);
        write_book(dir.path(), "untitled", r#"{"id":"untitled","author":"A"}"#);
        write_book(dir.path(), "corrupt", "{nope");

        let catalog = build_catalog(dir.path()).unwrap();
        assert_eq!(catalog.books.len(), 1);
        assert_eq!(catalog.books[0].id, "complete");
        assert_eq!(catalog.books[0].chapter_count, 0);
    }

    #[test]
    fn catalog_is_sorted_by_directory_name() {
        let dir = tempfile::tempdir().unwrap();
        write_book(dir.path(), "zebra", r#"{"id":"z","title":"Z","author":"A"}"#);
        write_book(dir.path(), "aardvark", r#"{"id":"a","title":"A","author":"A"}"#);

        let catalog = build_catalog(dir.path()).unwrap();
        let ids: Vec<&str> = catalog.books.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "z"]);
    }

    #[test]
    fn skipped_directories_carry_their_reason() {
        let dir = tempfile::tempdir().unwrap();
        write_book(dir.path(), "complete", r#"{"id":"complete","title":"T","author":"A"}"#);
        write_book(dir.path(), "untitled", r#"{"id":"untitled","author":"A"}"#);
        fs::create_dir_all(dir.path().join("bare")).unwrap();

        let scan = scan_books_dir(dir.path()).unwrap();
        assert_eq!(scan.catalog.books.len(), 1);
        assert_eq!(scan.skipped.len(), 2);

        let bare = scan.skipped.iter().find(|s| s.name == "bare").unwrap();
        assert_eq!(bare.reason, "no book.json");

        let untitled = scan.skipped.iter().find(|s| s.name == "untitled").unwrap();
        assert!(untitled.reason.contains("title"), "{}", untitled.reason);
    }

    #[test]
    fn write_to_emits_pretty_json_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        write_book(dir.path(), "bk", r#"{"id":"bk","title":"T","author":"A"}"#);

        let catalog = build_catalog(dir.path()).unwrap();
        let out = dir.path().join("catalog.json");
        catalog.write_to(&out).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["books"][0]["id"], "bk");
    }

    #[test]
    fn write_to_surfaces_io_failures() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::default()
            .write_to(&dir.path().join("no-such-dir/catalog.json"))
            .unwrap_err();
        assert!(matches!(err, PackError::Io(_)));
    }

    #[test]
    fn missing_books_dir_is_an_error() {
        let err = build_catalog(Path::new("/no/such/library")).unwrap_err();
        assert!(matches!(err, PackError::BooksDirNotFound(_)));
    }

    #[test]
    fn optional_fields_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        write_book(
            dir.path(),
            "bk",
            r#"{"id":"bk","title":"T","author":"A","coverImage":"cover.jpg","chapterCount":12,"characterCount":7}"#,
        );
        let entry = read_book_meta(&dir.path().join("bk")).unwrap();
        assert_eq!(entry.cover_image.as_deref(), Some("cover.jpg"));
        assert_eq!(entry.chapter_count, 12);
        assert_eq!(entry.character_count, 7);

        let rendered = serde_json::to_value(&entry).unwrap();
        assert_eq!(rendered["coverImage"], "cover.jpg");
        assert_eq!(rendered["chapterCount"], 12);
    }
}
