//! BookPack validation
//!
//! [`PackValidator`] runs a fixed battery of cross-document consistency
//! checks over one package directory, in dependency order. A check whose
//! input document failed to load is skipped outright rather than run
//! against defaults, so one missing root file does not cascade into a
//! wall of false errors.
//!
//! ## Checks
//! 1. Package root exists and is a directory
//! 2. `book.json` required fields, schemaVersion, cover image
//! 3. `chapters/index.json` shape and per-entry fields
//! 4. Referenced snapshot/delta files exist
//! 5. `chapterCount` matches the index length
//! 6. `characters/index.json` shape (advisory)
//! 7. `characterCount` matches the registry size (advisory)
//! 8. Final-snapshot node IDs are registered characters (advisory)
//! 9. No snapshot is empty (advisory)
//!
//! Severity is deliberately asymmetric: a `schemaVersion` mismatch and a
//! `chapterCount` mismatch are errors even outside strict mode, while
//! `characterCount` drift, unregistered node IDs, and empty snapshots
//! are warnings. Strict mode promotes warnings at aggregation time, not
//! at the point a check records them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::loader::{LoadOutcome, PackLoader};
use crate::report::{ValidationOutcome, ValidationReport};

/// Required top-level fields of `book.json`.
const BOOK_REQUIRED_FIELDS: &[&str] = &["id", "title", "author", "schemaVersion"];

/// Required fields of each chapter index entry.
const CHAPTER_ENTRY_FIELDS: &[&str] = &["chapter", "snapshot", "delta"];

/// The only schema version this validator understands.
const SUPPORTED_SCHEMA_VERSION: &str = "1.0";

/// How many offending items a batched diagnostic names before truncating.
const MISSING_FILE_LIST_LIMIT: usize = 5;
const NODE_ID_LIST_LIMIT: usize = 10;
const EMPTY_CHAPTER_LIST_LIMIT: usize = 10;

/// Validate one BookPack directory.
///
/// Runs every check, then collapses the transcript into a
/// [`ValidationOutcome`] under the given mode. The run itself is
/// mode-independent; strict only changes which findings count against
/// the verdict.
pub fn validate(root: &Path, strict: bool) -> ValidationOutcome {
    let report = PackValidator::new(root).run();
    ValidationOutcome::from_report(&report, strict)
}

/// A stateful validation run over one package directory.
pub struct PackValidator {
    loader: PackLoader,
    book_id: String,
}

impl PackValidator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let book_id = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            loader: PackLoader::new(root),
            book_id,
        }
    }

    /// The package's identifier: its directory basename.
    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    /// The package root being validated.
    pub fn root(&self) -> &Path {
        self.loader.root()
    }

    /// Execute the full check battery and return the transcript.
    pub fn run(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if !self.loader.root().is_dir() {
            report.error(format!(
                "Directory does not exist: {}",
                self.loader.root().display()
            ));
            return report;
        }

        let meta = self.check_book_json(&mut report);
        let index = self.check_chapter_index(&mut report);

        if let Some(index) = &index {
            self.check_chapter_files(&mut report, index);
        }
        if let (Some(meta), Some(index)) = (&meta, &index) {
            self.check_chapter_count(&mut report, meta, index);
        }

        let registry = self.check_character_registry(&mut report);
        if let (Some(meta), Some(registry)) = (&meta, &registry) {
            self.check_character_count(&mut report, meta, registry);
        }

        // Snapshot load outcomes are kept so the emptiness sweep neither
        // re-reads a file the coverage check already parsed nor
        // re-reports one that failed to decode.
        let mut snapshots: HashMap<String, Option<Value>> = HashMap::new();
        if let (Some(index), Some(registry)) = (&index, &registry) {
            self.check_node_coverage(&mut report, index, registry, &mut snapshots);
        }
        if let Some(index) = &index {
            self.check_no_empty_snapshots(&mut report, index, &mut snapshots);
        }

        report
    }

    /// Load a package-relative JSON document, recording a decode failure
    /// as an error. Absence is reported to the caller as `None` without
    /// a diagnostic; which severity that deserves depends on the file.
    fn load_document(&self, report: &mut ValidationReport, rel_path: &str) -> Option<Value> {
        match self.loader.load(rel_path) {
            LoadOutcome::Loaded(value) => Some(value),
            LoadOutcome::Missing => None,
            LoadOutcome::Invalid(err) => {
                report.error(format!("{rel_path}: invalid JSON - {err}"));
                None
            }
        }
    }

    /// Step 2: `book.json` presence, required fields, schema version,
    /// cover image. Returns the metadata object when the required fields
    /// are present, even if the schema version is wrong, so downstream
    /// count checks still run.
    fn check_book_json(&self, report: &mut ValidationReport) -> Option<Map<String, Value>> {
        let meta = match self.load_document(report, "book.json").and_then(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        }) {
            Some(meta) => meta,
            None => {
                report.error("book.json is missing or invalid");
                return None;
            }
        };

        let missing: Vec<&str> = BOOK_REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !meta.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            report.error(format!("book.json missing required fields: {missing:?}"));
            return None;
        }

        let version = &meta["schemaVersion"];
        if version.as_str() != Some(SUPPORTED_SCHEMA_VERSION) {
            report.error(format!(
                "book.json schemaVersion is '{}', expected '{SUPPORTED_SCHEMA_VERSION}'",
                render_scalar(version)
            ));
        }

        if let Some(cover) = meta.get("coverImage").and_then(Value::as_str) {
            if !cover.is_empty() && !self.loader.file_exists(cover) {
                report.warn(format!(
                    "book.json references coverImage '{cover}' but file not found"
                ));
            }
        }

        report.ok(format!(
            "book.json: {} by {}",
            render_scalar(&meta["title"]),
            render_scalar(&meta["author"])
        ));
        Some(meta)
    }

    /// Step 3: `chapters/index.json` must be a non-empty array; each
    /// entry must carry `chapter`, `snapshot`, and `delta`. Per-entry
    /// field errors do not withhold the index from later checks.
    fn check_chapter_index(&self, report: &mut ValidationReport) -> Option<Vec<Value>> {
        let index = match self.load_document(report, "chapters/index.json") {
            Some(value) => value,
            None => {
                report.error("chapters/index.json is missing or invalid");
                return None;
            }
        };

        let index = match index {
            Value::Array(entries) => entries,
            _ => {
                report.error("chapters/index.json is not an array");
                return None;
            }
        };

        if index.is_empty() {
            report.error("chapters/index.json is empty");
            return None;
        }

        for (i, entry) in index.iter().enumerate() {
            for field in CHAPTER_ENTRY_FIELDS {
                if entry.get(*field).is_none() {
                    report.error(format!("chapters/index.json[{i}] missing '{field}'"));
                }
            }
        }

        report.ok(format!("chapters/index.json: {} chapter(s)", index.len()));
        Some(index)
    }

    /// Step 4: every listed snapshot and delta file must exist under the
    /// chapters directory. Missing files are collected and reported as
    /// one batched error per category.
    fn check_chapter_files(&self, report: &mut ValidationReport, index: &[Value]) {
        let mut missing_snapshots = Vec::new();
        let mut missing_deltas = Vec::new();

        for entry in index {
            let label = chapter_label(entry);
            let snapshot = entry.get("snapshot").and_then(Value::as_str).unwrap_or("");
            let delta = entry.get("delta").and_then(Value::as_str).unwrap_or("");

            if !snapshot.is_empty() && !self.loader.file_exists(&format!("chapters/{snapshot}")) {
                missing_snapshots.push(format!("ch{label}:{snapshot}"));
            }
            if !delta.is_empty() && !self.loader.file_exists(&format!("chapters/{delta}")) {
                missing_deltas.push(format!("ch{label}:{delta}"));
            }
        }

        if missing_snapshots.is_empty() {
            report.ok(format!("All {} snapshot files exist", index.len()));
        } else {
            report.error(format!(
                "{} snapshot file(s) missing: {}",
                missing_snapshots.len(),
                truncated_list(&missing_snapshots, MISSING_FILE_LIST_LIMIT)
            ));
        }

        if missing_deltas.is_empty() {
            report.ok(format!("All {} delta files exist", index.len()));
        } else {
            report.error(format!(
                "{} delta file(s) missing: {}",
                missing_deltas.len(),
                truncated_list(&missing_deltas, MISSING_FILE_LIST_LIMIT)
            ));
        }
    }

    /// Step 5: declared chapter count vs index length.
    fn check_chapter_count(
        &self,
        report: &mut ValidationReport,
        meta: &Map<String, Value>,
        index: &[Value],
    ) {
        let declared = meta.get("chapterCount").and_then(Value::as_i64).unwrap_or(0);
        let actual = index.len() as i64;
        if declared != actual {
            report.error(format!(
                "book.json chapterCount={declared} but chapters/index.json has {actual} entries"
            ));
        } else {
            report.ok(format!("chapterCount matches: {actual}"));
        }
    }

    /// Step 6: the character registry is advisory. A missing or
    /// malformed registry only warns, though a decode failure still
    /// lands as an error through the loader contract.
    fn check_character_registry(
        &self,
        report: &mut ValidationReport,
    ) -> Option<Map<String, Value>> {
        let registry = match self.load_document(report, "characters/index.json") {
            Some(value) => value,
            None => {
                report.warn("characters/index.json is missing or invalid");
                return None;
            }
        };

        match registry {
            Value::Object(map) => {
                report.ok(format!("characters/index.json: {} character(s)", map.len()));
                Some(map)
            }
            _ => {
                report.warn("characters/index.json is not an object");
                None
            }
        }
    }

    /// Step 7: declared character count vs registry size (advisory).
    fn check_character_count(
        &self,
        report: &mut ValidationReport,
        meta: &Map<String, Value>,
        registry: &Map<String, Value>,
    ) {
        let declared = meta
            .get("characterCount")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let actual = registry.len() as i64;
        if declared != actual {
            report.warn(format!(
                "book.json characterCount={declared} but characters/index.json has {actual} entries"
            ));
        } else {
            report.ok(format!("characterCount matches: {actual}"));
        }
    }

    /// Step 8: node IDs in the final snapshot must be registry keys.
    /// Snapshots are cumulative, so only the last chapter's snapshot is
    /// inspected; earlier snapshots add no IDs the last one lacks. That
    /// cumulativeness is an authoring precondition, not something the
    /// validator verifies.
    fn check_node_coverage(
        &self,
        report: &mut ValidationReport,
        index: &[Value],
        registry: &Map<String, Value>,
        snapshots: &mut HashMap<String, Option<Value>>,
    ) {
        let last_entry = match index.last() {
            Some(entry) => entry,
            None => return,
        };
        let snap_file = last_entry
            .get("snapshot")
            .and_then(Value::as_str)
            .unwrap_or("");
        if snap_file.is_empty() {
            return;
        }

        let snapshot = match self.load_snapshot(report, snap_file, snapshots) {
            Some(snapshot) => snapshot,
            None => return,
        };

        let nodes = snapshot
            .get("nodes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let missing: Vec<String> = nodes
            .iter()
            .filter_map(|node| node.get("id").and_then(Value::as_str))
            .filter(|id| !id.is_empty() && !registry.contains_key(*id))
            .map(String::from)
            .collect();

        if missing.is_empty() {
            report.ok(format!(
                "All {} node IDs found in characters/index.json",
                nodes.len()
            ));
        } else {
            report.warn(format!(
                "{} node ID(s) not in characters/index.json: {}",
                missing.len(),
                truncated_list(&missing, NODE_ID_LIST_LIMIT)
            ));
        }
    }

    /// Step 9: no chapter snapshot may have zero nodes (advisory).
    /// Snapshots that fail to load are skipped here; their absence was
    /// already reported by the existence check.
    fn check_no_empty_snapshots(
        &self,
        report: &mut ValidationReport,
        index: &[Value],
        snapshots: &mut HashMap<String, Option<Value>>,
    ) {
        let mut empty = Vec::new();

        for entry in index {
            let snap_file = entry.get("snapshot").and_then(Value::as_str).unwrap_or("");
            if snap_file.is_empty() {
                continue;
            }
            let snapshot = match self.load_snapshot(report, snap_file, snapshots) {
                Some(snapshot) => snapshot,
                None => continue,
            };
            let node_count = snapshot
                .get("nodes")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            if node_count == 0 {
                empty.push(format!("ch{}", chapter_label(entry)));
            }
        }

        if empty.is_empty() {
            report.ok("No empty snapshots");
        } else {
            report.warn(format!(
                "{} snapshot(s) have 0 nodes: chapters {}",
                empty.len(),
                truncated_list(&empty, EMPTY_CHAPTER_LIST_LIMIT)
            ));
        }
    }

    /// Load a chapter snapshot as an object, through the per-run cache.
    /// Non-object snapshots and missing files yield `None`; decode
    /// failures are recorded once via the loader contract.
    fn load_snapshot(
        &self,
        report: &mut ValidationReport,
        snap_file: &str,
        snapshots: &mut HashMap<String, Option<Value>>,
    ) -> Option<Value> {
        if let Some(cached) = snapshots.get(snap_file) {
            return cached.clone();
        }
        let loaded = self
            .load_document(report, &format!("chapters/{snap_file}"))
            .filter(Value::is_object);
        snapshots.insert(snap_file.to_string(), loaded.clone());
        loaded
    }
}

/// Render a chapter ordinal or label for diagnostics: bare text for
/// strings, JSON rendering otherwise, `?` when the field is absent.
fn chapter_label(entry: &Value) -> String {
    match entry.get("chapter") {
        Some(Value::String(label)) => label.clone(),
        Some(value) => value.to_string(),
        None => "?".to_string(),
    }
}

/// Scalar rendering for message interpolation: bare strings, JSON
/// otherwise.
fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Join at most `limit` items with ", ", appending "..." when truncated.
fn truncated_list(items: &[String], limit: usize) -> String {
    let mut joined = items
        .iter()
        .take(limit)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > limit {
        joined.push_str("...");
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truncation_appends_ellipsis_past_the_limit() {
        let items: Vec<String> = (1..=7).map(|i| format!("ch{i}:s{i}.json")).collect();
        let rendered = truncated_list(&items, 5);
        assert!(rendered.ends_with("..."));
        assert_eq!(rendered.matches(':').count(), 5);

        let short: Vec<String> = vec!["a".into(), "b".into()];
        assert_eq!(truncated_list(&short, 5), "a, b");
    }

    #[test]
    fn chapter_labels_render_bare() {
        assert_eq!(chapter_label(&json!({"chapter": 3})), "3");
        assert_eq!(chapter_label(&json!({"chapter": "Prologue"})), "Prologue");
        assert_eq!(chapter_label(&json!({})), "?");
    }

    #[test]
    fn missing_root_fails_with_a_single_error() {
        let report = PackValidator::new("/no/such/bookpack").run();
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].starts_with("Directory does not exist"));
        assert_eq!(report.lines.len(), 1);
    }

    #[test]
    fn book_id_is_the_directory_basename() {
        let validator = PackValidator::new("/books/brothers-karamazov");
        assert_eq!(validator.book_id(), "brothers-karamazov");
    }
}
