//! JSON document loading for a single BookPack
//!
//! Every check in the validator goes through [`PackLoader`] to read a
//! document relative to the package root. The loader distinguishes a
//! file that is simply absent from one that is present but undecodable:
//! absence is classified by the caller (fatal for `book.json`, advisory
//! for `characters/index.json`), while a decode failure is always
//! reported as an error by the validator.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

/// Outcome of loading one package-relative JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The file does not exist. Severity is the caller's call.
    Missing,
    /// The file exists but is not decodable text or not valid JSON.
    /// Carries the underlying decode error message.
    Invalid(String),
    /// The parsed document.
    Loaded(Value),
}

impl LoadOutcome {
    /// The parsed value, if the load succeeded.
    pub fn into_value(self) -> Option<Value> {
        match self {
            LoadOutcome::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Reads JSON documents relative to one package root.
#[derive(Debug, Clone)]
pub struct PackLoader {
    root: PathBuf,
}

impl PackLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The package root this loader is bound to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a package-relative file.
    pub fn resolve(&self, rel_path: &str) -> PathBuf {
        self.root.join(rel_path)
    }

    /// Whether a package-relative path names an existing regular file.
    pub fn file_exists(&self, rel_path: &str) -> bool {
        self.resolve(rel_path).is_file()
    }

    /// Load and parse a package-relative JSON file.
    pub fn load(&self, rel_path: &str) -> LoadOutcome {
        let full = self.resolve(rel_path);
        if !full.is_file() {
            debug!(path = %full.display(), "document absent");
            return LoadOutcome::Missing;
        }

        let raw = match fs::read_to_string(&full) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %full.display(), %err, "document unreadable");
                return LoadOutcome::Invalid(err.to_string());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => LoadOutcome::Loaded(value),
            Err(err) => {
                debug!(path = %full.display(), %err, "document undecodable");
                LoadOutcome::Invalid(err.to_string())
            }
        }
    }
}
