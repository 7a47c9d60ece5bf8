//! Validation transcript and outcome types
//!
//! A validation run produces an ordered transcript of check outcomes,
//! each carrying a single severity tag. Strict mode does not change how
//! findings are recorded; it is applied once, at aggregation, when the
//! transcript is collapsed into a [`ValidationOutcome`].

use std::fmt;

/// Severity tag for one transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() honors width/alignment flags; the transcript relies on
        // a fixed-width status column.
        f.pad(self.as_str())
    }
}

/// One check outcome, in the order it was determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub status: CheckStatus,
    pub message: String,
}

/// Accumulator threaded through every check of a validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub lines: Vec<TranscriptLine>,
}

impl ValidationReport {
    pub fn ok(&mut self, message: impl Into<String>) {
        self.push(CheckStatus::Ok, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(CheckStatus::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(CheckStatus::Error, message);
    }

    fn push(&mut self, status: CheckStatus, message: impl Into<String>) {
        self.lines.push(TranscriptLine {
            status,
            message: message.into(),
        });
    }

    /// Messages recorded with error severity.
    pub fn errors(&self) -> Vec<String> {
        self.messages_with(CheckStatus::Error)
    }

    /// Messages recorded with warning severity.
    pub fn warnings(&self) -> Vec<String> {
        self.messages_with(CheckStatus::Warning)
    }

    /// Messages that count against the verdict: errors, plus warnings
    /// when strict mode is on.
    pub fn effective_errors(&self, strict: bool) -> Vec<String> {
        self.lines
            .iter()
            .filter(|line| {
                line.status == CheckStatus::Error
                    || (strict && line.status == CheckStatus::Warning)
            })
            .map(|line| line.message.clone())
            .collect()
    }

    /// Whether the run passes under the given mode.
    pub fn passed(&self, strict: bool) -> bool {
        self.effective_errors(strict).is_empty()
    }

    fn messages_with(&self, status: CheckStatus) -> Vec<String> {
        self.lines
            .iter()
            .filter(|line| line.status == status)
            .map(|line| line.message.clone())
            .collect()
    }
}

/// Aggregated result of [`validate`](crate::validate::validate).
///
/// `errors` already reflects strict promotion: under strict mode every
/// warning message appears in both lists, so a strict run with any
/// warning fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    pub fn from_report(report: &ValidationReport, strict: bool) -> Self {
        Self {
            passed: report.passed(strict),
            errors: report.effective_errors(strict),
            warnings: report.warnings(),
        }
    }
}
