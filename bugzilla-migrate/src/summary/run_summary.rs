//! Run summary types.

use crate::convert::ConversionDiagnostics;
use crate::github::{ImportOutcome, LabelReport};

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of bugs converted from the export.
    pub bugs_converted: usize,

    /// Number of bug IDs that appeared more than once.
    pub duplicates: usize,

    /// Number of bugs skipped because the ledger lists them.
    pub skipped_imported: usize,

    /// Number of labels already present on GitHub.
    pub labels_existing: usize,

    /// Number of labels created.
    pub labels_created: usize,

    /// Number of labels missing on GitHub.
    pub labels_missing: usize,

    /// Number of issues imported.
    pub issues_imported: usize,

    /// Number of imports not submitted (dry run).
    pub imports_skipped: usize,

    /// Number of source fields left unconverted.
    pub unconverted_fields: usize,

    /// Number of attachments no comment referenced.
    pub unconverted_attachments: usize,

    /// Number of distinct lookup misses.
    pub lookup_warnings: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Records what the conversion left behind.
    pub fn record_conversion(&mut self, diagnostics: ConversionDiagnostics, lookup_warnings: usize) {
        self.bugs_converted = diagnostics.bugs_converted;
        self.unconverted_fields = diagnostics.unconverted_fields;
        self.unconverted_attachments = diagnostics.unconverted_attachments;
        self.lookup_warnings = lookup_warnings;
    }

    /// Records the outcome of the label check.
    pub fn record_labels(&mut self, report: &LabelReport) {
        self.labels_existing = report.existing.len();
        self.labels_created = report.created.len();
        self.labels_missing = report.missing.len();
    }

    /// Updates the summary with an import outcome.
    pub fn record_outcome(&mut self, outcome: &ImportOutcome) {
        match outcome {
            ImportOutcome::Imported { .. } => self.issues_imported += 1,
            ImportOutcome::Skipped { .. } => self.imports_skipped += 1,
        }
    }

    /// Returns true if anything was left unconverted or unresolved.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.unconverted_fields > 0
            || self.unconverted_attachments > 0
            || self.lookup_warnings > 0
            || self.labels_missing > 0
            || self.duplicates > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_record_outcomes() {
        let mut summary = RunSummary::new(false);

        summary.record_outcome(&ImportOutcome::Imported {
            bug_id: 17044,
            number: 501,
        });
        summary.record_outcome(&ImportOutcome::Skipped {
            bug_id: 17045,
            reason: "dry run".to_string(),
        });

        assert_eq!(summary.issues_imported, 1);
        assert_eq!(summary.imports_skipped, 1);
        assert!(!summary.has_warnings());
    }

    #[test]
    fn missing_labels_are_warnings() {
        let mut summary = RunSummary::new(true);
        summary.record_labels(&LabelReport {
            existing: vec!["kind: bug".to_string()],
            created: Vec::new(),
            missing: vec!["os: Windows".to_string()],
        });

        assert_eq!(summary.labels_existing, 1);
        assert_eq!(summary.labels_missing, 1);
        assert!(summary.has_warnings());
    }
}
