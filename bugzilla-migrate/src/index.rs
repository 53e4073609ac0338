//! Deduplicating index of converted issues.

use crate::convert::{BugConverter, ConvertError, TargetIssue};
use crate::ledger::Ledger;
use crate::record::flatten;
use roxmltree::{Document, ParsingOptions};
use std::collections::BTreeMap;
use tracing::{error, info, info_span};

/// Converted issues keyed by Bugzilla bug ID, in ascending order.
#[derive(Debug, Default)]
pub struct IssueIndex {
    issues: BTreeMap<u64, TargetIssue>,
    duplicates: Vec<u64>,
}

impl IssueIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue keyed by its source ID.
    ///
    /// A second issue with the same ID is reported and replaces the first.
    pub fn insert(&mut self, issue: TargetIssue) {
        let number = issue.number;
        if self.issues.insert(number, issue).is_some() {
            error!(bug_id = number, "Bug is duplicated in the export");
            self.duplicates.push(number);
        }
    }

    /// Source IDs seen more than once, in the order collisions were found.
    #[must_use]
    pub fn duplicates(&self) -> &[u64] {
        &self.duplicates
    }

    /// Borrows an issue by source ID.
    #[must_use]
    pub fn get(&self, number: u64) -> Option<&TargetIssue> {
        self.issues.get(&number)
    }

    /// Number of pending issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Iterates pending issues in ascending source ID order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetIssue> {
        self.issues.values()
    }

    /// Drops every issue the ledger records as imported.
    ///
    /// Returns how many issues were removed.
    pub fn skip_imported(&mut self, ledger: &Ledger) -> usize {
        let before = self.issues.len();
        self.issues.retain(|number, _| !ledger.contains(*number));
        before - self.issues.len()
    }
}

/// Parses a Bugzilla XML export and converts every `<bug>` element.
///
/// # Errors
///
/// Returns [`ConvertError`] if the XML is malformed or a bug cannot be converted.
pub fn convert_document(
    xml: &str,
    converter: &mut BugConverter,
) -> Result<IssueIndex, ConvertError> {
    let _span = info_span!("convert_document").entered();
    // Bugzilla exports reference bugzilla.dtd.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(xml, options)?;

    let mut index = IssueIndex::new();
    for node in document
        .descendants()
        .filter(|node| node.has_tag_name("bug"))
    {
        let issue = converter.convert(flatten(node))?;
        index.insert(issue);
    }

    info!(
        issues = index.len(),
        duplicates = index.duplicates().len(),
        "Converted Bugzilla export"
    );
    Ok(index)
}
