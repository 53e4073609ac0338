//! Bugzilla bug to GitHub issue conversion.
//!
//! This module pops every known field from a flattened `<bug>` record,
//! transforms it, and reports whatever the migration does not cover yet.

mod attachment;
mod comment;
mod date;
mod error;
mod issue;
mod xref;

pub use attachment::AttachmentIndex;
pub use date::convert_date;
pub use error::ConvertError;
pub use issue::{Comment, TargetIssue};
pub use xref::{CrossReferencer, MARKER_PREFIX};

use crate::mapping::Mappings;
use crate::record::RawRecord;
use std::collections::BTreeSet;
use tracing::{debug, debug_span, warn};

/// Bug fields that are deliberately not migrated.
pub const BUG_UNUSED_FIELDS: &[&str] = &[
    "actual_time",
    "assigned_to.name",
    "attachment.isobsolete",
    "attachment.ispatch",
    "attachment.isprivate",
    "bug_file_loc",
    "cclist_accessible",
    "classification",
    "classification_id",
    "comment_sort_order",
    "component",
    "deadline",
    "estimated_time",
    "everconfirmed",
    "long_desc.isprivate",
    "priority",
    "product",
    "remaining_time",
    "reporter_accessible",
    "rep_platform",
    "bug_severity",
    "target_milestone",
    "token",
];

/// Running totals of what a conversion left behind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionDiagnostics {
    /// Number of bugs converted.
    pub bugs_converted: usize,

    /// Bug, comment and attachment fields nothing consumed.
    pub unconverted_fields: usize,

    /// Attachments no comment referenced.
    pub unconverted_attachments: usize,
}

/// Converts flattened bugs into [`TargetIssue`]s.
#[derive(Debug)]
pub struct BugConverter {
    mappings: Mappings,
    xref: CrossReferencer,
    tracker_url: String,
    attachment_url: String,
    diagnostics: ConversionDiagnostics,
}

impl BugConverter {
    /// Creates a converter for bugs migrated from `tracker_url` into `owner/repo`.
    ///
    /// Attachments are linked below `{tracker_url}/bugfiles` until
    /// [`with_attachment_url`](Self::with_attachment_url) says otherwise.
    pub fn new(
        mappings: Mappings,
        tracker_url: impl Into<String>,
        owner: &str,
        repo: &str,
    ) -> Self {
        let tracker_url: String = tracker_url.into();
        Self {
            mappings,
            xref: CrossReferencer::new(owner, repo),
            attachment_url: format!("{}/bugfiles", tracker_url.trim_end_matches('/')),
            tracker_url,
            diagnostics: ConversionDiagnostics::default(),
        }
    }

    /// Links attachments below `attachment_url` instead.
    #[must_use]
    pub fn with_attachment_url(mut self, attachment_url: impl Into<String>) -> Self {
        self.attachment_url = attachment_url.into();
        self
    }

    /// What has been left unconverted so far.
    #[must_use]
    pub fn diagnostics(&self) -> ConversionDiagnostics {
        self.diagnostics
    }

    /// Lookup warnings emitted so far.
    #[must_use]
    pub fn lookup_warnings(&self) -> usize {
        self.mappings.warnings()
    }

    /// Converts one flattened `<bug>` record.
    ///
    /// Unknown lookup values and leftover fields are reported as warnings;
    /// missing required fields and malformed dates abort the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the record cannot be converted.
    pub fn convert(&mut self, mut bug: RawRecord) -> Result<TargetIssue, ConvertError> {
        let raw_id = bug.take_text("bug_id")?;
        let number = raw_id
            .trim()
            .parse::<u64>()
            .map_err(|_| ConvertError::InvalidId {
                field: "bug_id".to_string(),
                value: raw_id.clone(),
            })?;

        let _span = debug_span!("convert_bug", bug_id = number).entered();
        debug!("Converting bug");

        let mut leftovers = 0;

        let (mut attachments, attachment_leftovers) =
            AttachmentIndex::build(number, bug.take_records("attachment")?, &self.attachment_url)?;
        leftovers += attachment_leftovers;

        let comment_records = bug.take_records("long_desc")?;
        if comment_records.is_empty() {
            return Err(ConvertError::MissingField {
                field: "long_desc".to_string(),
            });
        }
        let mut comments = Vec::with_capacity(comment_records.len());
        for record in comment_records {
            let (comment, comment_leftovers) = comment::convert_comment(
                number,
                record,
                &mut attachments,
                &mut self.mappings,
                &self.xref,
            )?;
            leftovers += comment_leftovers;
            comments.push(comment);
        }

        let title = bug.take_text("short_desc")?;
        let created_at = convert_date(&bug.take_text("creation_ts")?)?;

        let closed = self.mappings.is_closed(&bug.take_text("bug_status")?);
        let assignee = self.mappings.login(&bug.take_text("assigned_to")?);
        // Assignees only make sense on open issues.
        let assignee = if closed { None } else { assignee };
        // Bugzilla has no closing date; the last update is the best guess.
        let updated_at = bug.take_text("delta_ts")?;
        let closed_at = if closed {
            Some(convert_date(&updated_at)?)
        } else {
            None
        };

        let mut labels = BTreeSet::new();
        if let Some(keywords) = bug.take_optional_text("keywords")? {
            labels.extend(self.mappings.keyword_labels(&keywords));
        }
        if let Some(resolution) = bug.take_optional_text("resolution")? {
            labels.extend(self.mappings.resolution_labels(&resolution));
        }
        if let Some(op_sys) = bug.take_optional_text("op_sys")? {
            labels.extend(self.mappings.op_sys_labels(&op_sys));
        }

        let body = self.compose_body(number, &mut bug)?;

        bug.ignore(BUG_UNUSED_FIELDS);
        leftovers += dump_leftovers("bug", number, &bug);

        let remaining: Vec<String> = attachments
            .remaining()
            .into_iter()
            .map(str::to_string)
            .collect();
        for id in &remaining {
            if let Some(rendered) = attachments.take(id) {
                warn!(
                    bug_id = number,
                    attachment = %id,
                    len = rendered.len(),
                    value = %rendered,
                    "Unconverted attachment"
                );
            }
        }
        self.diagnostics.unconverted_attachments += remaining.len();

        self.diagnostics.unconverted_fields += leftovers;
        self.diagnostics.bugs_converted += 1;

        Ok(TargetIssue {
            number,
            title,
            body,
            created_at,
            closed,
            closed_at,
            assignee,
            labels,
            comments,
        })
    }

    /// Builds the issue description in its fixed section order.
    fn compose_body(&mut self, number: u64, bug: &mut RawRecord) -> Result<String, ConvertError> {
        let mut body = vec![
            format!(
                "Note: this issue was migrated automatically from {}",
                self.tracker_url
            ),
            String::new(),
            format!("Original bug ID: {MARKER_PREFIX}{number}"),
        ];

        let reporter = bug.take_text("reporter")?;
        let reporter_name = bug.take_optional_text("reporter.name")?;
        body.push(format!(
            "From: {}",
            self.mappings.identity(&reporter, reporter_name.as_deref())
        ));
        body.push(format!("Reported version: {}", bug.take_text("version")?));

        if bug.contains("cc") {
            let cc = self.mappings.cc_list(&bug.take_text_list("cc")?);
            body.push(format!("CC:   {}", cc.join(", ")));
        }

        body.push(String::new());

        let references = [
            ("dup_id", "Duplicates:   "),
            ("dependson", "Depends on:   "),
            ("blocked", "Blocker for:  "),
        ];
        for (field, heading) in references {
            if bug.contains(field) {
                let ids = bug.take_text_list(field)?;
                body.push(format!("{heading}{}", self.xref.links(&ids)));
            }
        }
        for see_also in bug.take_text_list("see_also")? {
            body.push(format!("See also: {}", self.xref.see_also(&see_also)));
        }

        body.push(String::new());
        Ok(body.join("\n"))
    }
}

/// Logs fields nothing consumed and returns how many there were.
pub(crate) fn dump_leftovers(kind: &'static str, bug_id: u64, record: &RawRecord) -> usize {
    let leftovers = record.leftovers();
    if leftovers.is_empty() {
        return 0;
    }

    warn!(bug_id, kind, count = leftovers.len(), "Unconverted fields");
    for (field, value) in &leftovers {
        warn!(bug_id, kind, field, len = value.len(), value = %value, "Unconverted field");
    }
    leftovers.len()
}
