//! Attachment rendering.

use super::{dump_leftovers, ConvertError};
use crate::record::RawRecord;
use std::collections::HashMap;

const ATTACHMENT_UNUSED_FIELDS: &[&str] = &["attacher", "attacher.name", "date", "delta_ts", "token"];

/// Rendered attachments keyed by Bugzilla attachment ID.
///
/// Each entry is consumed by the first comment that references it.
#[derive(Debug, Default)]
pub struct AttachmentIndex {
    rendered: HashMap<String, String>,
}

impl AttachmentIndex {
    /// Renders every attachment record of a bug, linking each one below
    /// `attachment_url` (the directory serving `attachment.cgi`).
    ///
    /// Returns the index and the number of unconverted attachment fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if a required attachment field is missing.
    pub fn build(
        bug_id: u64,
        records: Vec<RawRecord>,
        attachment_url: &str,
    ) -> Result<(Self, usize), ConvertError> {
        let mut index = Self::default();
        let mut leftovers = 0;

        for mut record in records {
            let id = record.take_text("attachid")?;
            let filename = record.take_text("filename")?;
            let kind = record.take_text("type")?;
            let size = record.take_text("size")?;

            let mut lines = vec![format!(
                "> Attached file: [{filename}]({}/attachment.cgi?id={id}) ({kind}, {size} bytes)",
                attachment_url.trim_end_matches('/')
            )];
            if let Some(desc) = record.take_optional_text("desc")? {
                lines.push(format!("> Description:   {desc}"));
            }

            record.ignore(ATTACHMENT_UNUSED_FIELDS);
            leftovers += dump_leftovers("attachment", bug_id, &record);

            index.rendered.insert(id, lines.join("\n"));
        }

        Ok((index, leftovers))
    }

    /// Removes and returns the rendered attachment.
    pub fn take(&mut self, id: &str) -> Option<String> {
        self.rendered.remove(id)
    }

    /// IDs never referenced by a comment, sorted.
    #[must_use]
    pub fn remaining(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.rendered.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
