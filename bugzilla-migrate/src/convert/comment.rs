//! Comment conversion.

use super::attachment::AttachmentIndex;
use super::date::convert_date;
use super::issue::Comment;
use super::xref::CrossReferencer;
use super::{dump_leftovers, ConvertError};
use crate::mapping::Mappings;
use crate::record::RawRecord;

const COMMENT_UNUSED_FIELDS: &[&str] = &["comment_count", "attachid", "work_time"];

const EMPTY_COMMENT: &str = "*No description provided.*";

/// Converts one `<long_desc>` record.
///
/// Returns the comment and the number of unconverted fields.
///
/// # Errors
///
/// Returns [`ConvertError`] if a required field is missing or the timestamp
/// does not parse.
pub(crate) fn convert_comment(
    bug_id: u64,
    mut record: RawRecord,
    attachments: &mut AttachmentIndex,
    mappings: &mut Mappings,
    xref: &CrossReferencer,
) -> Result<(Comment, usize), ConvertError> {
    let comment_id = record.take_text("commentid")?;
    comment_id
        .trim()
        .parse::<u64>()
        .map_err(|_| ConvertError::InvalidId {
            field: "commentid".to_string(),
            value: comment_id.clone(),
        })?;

    let who = record.take_text("who")?;
    let who_name = record.take_optional_text("who.name")?;
    let author = mappings.identity(&who, who_name.as_deref());

    // Spaced out so imported text does not mention GitHub users.
    let text = record
        .take_optional_text("thetext")?
        .unwrap_or_else(|| EMPTY_COMMENT.to_string())
        .replace('@', "@ ");

    let mut lines = vec![
        format!("Comment author: {author}"),
        String::new(),
        text,
        String::new(),
    ];
    if let Some(attach_id) = record.take_optional_text("attachid")? {
        if let Some(rendered) = attachments.take(&attach_id) {
            lines.push(rendered);
            lines.push(String::new());
        }
    }
    lines.push(String::new());

    let body = lines
        .iter()
        .map(|line| xref.rewrite(line))
        .collect::<Vec<_>>()
        .join("\n");

    let created_at = convert_date(&record.take_text("bug_when")?)?;

    record.ignore(COMMENT_UNUSED_FIELDS);
    let leftovers = dump_leftovers("comment", bug_id, &record);

    Ok((
        Comment {
            author,
            body,
            created_at,
        },
        leftovers,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawValue;

    fn text(value: &str) -> RawValue {
        RawValue::Text(value.to_string())
    }

    fn comment_record() -> RawRecord {
        let mut record = RawRecord::new();
        record.push("commentid", text("3"));
        record.push("comment_count", text("0"));
        record.push("who", text("andrei@erdani.com"));
        record.push("who.name", text("Andrei"));
        record.push("bug_when", text("2014-03-01 12:00:00 +0000"));
        record.push(
            "thetext",
            text("(In reply to comment #1)\nping @walter, see bug 12"),
        );
        record
    }

    #[test]
    fn converts_comment_body() {
        let xref = CrossReferencer::new("dlang", "dmd");
        let mut mappings = Mappings::default();
        let mut attachments = AttachmentIndex::default();

        let (comment, leftovers) =
            convert_comment(7, comment_record(), &mut attachments, &mut mappings, &xref).unwrap();

        assert_eq!(leftovers, 0);
        assert_eq!(comment.author, "@andralex");
        assert_eq!(comment.created_at, "2014-03-01T12:00:00+00:00");
        assert_eq!(
            comment.body,
            format!(
                "Comment author: @andralex\n\n\nping @ walter, see bug {}\n\n",
                xref.link("12")
            )
        );
    }

    #[test]
    fn defaults_missing_text() {
        let xref = CrossReferencer::new("dlang", "dmd");
        let mut mappings = Mappings::default();
        let mut attachments = AttachmentIndex::default();
        let mut record = comment_record();
        record.take("thetext");

        let (comment, _) =
            convert_comment(7, record, &mut attachments, &mut mappings, &xref).unwrap();

        assert!(comment.body.contains(EMPTY_COMMENT));
    }

    #[test]
    fn embeds_referenced_attachment() {
        let xref = CrossReferencer::new("dlang", "dmd");
        let mut mappings = Mappings::default();

        let mut attachment = RawRecord::new();
        attachment.push("attachid", text("55"));
        attachment.push("filename", text("test.d"));
        attachment.push("type", text("text/plain"));
        attachment.push("size", text("12"));
        let (mut attachments, _) =
            AttachmentIndex::build(7, vec![attachment], "https://issues.dlang.org").unwrap();

        let mut record = comment_record();
        record.push("attachid", text("55"));

        let (comment, _) =
            convert_comment(7, record, &mut attachments, &mut mappings, &xref).unwrap();

        assert!(comment.body.contains("> Attached file: [test.d]"));
        assert!(attachments.remaining().is_empty());
    }

    #[test]
    fn rejects_bad_timestamp() {
        let xref = CrossReferencer::new("dlang", "dmd");
        let mut mappings = Mappings::default();
        let mut attachments = AttachmentIndex::default();
        let mut record = comment_record();
        record.set("bug_when", text("01/03/2014"));

        let result = convert_comment(7, record, &mut attachments, &mut mappings, &xref);
        assert!(matches!(result, Err(ConvertError::InvalidDate { .. })));
    }
}
