//! Generic XML tree flattening.
//!
//! Bugzilla exports are deeply nested but loosely typed, so each `<bug>` is
//! first turned into a [`RawRecord`] that the converter then pops fields from.

mod raw;

pub use raw::{RawRecord, RawValue};

use roxmltree::Node;

/// Flattens the child elements of `parent` into a [`RawRecord`].
///
/// - A tag seen more than once becomes a [`RawValue::List`] in document order.
/// - Leaf elements map to the concatenation of their text nodes, so comments
///   and CDATA sections do not split a value; leaves without text are skipped.
/// - Elements with children recurse into a nested record.
/// - Attributes land on the parent record as `"<tag>.<attribute>"`.
#[must_use]
pub fn flatten(parent: Node<'_, '_>) -> RawRecord {
    let mut record = RawRecord::new();

    for child in parent.children().filter(Node::is_element) {
        let tag = child.tag_name().name();

        if child.children().any(|node| node.is_element()) {
            record.push(tag, RawValue::Record(flatten(child)));
        } else {
            let text: String = child
                .descendants()
                .filter(Node::is_text)
                .filter_map(|node| node.text())
                .collect();
            if !text.is_empty() {
                record.push(tag, RawValue::Text(text));
            }
        }

        for attribute in child.attributes() {
            record.set(
                format!("{tag}.{}", attribute.name()),
                RawValue::Text(attribute.value().to_string()),
            );
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const BUG: &str = r#"<bug>
        <bug_id>42</bug_id>
        <short_desc>Crash &amp; burn  with  spaces</short_desc>
        <keywords></keywords>
        <cc>a@example.com</cc>
        <cc>b@example.com</cc>
        <reporter name="Walter">walter@example.com</reporter>
        <long_desc isprivate="0">
            <commentid>1</commentid>
            <who name="Walter">walter@example.com</who>
        </long_desc>
        <long_desc isprivate="0">
            <commentid>2</commentid>
        </long_desc>
    </bug>"#;

    fn flatten_bug() -> RawRecord {
        let document = Document::parse(BUG).unwrap();
        flatten(document.root_element())
    }

    #[test]
    fn preserves_leaf_text_exactly() {
        let record = flatten_bug();
        assert_eq!(
            record.get("short_desc").and_then(RawValue::as_text),
            Some("Crash & burn  with  spaces")
        );
    }

    #[test]
    fn joins_text_around_comments() {
        let document =
            Document::parse("<long_desc><thetext>a<!-- c -->b<![CDATA[<c>]]></thetext></long_desc>")
                .unwrap();
        let record = flatten(document.root_element());
        assert_eq!(
            record.get("thetext").and_then(RawValue::as_text),
            Some("ab<c>")
        );
    }

    #[test]
    fn skips_empty_leaves() {
        let record = flatten_bug();
        assert!(!record.contains("keywords"));
    }

    #[test]
    fn merges_repeated_tags() {
        let mut record = flatten_bug();
        assert_eq!(
            record.take_text_list("cc").unwrap(),
            vec!["a@example.com", "b@example.com"]
        );

        let comments = record.take_records("long_desc").unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(
            comments[0].get("who.name").and_then(RawValue::as_text),
            Some("Walter")
        );
    }

    #[test]
    fn exposes_attributes_on_parent() {
        let record = flatten_bug();
        assert_eq!(
            record.get("reporter.name").and_then(RawValue::as_text),
            Some("Walter")
        );
        assert_eq!(
            record.get("long_desc.isprivate").and_then(RawValue::as_text),
            Some("0")
        );
    }
}
