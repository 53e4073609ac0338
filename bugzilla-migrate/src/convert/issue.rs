//! Normalized issue types submitted to the import API.

use serde::Serialize;
use std::collections::BTreeSet;

/// A comment attached to an imported issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Rendered author, already part of `body`.
    #[serde(skip)]
    pub author: String,

    /// Markdown body.
    pub body: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// A converted Bugzilla bug ready for import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetIssue {
    /// Source bug ID; used for bookkeeping only.
    #[serde(skip)]
    pub number: u64,

    /// Issue title.
    pub title: String,

    /// Markdown body.
    pub body: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Whether the issue is imported closed.
    pub closed: bool,

    /// Closing timestamp, approximated by the last Bugzilla update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,

    /// GitHub login of the assignee, only for open issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Labels from the keyword, resolution and platform taxonomies.
    pub labels: BTreeSet<String>,

    /// Comments in source order.
    #[serde(skip)]
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_import_fields_only() {
        let issue = TargetIssue {
            number: 17044,
            title: "Crash".to_string(),
            body: "body".to_string(),
            created_at: "2014-03-01T12:00:00+00:00".to_string(),
            closed: false,
            closed_at: None,
            assignee: Some("andralex".to_string()),
            labels: BTreeSet::from(["kind: ice".to_string()]),
            comments: vec![Comment {
                author: "@andralex".to_string(),
                body: "hello".to_string(),
                created_at: "2014-03-01T12:00:00+00:00".to_string(),
            }],
        };

        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            json!({
                "title": "Crash",
                "body": "body",
                "created_at": "2014-03-01T12:00:00+00:00",
                "closed": false,
                "assignee": "andralex",
                "labels": ["kind: ice"],
            })
        );
        assert_eq!(
            serde_json::to_value(&issue.comments[0]).unwrap(),
            json!({ "body": "hello", "created_at": "2014-03-01T12:00:00+00:00" })
        );
    }
}
