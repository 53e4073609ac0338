//! Rewrites Bugzilla bug references into links to the migrated issues.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Prefix of the marker written into every migrated issue body.
pub const MARKER_PREFIX: &str = "BZ#";

fn reply_re() -> &'static Regex {
    static REPLY_RE: OnceLock<Regex> = OnceLock::new();
    REPLY_RE.get_or_init(|| Regex::new(r"\(In reply to comment #\d+\)").expect("valid reply regex"))
}

fn reference_re() -> &'static Regex {
    static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
    REFERENCE_RE.get_or_init(|| {
        Regex::new(r"(?i)(\bbug(?:\s+report)?\s+|\bfeature wish\s+|\s#)(\d+)\b")
            .expect("valid reference regex")
    })
}

fn see_also_re() -> &'static Regex {
    static SEE_ALSO_RE: OnceLock<Regex> = OnceLock::new();
    SEE_ALSO_RE.get_or_init(|| Regex::new(r"id=(\d+)$").expect("valid see-also regex"))
}

/// Builds links that search the target repository for a migrated bug.
#[derive(Debug, Clone)]
pub struct CrossReferencer {
    owner: String,
    repo: String,
}

impl CrossReferencer {
    /// Creates a rewriter targeting `owner/repo`.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Markdown link searching for the `Original bug ID: BZ#{id}` marker.
    #[must_use]
    pub fn link(&self, id: &str) -> String {
        format!(
            "[{MARKER_PREFIX}{id}](https://github.com/{}/{}/issues?q=is%3Aissue%20%22Original%20bug%20ID%3A%20BZ%23{id}%22)",
            self.owner, self.repo
        )
    }

    /// Joins links for several bug IDs with `", "`.
    #[must_use]
    pub fn links(&self, ids: &[String]) -> String {
        ids.iter()
            .map(|id| self.link(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Turns a Bugzilla `show_bug.cgi?id=N` URL into a link; other URLs pass through.
    #[must_use]
    pub fn see_also(&self, url: &str) -> String {
        match see_also_re().captures(url.trim()) {
            Some(caps) => self.link(&caps[1]),
            None => url.to_string(),
        }
    }

    /// Drops reply boilerplate and links every bug reference in `text`.
    ///
    /// Applying this to its own output changes nothing.
    #[must_use]
    pub fn rewrite(&self, text: &str) -> String {
        let text = reply_re().replace_all(text, "");
        reference_re()
            .replace_all(&text, |caps: &Captures| {
                format!("{}{}", caps[1].replace('#', ""), self.link(&caps[2]))
            })
            .into_owned()
    }
}
