//! Field transformers driven by lookup tables.
//!
//! Bugzilla identities, statuses, keywords, resolutions and operating systems
//! are mapped onto GitHub logins, issue state and labels. Unknown values are
//! reported once per table and fall back to an empty result.

mod config;
mod error;
mod lookup;

pub use config::MappingConfig;
pub use error::ConfigError;
pub use lookup::LookupTable;

use std::collections::HashSet;

/// Lookup tables used while converting bugs.
#[derive(Debug, Clone)]
pub struct Mappings {
    email_to_login: LookupTable<String>,
    status_to_closed: LookupTable<bool>,
    keyword_labels: LookupTable<Vec<String>>,
    resolution_labels: LookupTable<Vec<String>>,
    op_sys_labels: LookupTable<Vec<String>>,
    ignored_cc: HashSet<String>,
}

fn labels<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

impl Default for Mappings {
    fn default() -> Self {
        Self {
            email_to_login: LookupTable::new(
                "email to GitHub login",
                [
                    ("greensunny12@gmail.com", "wilzbach".to_string()),
                    ("greeenify@gmail.com", "wilzbach".to_string()),
                    ("andrei@erdani.com", "andralex".to_string()),
                ],
            ),
            status_to_closed: LookupTable::new(
                "status to GitHub state",
                [
                    ("NEW", false),
                    ("UNCONFIRMED", false),
                    ("CONFIRMED", false),
                    ("VERIFIED", false),
                    ("ASSIGNED", false),
                    ("IN_PROGRESS", false),
                    ("RESOLVED", true),
                    ("CLOSED", true),
                    ("REOPENED", false),
                ],
            ),
            keyword_labels: LookupTable::new(
                "keywords to GitHub labels",
                [
                    ("compatibility", labels(["kind: compatibility"])),
                    ("performance", labels(["kind: performance"])),
                    ("regression", labels(["kind: regression"])),
                    ("dll", labels(["kind: dll"])),
                    ("pull", labels(["kind: has pull"])),
                    ("accepts-invalid", labels(["kind: accepts-invalid"])),
                    ("patch", labels(["kind: patch"])),
                    ("link-failure", labels(["kind: link-failure"])),
                    ("wrong-code", labels(["kind: wrong-code"])),
                    ("Optlink", labels(["kind: Optlink"])),
                    ("mangling", labels(["kind: mangling"])),
                    ("ice", labels(["kind: ice"])),
                    ("ice-on-valid-code", labels(["kind: ice"])),
                    ("bootcamp", labels(["kind: bootcamp"])),
                    ("rejects-valid", labels(["kind: rejects-valid"])),
                    ("industry", labels(["kind: industry"])),
                    ("symdeb", labels(["kind: symdeb"])),
                    ("SIMD", labels(["kind: SIMD"])),
                    ("preapproved", labels(["kind: preapproved"])),
                    ("diagnostic", labels(["kind: diagnostic"])),
                ],
            ),
            resolution_labels: LookupTable::new(
                "resolution to GitHub labels",
                [
                    ("FIXED", labels([])),
                    ("DUPLICATE", labels(["resolved: duplicate"])),
                    ("INVALID", labels(["resolved: invalid"])),
                    ("MOVED", labels(["resolved: moved"])),
                    ("WONTFIX", labels(["resolved: won't fix"])),
                    ("WORKSFORME", labels(["resolved: works for me"])),
                ],
            ),
            op_sys_labels: LookupTable::new(
                "Operating System to GitHub labels",
                [
                    ("Mac OS X", labels(["platform: macOS"])),
                    ("Windows", labels(["platform: Windows"])),
                    ("FreeBSD", labels(["platform: FreeBSD"])),
                    ("Linux", labels([])),
                    ("Other", labels([])),
                    ("All", labels([])),
                ],
            ),
            ignored_cc: HashSet::from(["github-bugzilla@puremagic.com".to_string()]),
        }
    }
}

impl Mappings {
    /// Builds the default tables extended by a mappings file.
    #[must_use]
    pub fn from_config(config: MappingConfig) -> Self {
        let mut mappings = Self::default();
        for (email, login) in config.email_to_login {
            mappings.email_to_login.insert(email, login);
        }
        for (status, closed) in config.status_to_closed {
            mappings.status_to_closed.insert(status, closed);
        }
        for (keyword, labels) in config.keyword_labels {
            mappings.keyword_labels.insert(keyword, labels);
        }
        for (resolution, labels) in config.resolution_labels {
            mappings.resolution_labels.insert(resolution, labels);
        }
        for (op_sys, labels) in config.op_sys_labels {
            mappings.op_sys_labels.insert(op_sys, labels);
        }
        mappings.ignored_cc.extend(config.ignored_cc);
        mappings
    }

    /// GitHub login for a Bugzilla address, if known.
    pub fn login(&mut self, email: &str) -> Option<String> {
        self.email_to_login.lookup(email).cloned()
    }

    /// Renders an identity for an issue body.
    ///
    /// Known addresses become `@login`; unknown ones keep the display name
    /// when it is not itself an address.
    pub fn identity(&mut self, email: &str, name: Option<&str>) -> String {
        if let Some(login) = self.login(email) {
            return format!("@{login}");
        }
        match name {
            Some(name) if !name.is_empty() && !name.contains('@') => {
                format!("{name} &lt;<{email}>&gt;")
            }
            _ => email.to_string(),
        }
    }

    /// Renders a CC list, dropping ignored addresses.
    pub fn cc_list(&mut self, emails: &[String]) -> Vec<String> {
        let mut rendered = Vec::with_capacity(emails.len());
        for email in emails {
            if !self.ignored_cc.contains(email.as_str()) {
                rendered.push(self.identity(email, None));
            }
        }
        rendered
    }

    /// Whether a `bug_status` value means the issue is closed.
    ///
    /// Unknown statuses are treated as open.
    pub fn is_closed(&mut self, status: &str) -> bool {
        self.status_to_closed.lookup(status).copied().unwrap_or(false)
    }

    /// Labels for a comma separated keywords field.
    pub fn keyword_labels(&mut self, keywords: &str) -> Vec<String> {
        keywords
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .flat_map(|keyword| self.keyword_labels.lookup(keyword).cloned().unwrap_or_default())
            .collect()
    }

    /// Labels for a `resolution` value.
    pub fn resolution_labels(&mut self, resolution: &str) -> Vec<String> {
        self.resolution_labels
            .lookup(resolution)
            .cloned()
            .unwrap_or_default()
    }

    /// Labels for an `op_sys` value.
    pub fn op_sys_labels(&mut self, op_sys: &str) -> Vec<String> {
        self.op_sys_labels.lookup(op_sys).cloned().unwrap_or_default()
    }

    /// Total lookup warnings emitted across all tables.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.email_to_login.warnings()
            + self.status_to_closed.warnings()
            + self.keyword_labels.warnings()
            + self.resolution_labels.warnings()
            + self.op_sys_labels.warnings()
    }
}
