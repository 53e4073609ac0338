#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod backoff;
pub mod convert;
pub mod github;
pub mod index;
pub mod ledger;
pub mod mapping;
pub mod rate_limit;
pub mod record;
pub mod runner;
pub mod summary;

pub use backoff::{poll_until, Backoff, PollError, Sleeper, TokioSleeper};
pub use convert::{
    convert_date, BugConverter, Comment, ConversionDiagnostics, ConvertError, CrossReferencer,
    TargetIssue,
};
pub use github::{
    GitHubClient, ImportOutcome, ImportRequest, ImportState, ImportStatus, IssueTracker,
    LabelReport, LabelStatus, SyncClient, SyncError,
};
pub use index::{convert_document, IssueIndex};
pub use ledger::{Ledger, LedgerError, DEFAULT_LEDGER_FILE};
pub use mapping::{ConfigError, MappingConfig, Mappings};
pub use rate_limit::{wait_if_needed, RateLimitInfo};
pub use record::{flatten, RawRecord, RawValue};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::RunSummary;
