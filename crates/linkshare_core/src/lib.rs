//! Core domain logic for LinkShare.
//! This crate is the single source of truth for submission rules and
//! record persistence; the HTTP layer only translates its results.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging};
pub use model::record::{NewRecord, OwnerId, Record, RecordId};
pub use model::submission::{
    validate_submission, FieldError, FieldErrorKind, RawSubmission, SubmissionErrors,
    SubmissionField,
};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordRepository};
pub use service::listing_service::{Listing, ListingService};
pub use service::submission_service::{SubmissionOutcome, SubmissionService, CONFIRMATION_PATH};
pub use store::{
    connect, normalize_database_url, PgRecordStore, RecordStore, SqliteRecordStore,
    StorageError, StorageResult, StorageTarget,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
