//! Submission use-case service.
//!
//! # Responsibility
//! - Validate a raw submission, persist it, and describe what the caller
//!   should do next.
//!
//! # Invariants
//! - Validation failures never touch the store.
//! - Each accepted submission creates exactly one record; every failure path
//!   creates none.
//! - Storage failures are returned as values, never raised as panics.

use crate::model::record::RecordId;
use crate::model::submission::{validate_submission, RawSubmission, SubmissionErrors};
use crate::store::RecordStore;
use log::{error, info};
use std::sync::Arc;

/// Path of the confirmation page shown after a successful submission.
pub const CONFIRMATION_PATH: &str = "/index_upload";

/// Result of one submission attempt.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Record persisted; the caller should redirect to `redirect_to`.
    Accepted {
        record_id: RecordId,
        redirect_to: &'static str,
    },
    /// Validation failed; re-present `input` with `errors`.
    Rejected {
        input: RawSubmission,
        errors: SubmissionErrors,
    },
    /// The store refused or could not be reached; nothing was persisted.
    StorageFailed { message: String },
}

/// Use-case service for the share form.
#[derive(Clone)]
pub struct SubmissionService {
    store: Arc<dyn RecordStore>,
}

impl SubmissionService {
    /// Creates a service over the provided store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Handles one raw submission end to end.
    ///
    /// # Contract
    /// - Invalid input returns `Rejected` with the untouched input.
    /// - Valid input is inserted once; success returns `Accepted` pointing at
    ///   [`CONFIRMATION_PATH`].
    /// - Insert failures return `StorageFailed` carrying the error text.
    pub async fn submit(&self, raw: RawSubmission) -> SubmissionOutcome {
        let record = match validate_submission(&raw) {
            Ok(record) => record,
            Err(errors) => {
                let fields = errors
                    .errors()
                    .iter()
                    .map(|error| error.field.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                info!("event=submission module=service status=rejected fields={fields}");
                return SubmissionOutcome::Rejected { input: raw, errors };
            }
        };

        match self.store.insert(&record).await {
            Ok(record_id) => {
                info!(
                    "event=submission module=service status=ok backend={} record_id={record_id}",
                    self.store.backend()
                );
                SubmissionOutcome::Accepted {
                    record_id,
                    redirect_to: CONFIRMATION_PATH,
                }
            }
            Err(err) => {
                error!(
                    "event=submission module=service status=error backend={} error_code=insert_failed",
                    self.store.backend()
                );
                SubmissionOutcome::StorageFailed {
                    message: err.to_string(),
                }
            }
        }
    }
}
