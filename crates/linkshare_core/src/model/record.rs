//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical persisted link record.
//! - Define the validated insert payload handed to storage.
//!
//! # Invariants
//! - `record_id` is assigned by storage, is positive and never reused.
//! - A record is never mutated after it has been persisted.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a persisted record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = i64;

/// Identifier of the person who shared a link.
pub type OwnerId = i64;

/// One shared link as stored in the `records` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Monotonically assigned primary identity.
    pub record_id: RecordId,
    /// Person identifier supplied by the submitter; not unique.
    pub owner_id: OwnerId,
    /// Free-text topic, never blank.
    pub topic: String,
    /// Absolute URL with scheme and host.
    pub url: String,
}

/// Validated payload for one insert.
///
/// Only produced by [`crate::model::submission::validate_submission`] in
/// production paths, so holding one means the field checks passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub owner_id: OwnerId,
    pub topic: String,
    pub url: String,
}

impl NewRecord {
    /// Attaches a store-assigned id, producing the persisted shape.
    pub fn into_record(self, record_id: RecordId) -> Record {
        Record {
            record_id,
            owner_id: self.owner_id,
            topic: self.topic,
            url: self.url,
        }
    }
}
