//! Domain model for shared link records.
//!
//! # Responsibility
//! - Define the persisted `Record` shape and its write-side input.
//! - Own the pure validation applied to raw form submissions.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `RecordId`.
//! - Records are write-once: there is no update or delete shape.

pub mod record;
pub mod submission;
