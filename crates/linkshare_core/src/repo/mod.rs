//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record data access contract (`insert`, `list_all`).
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Writes are single-row and transactional.
//! - Read paths reject invalid persisted rows with `InvalidData`.

pub mod record_repo;
