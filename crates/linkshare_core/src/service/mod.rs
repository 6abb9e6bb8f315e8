//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and store calls into use-case level APIs.
//! - Keep the HTTP layer decoupled from storage details.
//!
//! # Invariants
//! - Services hold no per-request state; every call stands alone.

pub mod listing_service;
pub mod submission_service;
