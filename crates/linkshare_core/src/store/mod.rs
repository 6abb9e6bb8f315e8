//! Record store backends shared by request handlers.
//!
//! # Responsibility
//! - Define the async `RecordStore` seam used by services.
//! - Select a backend (embedded SQLite or PostgreSQL) from a connection URL.
//!
//! # Invariants
//! - `insert` is atomic: one committed row or none.
//! - `list_all` returns records ordered by `record_id` ascending.
//! - A failed operation never poisons the store for later calls.

mod postgres;
mod sqlite;
pub mod target;

pub use postgres::PgRecordStore;
pub use sqlite::SqliteRecordStore;
pub use target::{normalize_database_url, StorageTarget};

use crate::model::record::{NewRecord, Record, RecordId};
use crate::repo::record_repo::RepoError;
use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure talking to the backing medium.
///
/// The `Display` text is what callers surface to users.
#[derive(Debug)]
pub enum StorageError {
    /// SQLite open, migration, or statement failure.
    Sqlite(RepoError),
    /// PostgreSQL connection or statement failure.
    Postgres(sqlx::Error),
    /// The blocking worker or the shared connection could not be used.
    Unavailable(String),
    /// The connection URL cannot be mapped to a backend.
    InvalidTarget(String),
    /// A stored row violates record invariants.
    InvalidData(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Postgres(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::InvalidTarget(message) => write!(f, "invalid database url: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Postgres(err) => Some(err),
            Self::Unavailable(_) | Self::InvalidTarget(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<RepoError> for StorageError {
    fn from(value: RepoError) -> Self {
        Self::Sqlite(value)
    }
}

impl From<crate::db::DbError> for StorageError {
    fn from(value: crate::db::DbError) -> Self {
        Self::Sqlite(RepoError::Db(value))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(value: sqlx::Error) -> Self {
        Self::Postgres(value)
    }
}

/// Durable table of shared link records.
///
/// Implementations scope every call to its own session and transaction.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend label used in log events.
    fn backend(&self) -> &'static str;

    /// Persists one validated record and returns its newly assigned id.
    async fn insert(&self, record: &NewRecord) -> StorageResult<RecordId>;

    /// Returns every stored record, oldest first.
    async fn list_all(&self) -> StorageResult<Vec<Record>>;
}

/// Builds the store described by `target`.
///
/// SQLite file stores and PostgreSQL pools connect on first use, so an
/// unreachable medium surfaces per operation rather than here.
///
/// # Errors
/// - In-memory SQLite bootstrap failures.
/// - PostgreSQL URLs the driver cannot parse.
pub fn connect(target: &StorageTarget) -> StorageResult<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match target {
        StorageTarget::SqliteMemory => Arc::new(SqliteRecordStore::in_memory()?),
        StorageTarget::SqliteFile(path) => Arc::new(SqliteRecordStore::file(path.clone())),
        StorageTarget::Postgres(url) => Arc::new(PgRecordStore::connect_lazy(url)?),
    };

    info!(
        "event=store_connect module=store status=ok backend={} target={}",
        store.backend(),
        target.redacted()
    );
    Ok(store)
}
