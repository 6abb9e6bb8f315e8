//! Embedded SQLite record store.
//!
//! # Responsibility
//! - Run repository calls on the blocking pool so async callers never block.
//! - Scope each call to one session: a fresh connection for files, the
//!   shared connection for in-memory databases.
//!
//! # Invariants
//! - The in-memory connection is only touched while its mutex is held.
//! - A poisoned mutex or a failed worker surfaces as `Unavailable`.

use super::{RecordStore, StorageError, StorageResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::record::{NewRecord, Record, RecordId};
use crate::repo::record_repo::{RecordRepository, RepoResult, SqliteRecordRepository};
use async_trait::async_trait;
use log::{debug, error};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

const BACKEND: &str = "sqlite";

#[derive(Clone)]
enum Location {
    File(PathBuf),
    Memory(Arc<Mutex<Connection>>),
}

/// SQLite-backed [`RecordStore`].
#[derive(Clone)]
pub struct SqliteRecordStore {
    location: Location,
}

impl SqliteRecordStore {
    /// Store over a database file; nothing is opened until the first call.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
        }
    }

    /// Store over a fresh private in-memory database.
    ///
    /// # Errors
    /// - Returns an error when the schema cannot be created.
    pub fn in_memory() -> StorageResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self {
            location: Location::Memory(Arc::new(Mutex::new(conn))),
        })
    }

    /// Returns the database file path, or `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path.as_path()),
            Location::Memory(_) => None,
        }
    }

    async fn with_session<T, F>(&self, op: &'static str, f: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteRecordRepository<'_>) -> RepoResult<T> + Send + 'static,
    {
        let location = self.location.clone();
        let started_at = Instant::now();

        let result = tokio::task::spawn_blocking(move || match location {
            Location::File(path) => {
                let conn = open_db(&path)?;
                let repo = SqliteRecordRepository::new(&conn);
                f(&repo).map_err(StorageError::from)
            }
            Location::Memory(shared) => {
                let conn = shared
                    .lock()
                    .map_err(|_| StorageError::Unavailable("connection lock poisoned".into()))?;
                let repo = SqliteRecordRepository::new(&conn);
                f(&repo).map_err(StorageError::from)
            }
        })
        .await
        .map_err(|err| StorageError::Unavailable(format!("{op} worker failed: {err}")))
        .and_then(|inner| inner);

        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => debug!(
                "event=store_{op} module=store backend={BACKEND} status=ok duration_ms={duration_ms}"
            ),
            Err(err) => error!(
                "event=store_{op} module=store backend={BACKEND} status=error duration_ms={duration_ms} error={err}"
            ),
        }
        result
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn insert(&self, record: &NewRecord) -> StorageResult<RecordId> {
        let record = record.clone();
        self.with_session("insert", move |repo| repo.insert(&record)).await
    }

    async fn list_all(&self) -> StorageResult<Vec<Record>> {
        self.with_session("list_all", |repo| repo.list_all()).await
    }
}
