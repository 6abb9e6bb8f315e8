//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the write-once/read-many API over the `records` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `insert` commits exactly one row or nothing.
//! - `list_all` orders by `record_id` ascending (insertion order).
//! - All statements are parameterized.

use crate::db::DbError;
use crate::model::record::{NewRecord, Record, RecordId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_SELECT_SQL: &str = "SELECT
    record_id,
    owner_id,
    topic,
    url
FROM records";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for record persistence.
pub trait RecordRepository {
    /// Persists one validated record and returns its assigned id.
    fn insert(&self, record: &NewRecord) -> RepoResult<RecordId>;
    /// Returns every stored record, oldest first.
    fn list_all(&self) -> RepoResult<Vec<Record>>;
}

/// SQLite-backed record repository bound to one borrowed connection.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn insert(&self, record: &NewRecord) -> RepoResult<RecordId> {
        // Dropping `tx` on any early return rolls the row back.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO records (
                owner_id,
                topic,
                url
            ) VALUES (?1, ?2, ?3);",
            params![record.owner_id, record.topic.as_str(), record.url.as_str()],
        )?;
        let record_id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(record_id)
    }

    fn list_all(&self) -> RepoResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY record_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let record_id: RecordId = row.get("record_id")?;
    if record_id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid record_id value `{record_id}` in records.record_id"
        )));
    }

    Ok(Record {
        record_id,
        owner_id: row.get("owner_id")?,
        topic: row.get("topic")?,
        url: row.get("url")?,
    })
}
