//! PostgreSQL record store.
//!
//! # Responsibility
//! - Persist records to a networked PostgreSQL service through `sqlx`.
//! - Create the `records` table on first successful use.
//!
//! # Invariants
//! - The pool connects lazily; construction performs no network I/O.
//! - Inserts run in their own transaction, rolled back when dropped.

use super::{RecordStore, StorageError, StorageResult};
use crate::model::record::{NewRecord, Record, RecordId};
use async_trait::async_trait;
use log::{debug, error, info};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

const BACKEND: &str = "postgres";
const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS records (
    record_id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL,
    topic TEXT NOT NULL,
    url TEXT NOT NULL
)";

const INSERT_SQL: &str = "INSERT INTO records (owner_id, topic, url)
VALUES ($1, $2, $3)
RETURNING record_id";

const LIST_ALL_SQL: &str = "SELECT record_id, owner_id, topic, url
FROM records
ORDER BY record_id ASC";

/// PostgreSQL-backed [`RecordStore`].
pub struct PgRecordStore {
    pool: PgPool,
    schema_ready: OnceCell<()>,
}

impl PgRecordStore {
    /// Builds a lazily connecting pool for `url`.
    ///
    /// # Errors
    /// - Returns an error when `url` is not a valid PostgreSQL connection
    ///   string.
    pub fn connect_lazy(url: &str) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy(url)?;

        Ok(Self {
            pool,
            schema_ready: OnceCell::new(),
        })
    }

    async fn ensure_schema(&self) -> StorageResult<()> {
        self.schema_ready
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
                info!("event=db_migrate module=store backend={BACKEND} status=ok");
                Ok::<(), StorageError>(())
            })
            .await?;
        Ok(())
    }

    async fn insert_in_transaction(&self, record: &NewRecord) -> StorageResult<RecordId> {
        self.ensure_schema().await?;

        let mut tx = self.pool.begin().await?;
        let record_id: RecordId = sqlx::query_scalar(INSERT_SQL)
            .bind(record.owner_id)
            .bind(record.topic.as_str())
            .bind(record.url.as_str())
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(record_id)
    }

    async fn select_all(&self) -> StorageResult<Vec<Record>> {
        self.ensure_schema().await?;

        let rows = sqlx::query(LIST_ALL_SQL).fetch_all(&self.pool).await?;
        rows.iter().map(parse_record_row).collect()
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn insert(&self, record: &NewRecord) -> StorageResult<RecordId> {
        let started_at = Instant::now();
        let result = self.insert_in_transaction(record).await;
        log_outcome("insert", started_at, &result);
        result
    }

    async fn list_all(&self) -> StorageResult<Vec<Record>> {
        let started_at = Instant::now();
        let result = self.select_all().await;
        log_outcome("list_all", started_at, &result);
        result
    }
}

fn parse_record_row(row: &PgRow) -> StorageResult<Record> {
    Ok(Record {
        record_id: checked_record_id(row.try_get("record_id")?)?,
        owner_id: row.try_get("owner_id")?,
        topic: row.try_get("topic")?,
        url: row.try_get("url")?,
    })
}

fn checked_record_id(record_id: RecordId) -> StorageResult<RecordId> {
    if record_id <= 0 {
        return Err(StorageError::InvalidData(format!(
            "invalid record_id value `{record_id}` in records.record_id"
        )));
    }
    Ok(record_id)
}

fn log_outcome<T>(op: &str, started_at: Instant, result: &StorageResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => debug!(
            "event=store_{op} module=store backend={BACKEND} status=ok duration_ms={duration_ms}"
        ),
        Err(err) => error!(
            "event=store_{op} module=store backend={BACKEND} status=error duration_ms={duration_ms} error={err}"
        ),
    }
}
