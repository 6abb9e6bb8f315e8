//! Database URL parsing.
//!
//! # Responsibility
//! - Normalize legacy connection-string scheme aliases.
//! - Map a connection string onto a concrete storage backend.
//!
//! # Invariants
//! - Only the scheme prefix is ever rewritten; the rest is kept verbatim.
//! - Credentials never appear in `redacted()` output.

use super::{StorageError, StorageResult};
use std::path::PathBuf;
use url::Url;

const LEGACY_POSTGRES_SCHEME: &str = "postgres://";
const POSTGRES_SCHEME: &str = "postgresql://";
const SQLITE_SCHEME: &str = "sqlite://";
const SQLITE_MEMORY_PATH: &str = ":memory:";

/// Backing medium selected by a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    /// Private in-memory SQLite database, lost on shutdown.
    SqliteMemory,
    /// SQLite database file.
    SqliteFile(PathBuf),
    /// PostgreSQL server; holds the normalized URL.
    Postgres(String),
}

/// Rewrites the legacy `postgres://` scheme to `postgresql://`.
///
/// Surrounding whitespace is trimmed; any other input is returned unchanged.
pub fn normalize_database_url(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_prefix(LEGACY_POSTGRES_SCHEME) {
        Some(rest) => format!("{POSTGRES_SCHEME}{rest}"),
        None => trimmed.to_string(),
    }
}

impl StorageTarget {
    /// Parses a connection string.
    ///
    /// # Accepted forms
    /// - `sqlite://` or `sqlite:///:memory:`: in-memory database.
    /// - `sqlite:///relative.db`: file relative to the working directory.
    /// - `sqlite:////absolute.db`: absolute file path.
    /// - `postgresql://...` or the legacy `postgres://...`.
    ///
    /// # Errors
    /// - `InvalidTarget` for empty input, SQLite URLs with a host, and
    ///   unsupported schemes.
    pub fn parse(raw: &str) -> StorageResult<Self> {
        let normalized = normalize_database_url(raw);
        if normalized.is_empty() {
            return Err(StorageError::InvalidTarget(
                "database url cannot be empty".to_string(),
            ));
        }

        if normalized.starts_with(POSTGRES_SCHEME) {
            return Ok(Self::Postgres(normalized));
        }

        if let Some(rest) = normalized.strip_prefix(SQLITE_SCHEME) {
            return parse_sqlite_path(rest);
        }

        let scheme = normalized
            .split_once("://")
            .map_or(normalized.as_str(), |(scheme, _)| scheme);
        Err(StorageError::InvalidTarget(format!(
            "unsupported scheme `{scheme}`; expected sqlite:// or postgresql://"
        )))
    }

    /// Returns a log-safe description of the target.
    pub fn redacted(&self) -> String {
        match self {
            Self::SqliteMemory => format!("{SQLITE_SCHEME}/{SQLITE_MEMORY_PATH}"),
            Self::SqliteFile(path) => format!("{SQLITE_SCHEME}/{}", path.display()),
            Self::Postgres(url) => redact_password(url),
        }
    }
}

fn parse_sqlite_path(rest: &str) -> StorageResult<StorageTarget> {
    if rest.is_empty() {
        return Ok(StorageTarget::SqliteMemory);
    }

    let Some(path) = rest.strip_prefix('/') else {
        return Err(StorageError::InvalidTarget(format!(
            "sqlite urls take no host; use sqlite:///<path>, got `{SQLITE_SCHEME}{rest}`"
        )));
    };

    if path.is_empty() || path == SQLITE_MEMORY_PATH {
        return Ok(StorageTarget::SqliteMemory);
    }

    Ok(StorageTarget::SqliteFile(PathBuf::from(path)))
}

fn redact_password(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() && parsed.set_password(Some("****")).is_err() {
                return "postgresql://<redacted>".to_string();
            }
            parsed.to_string()
        }
        Err(_) => "postgresql://<unparseable>".to_string(),
    }
}
