//! Persistence for the status record and the timeline log.
//!
//! Both live in a remote Postgres database. Every operation goes through the
//! [`Store`] trait so command handlers never see which backend they talk to.

mod connection;
mod memory;
mod postgres;

pub use connection::ConnectionSpec;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::config::Config;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Fixed identity of the singleton status row.
pub const STATUS_ID: &str = "current";

/// Upper bound on entries returned by one timeline read.
/// Matches the number of fields a single Discord embed can carry.
pub const MAX_TIMELINE_LIMIT: i64 = 25;

/// Entries shown by `/timeline view` when no limit is given.
pub const DEFAULT_TIMELINE_LIMIT: i64 = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed connection string or network/auth failure. The cause is
    /// kept for logs only.
    #[error("Failed to connect to database")]
    Connection { reason: String },
    #[error("No status found in database")]
    StatusNotFound,
    #[error("Timeline entry with ID {0} not found")]
    EntryNotFound(i32),
    #[error("Error {action}: {source}")]
    Query {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("Error {action}: timed out after {secs}s")]
    Timeout { action: &'static str, secs: u64 },
    #[error("Timeline limit must be between 1 and {max}, got {limit}")]
    InvalidLimit { limit: i64, max: i64 },
}

impl StoreError {
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection {
            reason: reason.into(),
        }
    }

    /// Sort a driver error into the connection or query bucket.
    pub(crate) fn from_sqlx(action: &'static str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_) => Self::connection(err.to_string()),
            sqlx::Error::Database(ref db_err)
                if db_err.code().is_some_and(|code| is_connect_failure_code(&code)) =>
            {
                Self::connection(err.to_string())
            }
            other => Self::Query {
                action,
                source: other,
            },
        }
    }
}

/// SQLSTATEs the server sends while refusing a session: connection
/// exceptions (08), bad credentials (28), unknown database, server
/// starting up or out of slots.
fn is_connect_failure_code(code: &str) -> bool {
    code.starts_with("08")
        || code.starts_with("28")
        || matches!(code, "3D000" | "57P03" | "53300")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub id: i32,
    pub date: String,
    pub title: String,
    pub description: String,
}

/// Validated row bound for timeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineLimit(i64);

impl TimelineLimit {
    pub fn new(limit: i64) -> Result<Self, StoreError> {
        if (1..=MAX_TIMELINE_LIMIT).contains(&limit) {
            Ok(Self(limit))
        } else {
            Err(StoreError::InvalidLimit {
                limit,
                max: MAX_TIMELINE_LIMIT,
            })
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

/// Status and timeline persistence.
///
/// The store does not validate `kind` against the status choices; callers
/// restrict it through the slash command's choice list.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_status(&self) -> Result<StatusRecord, StoreError>;

    /// Insert the singleton status row or overwrite it, atomically.
    async fn set_status(&self, kind: &str, message: &str) -> Result<StatusRecord, StoreError>;

    async fn add_timeline_entry(
        &self,
        date: &str,
        title: &str,
        description: &str,
    ) -> Result<TimelineEntry, StoreError>;

    /// Most recent entries first. Rejects limits outside `1..=MAX_TIMELINE_LIMIT`
    /// before touching the database.
    async fn get_timeline_entries(&self, limit: i64) -> Result<Vec<TimelineEntry>, StoreError>;

    async fn edit_timeline_entry(
        &self,
        id: i32,
        date: &str,
        title: &str,
        description: &str,
    ) -> Result<TimelineEntry, StoreError>;
}

/// Open the backend named by `config.database_url`.
pub async fn open_store(config: &Config) -> Result<Arc<dyn Store>, StoreError> {
    if config.database_url.starts_with(MemoryStore::URL_SCHEME) {
        info!("Database: Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(config)?;
    if config.db_init_schema {
        store.execute_init().await?;
    }
    Ok(Arc::new(store))
}
