use super::{
    ConnectionSpec, StatusRecord, Store, StoreError, TimelineEntry, TimelineLimit, STATUS_ID,
};
use crate::config::Config;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

const SCHEMA: &str = include_str!("schema.sql");

type EntryRow = (i32, Option<String>, Option<String>, Option<String>);

/// Postgres-backed store over a lazily connecting, TLS-only pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    op_timeout: Duration,
}

impl PgStore {
    /// Build the pool from `config.database_url`. No connection is opened
    /// until the first operation needs one.
    pub fn connect(config: &Config) -> Result<Self, StoreError> {
        let spec = ConnectionSpec::parse(&config.database_url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
            .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout_secs)))
            .test_before_acquire(true)
            .connect_lazy_with(spec.connect_options());

        info!(
            host = %spec.host,
            port = spec.port,
            database = %spec.database,
            "Database: Pool configured"
        );

        Ok(Self {
            pool,
            op_timeout: Duration::from_secs(config.db_operation_timeout_secs),
        })
    }

    /// Create the `status` and `timeline` tables if they are missing.
    pub async fn execute_init(&self) -> Result<(), StoreError> {
        info!("Database: Initializing schema...");
        self.run("initializing schema", sqlx::raw_sql(SCHEMA).execute(&self.pool))
            .await?;
        debug!("Database: Schema initialized successfully");
        Ok(())
    }

    async fn run<T, F>(&self, action: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let err = match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => StoreError::from_sqlx(action, e),
            Err(_) => StoreError::Timeout {
                action,
                secs: self.op_timeout.as_secs(),
            },
        };

        if let StoreError::Connection { reason } = &err {
            warn!("Database: Connection failure while {}: {}", action, reason);
        }
        Err(err)
    }
}

fn entry_from_row((id, date, title, description): EntryRow) -> TimelineEntry {
    TimelineEntry {
        id,
        date: date.unwrap_or_default(),
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_status(&self) -> Result<StatusRecord, StoreError> {
        let row = self
            .run(
                "getting status",
                sqlx::query_as::<_, (Option<String>, Option<String>)>(
                    r#"SELECT "type", message FROM status WHERE id = $1"#,
                )
                .bind(STATUS_ID)
                .fetch_optional(&self.pool),
            )
            .await?;

        let (kind, message) = row.ok_or(StoreError::StatusNotFound)?;
        Ok(StatusRecord {
            kind: kind.unwrap_or_default(),
            message: message.unwrap_or_default(),
        })
    }

    async fn set_status(&self, kind: &str, message: &str) -> Result<StatusRecord, StoreError> {
        debug!("Database: Setting status to {}", kind);
        let (kind, message) = self
            .run(
                "updating status",
                sqlx::query_as::<_, (Option<String>, Option<String>)>(
                    r#"
                    INSERT INTO status (id, "type", message)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (id) DO UPDATE SET "type" = EXCLUDED."type", message = EXCLUDED.message
                    RETURNING "type", message
                    "#,
                )
                .bind(STATUS_ID)
                .bind(kind)
                .bind(message)
                .fetch_one(&self.pool),
            )
            .await?;

        Ok(StatusRecord {
            kind: kind.unwrap_or_default(),
            message: message.unwrap_or_default(),
        })
    }

    async fn add_timeline_entry(
        &self,
        date: &str,
        title: &str,
        description: &str,
    ) -> Result<TimelineEntry, StoreError> {
        let row = self
            .run(
                "adding timeline entry",
                sqlx::query_as::<_, EntryRow>(
                    r#"
                    INSERT INTO timeline (date, title, description)
                    VALUES ($1, $2, $3)
                    RETURNING id, date, title, description
                    "#,
                )
                .bind(date)
                .bind(title)
                .bind(description)
                .fetch_one(&self.pool),
            )
            .await?;

        debug!("Database: Added timeline entry {}", row.0);
        Ok(entry_from_row(row))
    }

    async fn get_timeline_entries(&self, limit: i64) -> Result<Vec<TimelineEntry>, StoreError> {
        let limit = TimelineLimit::new(limit)?;
        let rows = self
            .run(
                "getting timeline entries",
                sqlx::query_as::<_, EntryRow>(
                    "SELECT id, date, title, description FROM timeline ORDER BY id DESC LIMIT $1",
                )
                .bind(limit.get())
                .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows.into_iter().map(entry_from_row).collect())
    }

    async fn edit_timeline_entry(
        &self,
        id: i32,
        date: &str,
        title: &str,
        description: &str,
    ) -> Result<TimelineEntry, StoreError> {
        let row = self
            .run(
                "updating timeline entry",
                sqlx::query_as::<_, EntryRow>(
                    r#"
                    UPDATE timeline SET date = $2, title = $3, description = $4
                    WHERE id = $1
                    RETURNING id, date, title, description
                    "#,
                )
                .bind(id)
                .bind(date)
                .bind(title)
                .bind(description)
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(entry_from_row)
            .ok_or(StoreError::EntryNotFound(id))
    }
}
