use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use meridian_application::{
    EventLogEntry, EventLogEntryId, EventLogRepository, NewEventLogEntry,
};
use meridian_core::{AppError, AppResult};
use meridian_domain::{EventId, ProfileId};

/// PostgreSQL-backed append-only event log.
#[derive(Clone)]
pub struct PostgresEventLogRepository {
    pool: PgPool,
}

impl PostgresEventLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventLogRow {
    id: Uuid,
    event_id: Uuid,
    updated_by: Option<Uuid>,
    changed_at_utc: DateTime<Utc>,
    diff: Value,
}

impl From<EventLogRow> for EventLogEntry {
    fn from(row: EventLogRow) -> Self {
        Self {
            id: EventLogEntryId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            updated_by: row.updated_by.map(ProfileId::from_uuid),
            changed_at_utc: row.changed_at_utc,
            diff: row.diff,
        }
    }
}

#[async_trait]
impl EventLogRepository for PostgresEventLogRepository {
    async fn append_entry(&self, entry: NewEventLogEntry) -> AppResult<EventLogEntry> {
        let row = sqlx::query_as::<_, EventLogRow>(
            r#"
            INSERT INTO event_log_entries (id, event_id, updated_by, changed_at_utc, diff)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, event_id, updated_by, changed_at_utc, diff
            "#,
        )
        .bind(EventLogEntryId::new().as_uuid())
        .bind(entry.event_id.as_uuid())
        .bind(entry.updated_by.map(|id| id.as_uuid()))
        .bind(entry.changed_at_utc)
        .bind(entry.diff)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to append event log entry: {error}"))
        })?;

        Ok(row.into())
    }

    async fn list_entries_for_event(&self, event_id: EventId) -> AppResult<Vec<EventLogEntry>> {
        let rows = sqlx::query_as::<_, EventLogRow>(
            r#"
            SELECT id, event_id, updated_by, changed_at_utc, diff
            FROM event_log_entries
            WHERE event_id = $1
            ORDER BY changed_at_utc DESC, sequence DESC
            "#,
        )
        .bind(event_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list event log entries: {error}"))
        })?;

        Ok(rows.into_iter().map(EventLogEntry::from).collect())
    }
}
