use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use meridian_application::{EventListQuery, EventRepository};
use meridian_core::{AppError, AppResult};
use meridian_domain::{
    CanonicalTimezone, Event, EventId, EventInterval, EventParts, ProfileId,
};

/// PostgreSQL-backed event repository.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: Option<String>,
    participants: Vec<Uuid>,
    event_timezone: String,
    start_at_utc: DateTime<Utc>,
    end_at_utc: DateTime<Utc>,
    created_by: Option<Uuid>,
    created_at_utc: DateTime<Utc>,
    updated_at_utc: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let interval = EventInterval::new(row.start_at_utc, row.end_at_utc).map_err(|error| {
            AppError::Internal(format!("stored event '{}' is invalid: {error}", row.id))
        })?;

        Ok(Event::from_parts(EventParts {
            id: EventId::from_uuid(row.id),
            title: row.title,
            participants: row
                .participants
                .into_iter()
                .map(ProfileId::from_uuid)
                .collect(),
            event_timezone: CanonicalTimezone::from_stored(row.event_timezone),
            interval,
            created_by: row.created_by.map(ProfileId::from_uuid),
            created_at_utc: row.created_at_utc,
            updated_at_utc: row.updated_at_utc,
        }))
    }
}

fn participant_uuids(event: &Event) -> Vec<Uuid> {
    event
        .participants()
        .iter()
        .map(ProfileId::as_uuid)
        .collect()
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn create_event(&self, event: Event) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO events (
                id,
                title,
                participants,
                event_timezone,
                start_at_utc,
                end_at_utc,
                created_by,
                created_at_utc,
                updated_at_utc
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.title())
        .bind(participant_uuids(&event))
        .bind(event.event_timezone().as_str())
        .bind(event.start_at_utc())
        .bind(event.end_at_utc())
        .bind(event.created_by().map(|id| id.as_uuid()))
        .bind(event.created_at_utc())
        .bind(event.updated_at_utc())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create event: {error}")))?;

        Ok(())
    }

    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT
                id,
                title,
                participants,
                event_timezone,
                start_at_utc,
                end_at_utc,
                created_by,
                created_at_utc,
                updated_at_utc
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find event: {error}")))?;

        row.map(Event::try_from).transpose()
    }

    async fn list_events(&self, query: EventListQuery) -> AppResult<Vec<Event>> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT
                id,
                title,
                participants,
                event_timezone,
                start_at_utc,
                end_at_utc,
                created_by,
                created_at_utc,
                updated_at_utc
            FROM events
            WHERE ($1::UUID IS NULL OR $1 = ANY(participants))
                AND ($2::TIMESTAMPTZ IS NULL OR start_at_utc >= $2)
                AND ($3::TIMESTAMPTZ IS NULL OR start_at_utc <= $3)
            ORDER BY start_at_utc ASC, id ASC
            LIMIT $4
            "#,
        )
        .bind(query.participant.map(|id| id.as_uuid()))
        .bind(query.from)
        .bind(query.to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list events: {error}")))?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn update_event(&self, event: Event) -> AppResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET
                title = $2,
                participants = $3,
                event_timezone = $4,
                start_at_utc = $5,
                end_at_utc = $6,
                updated_at_utc = $7
            WHERE id = $1
            RETURNING
                id,
                title,
                participants,
                event_timezone,
                start_at_utc,
                end_at_utc,
                created_by,
                created_at_utc,
                updated_at_utc
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.title())
        .bind(participant_uuids(&event))
        .bind(event.event_timezone().as_str())
        .bind(event.start_at_utc())
        .bind(event.end_at_utc())
        .bind(event.updated_at_utc())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update event: {error}")))?;

        let Some(row) = row else {
            return Err(AppError::NotFound(format!(
                "event '{}' not found",
                event.id()
            )));
        };

        Event::try_from(row)
    }

    async fn delete_event(&self, event_id: EventId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete event: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_participant(
        &self,
        profile_id: ProfileId,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET participants = array_remove(participants, $1), updated_at_utc = $2
            WHERE $1 = ANY(participants)
            "#,
        )
        .bind(profile_id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to remove participant from events: {error}"))
        })?;

        debug!(
            profile_id = %profile_id,
            events_touched = result.rows_affected(),
            "removed participant from events"
        );

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests;
