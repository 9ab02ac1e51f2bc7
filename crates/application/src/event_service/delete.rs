use super::*;

impl EventService {
    /// Deletes an event, logging its full prior state first.
    pub async fn delete_event(
        &self,
        event_id: EventId,
        deleted_by: Option<ProfileId>,
    ) -> AppResult<EventId> {
        let current = self.find_existing(event_id).await?;

        self.audit
            .record(NewEventLogEntry {
                event_id,
                updated_by: deleted_by,
                changed_at_utc: Utc::now(),
                diff: EventChange::Deleted(current).payload(),
            })
            .await;

        if !self.events.delete_event(event_id).await? {
            return Err(AppError::NotFound(format!("event '{event_id}' not found")));
        }
        info!(event_id = %event_id, "event deleted");

        Ok(event_id)
    }
}
