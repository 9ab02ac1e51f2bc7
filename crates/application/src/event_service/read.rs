use super::*;

impl EventService {
    /// Lists events ascending by start instant.
    pub async fn list_events(&self, filter: EventListFilter) -> AppResult<Vec<EventView>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to)
            && from > to
        {
            return Err(AppError::Validation(
                "'from' must not be after 'to'".to_owned(),
            ));
        }

        let events = self
            .events
            .list_events(EventListQuery {
                participant: filter.participant,
                from: filter.from,
                to: filter.to,
                limit: self.limits.resolve(filter.limit),
            })
            .await?;

        self.resolve_views(events).await
    }

    /// Lists the events one profile participates in.
    ///
    /// Fails with `NotFound` when the profile does not exist.
    pub async fn list_events_for_profile(
        &self,
        profile_id: ProfileId,
        filter: EventListFilter,
    ) -> AppResult<Vec<EventView>> {
        if self.profiles.find_profile(profile_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "profile '{profile_id}' not found"
            )));
        }

        self.list_events(EventListFilter {
            participant: Some(profile_id),
            ..filter
        })
        .await
    }

    /// Returns one event.
    pub async fn get_event(&self, event_id: EventId) -> AppResult<EventView> {
        let event = self.find_existing(event_id).await?;
        self.resolve_view(event).await
    }
}
