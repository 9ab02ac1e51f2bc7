use super::*;

impl EventService {
    /// Creates an event from local wall-clock boundaries.
    ///
    /// Checks run fail-fast: structure, zone, boundaries, participant
    /// existence, creator existence. Nothing is persisted or logged on failure.
    pub async fn create_event(&self, input: CreateEventInput) -> AppResult<EventView> {
        let (event_timezone, interval) = validate_event_input(
            EventInputRef {
                participants: &input.participants,
                event_timezone: input.event_timezone.as_deref(),
                start_local: input.start_local.as_deref(),
                end_local: input.end_local.as_deref(),
            },
            &self.catalog,
        )?;
        let title = normalize_title(input.title.as_deref())?;

        self.ensure_participants_exist(&input.participants).await?;
        if let Some(creator) = input.created_by
            && self.profiles.find_profile(creator).await?.is_none()
        {
            return Err(AppError::Validation(format!(
                "creator '{creator}' does not exist"
            )));
        }

        let event = Event::new(
            input.participants,
            event_timezone,
            interval,
            input.created_by,
            Utc::now(),
        )?
        .with_title(title);

        self.events.create_event(event.clone()).await?;
        info!(
            event_id = %event.id(),
            participants = event.participants().len(),
            timezone = %event.event_timezone(),
            "event created"
        );

        self.audit
            .record(NewEventLogEntry {
                event_id: event.id(),
                updated_by: event.created_by(),
                changed_at_utc: event.created_at_utc(),
                diff: EventChange::Created(event.clone()).payload(),
            })
            .await;

        self.resolve_view(event).await
    }
}
