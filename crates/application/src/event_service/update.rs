use super::*;

impl EventService {
    /// Applies a partial update.
    ///
    /// Supplied boundaries are re-read in the resolved zone (the patch zone,
    /// else the stored one); omitted boundaries keep their UTC instants. A log
    /// entry is written only when a tracked field changed.
    pub async fn update_event(
        &self,
        event_id: EventId,
        patch: EventPatch,
        updated_by: Option<ProfileId>,
    ) -> AppResult<EventView> {
        let current = self.find_existing(event_id).await?;

        let event_timezone = match non_blank(patch.event_timezone.as_deref()) {
            Some(zone) => self.catalog.canonicalize(zone)?,
            None => current.event_timezone().clone(),
        };

        let resolve = |local: &str| self.catalog.local_to_utc(local, event_timezone.as_str());
        let start_at_utc = match non_blank(patch.start_local.as_deref()) {
            Some(local) => resolve_boundary(local, "start", &resolve)?,
            None => current.start_at_utc(),
        };
        let end_at_utc = match non_blank(patch.end_local.as_deref()) {
            Some(local) => resolve_boundary(local, "end", &resolve)?,
            None => current.end_at_utc(),
        };
        let interval = EventInterval::new(start_at_utc, end_at_utc)?;

        let mut updated = current.clone();
        if let Some(participants) = patch.participants {
            updated.replace_participants(participants)?;
            self.ensure_participants_exist(updated.participants())
                .await?;
        }
        validate_participants(updated.participants())?;
        if let Some(title) = patch.title.as_deref() {
            updated.set_title(normalize_title(Some(title))?);
        }
        updated.set_event_timezone(event_timezone);
        updated.set_interval(interval);

        let diff = build_diff(&current, &updated);
        if diff.is_empty() && updated.title() == current.title() {
            return self.resolve_view(current).await;
        }

        updated.touch(Utc::now());
        let stored = self.events.update_event(updated).await?;
        info!(
            event_id = %event_id,
            changed_fields = diff.len(),
            "event updated"
        );

        let change = EventChange::Updated(diff);
        if !change.is_noop() {
            let mut payload = change.payload();
            self.enrich_participant_names(event_id, &mut payload).await;
            self.audit
                .record(NewEventLogEntry {
                    event_id,
                    updated_by,
                    changed_at_utc: stored.updated_at_utc(),
                    diff: payload,
                })
                .await;
        }

        self.resolve_view(stored).await
    }
}
