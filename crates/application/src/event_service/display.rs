use super::*;

impl EventService {
    pub(super) async fn resolve_view(&self, event: Event) -> AppResult<EventView> {
        self.resolve_views(vec![event])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("event view resolution returned nothing".to_owned()))
    }

    /// Resolves every referenced profile with one lookup.
    pub(super) async fn resolve_views(&self, events: Vec<Event>) -> AppResult<Vec<EventView>> {
        let referenced: BTreeSet<ProfileId> = events
            .iter()
            .flat_map(|event| {
                event
                    .participants()
                    .iter()
                    .copied()
                    .chain(event.created_by())
            })
            .collect();

        let profiles: HashMap<ProfileId, Profile> = if referenced.is_empty() {
            HashMap::new()
        } else {
            let ids: Vec<ProfileId> = referenced.into_iter().collect();
            self.profiles
                .find_profiles(&ids)
                .await?
                .into_iter()
                .map(|profile| (profile.id(), profile))
                .collect()
        };

        Ok(events
            .into_iter()
            .map(|event| self.view_for(event, &profiles))
            .collect())
    }

    fn view_for(&self, event: Event, profiles: &HashMap<ProfileId, Profile>) -> EventView {
        let participants = event
            .participants()
            .iter()
            .filter_map(|id| profiles.get(id))
            .map(|profile| ParticipantView {
                id: profile.id(),
                name: profile.name().as_str().to_owned(),
                timezone: profile.timezone().clone(),
                local_start: self
                    .catalog
                    .utc_to_local(event.start_at_utc(), profile.timezone().as_str()),
                local_end: self
                    .catalog
                    .utc_to_local(event.end_at_utc(), profile.timezone().as_str()),
            })
            .collect();
        let created_by = event
            .created_by()
            .and_then(|id| profiles.get(&id))
            .map(ProfileSummary::from);

        EventView {
            event,
            participants,
            created_by,
        }
    }

    /// Replaces participant ids in a diff payload with profile names.
    ///
    /// Ids that no longer resolve stay as they are. A failed lookup leaves
    /// the payload untouched.
    pub(super) async fn enrich_participant_names(&self, event_id: EventId, payload: &mut Value) {
        let Some(change) = payload.get_mut(TrackedField::Participants.as_str()) else {
            return;
        };

        let ids: BTreeSet<ProfileId> = ["from", "to"]
            .iter()
            .filter_map(|side| change.get(side).and_then(Value::as_array))
            .flatten()
            .filter_map(Value::as_str)
            .filter_map(|raw| ProfileId::parse(raw).ok())
            .collect();
        if ids.is_empty() {
            return;
        }

        let ids: Vec<ProfileId> = ids.into_iter().collect();
        let names: HashMap<String, String> = match self.profiles.find_profiles(&ids).await {
            Ok(profiles) => profiles
                .iter()
                .map(|profile| (profile.id().to_string(), profile.name().as_str().to_owned()))
                .collect(),
            Err(error) => {
                warn!(
                    event_id = %event_id,
                    error = %error,
                    "failed to resolve participant names for event log, keeping ids"
                );
                return;
            }
        };

        for side in ["from", "to"] {
            if let Some(Value::Array(items)) = change.get_mut(side) {
                for item in items.iter_mut() {
                    if let Some(name) = item.as_str().and_then(|raw| names.get(raw)) {
                        *item = Value::String(name.clone());
                    }
                }
            }
        }
    }
}
