use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use meridian_application::{CreateEventInput, EventListFilter, EventPatch};
use meridian_core::AppResult;
use meridian_domain::{EventId, ProfileId};

use crate::dto::{
    CreateEventRequest, DeleteEventRequest, DeleteEventResponse, EventResponse, UpdateEventRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{parse_instant_param, parse_optional_profile_id};

/// Filter and range parameters of the event listing.
#[derive(Debug, Default, serde::Deserialize)]
pub struct EventListParams {
    pub profile_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<usize>,
}

/// Range parameters of a per-profile listing.
#[derive(Debug, Default, serde::Deserialize)]
pub struct EventRangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<usize>,
}

impl EventRangeParams {
    fn into_filter(self, participant: Option<ProfileId>) -> AppResult<EventListFilter> {
        Ok(EventListFilter {
            participant,
            from: parse_instant_param("from", self.from.as_deref())?,
            to: parse_instant_param("to", self.to.as_deref())?,
            limit: self.limit,
        })
    }
}

fn parse_participants(values: &[String]) -> AppResult<Vec<ProfileId>> {
    values.iter().map(|value| ProfileId::parse(value)).collect()
}

pub async fn list_events_handler(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let participant = parse_optional_profile_id(params.profile_id.as_deref())?;
    let filter = EventRangeParams {
        from: params.from,
        to: params.to,
        limit: params.limit,
    }
    .into_filter(participant)?;

    let events = state
        .event_service
        .list_events(filter)
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(events))
}

pub async fn list_profile_events_handler(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(params): Query<EventRangeParams>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let profile_id = ProfileId::parse(&profile_id)?;
    let filter = params.into_filter(None)?;

    let events = state
        .event_service
        .list_events_for_profile(profile_id, filter)
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(events))
}

pub async fn create_event_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let event = state
        .event_service
        .create_event(CreateEventInput {
            participants: parse_participants(&payload.participants)?,
            event_timezone: payload.event_timezone,
            start_local: payload.start_local,
            end_local: payload.end_local,
            title: payload.title,
            created_by: parse_optional_profile_id(payload.created_by.as_deref())?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

pub async fn get_event_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<EventResponse>> {
    let event = state
        .event_service
        .get_event(EventId::parse(&event_id)?)
        .await?;

    Ok(Json(EventResponse::from(event)))
}

pub async fn update_event_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let participants = payload
        .participants
        .as_deref()
        .map(parse_participants)
        .transpose()?;
    let updated_by = parse_optional_profile_id(payload.updated_by.as_deref())?;

    let event = state
        .event_service
        .update_event(
            EventId::parse(&event_id)?,
            EventPatch {
                participants,
                event_timezone: payload.event_timezone,
                start_local: payload.start_local,
                end_local: payload.end_local,
                title: payload.title,
            },
            updated_by,
        )
        .await?;

    Ok(Json(EventResponse::from(event)))
}

pub async fn delete_event_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    payload: Option<Json<DeleteEventRequest>>,
) -> ApiResult<Json<DeleteEventResponse>> {
    let payload = payload.map(|Json(body)| body).unwrap_or_default();
    let deleted_by = parse_optional_profile_id(payload.deleted_by.as_deref())?;

    let deleted = state
        .event_service
        .delete_event(EventId::parse(&event_id)?, deleted_by)
        .await?;

    Ok(Json(DeleteEventResponse {
        id: deleted.to_string(),
    }))
}
