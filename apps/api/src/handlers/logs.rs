use axum::Json;
use axum::extract::{Path, State};
use meridian_domain::EventId;

use crate::dto::EventLogEntryResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_event_logs_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<Vec<EventLogEntryResponse>>> {
    let entries = state
        .event_log_service
        .logs_for_event(EventId::parse(&event_id)?)
        .await?
        .into_iter()
        .map(EventLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
