use axum::Json;
use axum::extract::State;

use crate::dto::TimezoneListResponse;
use crate::state::AppState;

pub async fn list_timezones_handler(State(state): State<AppState>) -> Json<TimezoneListResponse> {
    Json(TimezoneListResponse {
        timezones: state
            .timezone_catalog
            .zone_names()
            .into_iter()
            .map(ToOwned::to_owned)
            .collect(),
    })
}
