use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use meridian_application::{CreateProfileInput, UpdateProfileInput};
use meridian_domain::ProfileId;

use crate::dto::{CreateProfileRequest, ProfileResponse, UpdateProfileRequest};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct ProfileListParams {
    pub search: Option<String>,
}

pub async fn list_profiles_handler(
    State(state): State<AppState>,
    Query(params): Query<ProfileListParams>,
) -> ApiResult<Json<Vec<ProfileResponse>>> {
    let profiles = state
        .profile_service
        .list_profiles(params.search.as_deref())
        .await?
        .into_iter()
        .map(ProfileResponse::from)
        .collect();

    Ok(Json(profiles))
}

pub async fn create_profile_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateProfileRequest>,
) -> ApiResult<(StatusCode, Json<ProfileResponse>)> {
    let profile = state
        .profile_service
        .create_profile(CreateProfileInput {
            name: payload.name,
            timezone: payload.timezone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))))
}

pub async fn get_profile_handler(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .profile_service
        .get_profile(ProfileId::parse(&profile_id)?)
        .await?;

    Ok(Json(ProfileResponse::from(profile)))
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .profile_service
        .update_profile(
            ProfileId::parse(&profile_id)?,
            UpdateProfileInput {
                name: payload.name,
                timezone: payload.timezone,
            },
        )
        .await?;

    Ok(Json(ProfileResponse::from(profile)))
}

pub async fn delete_profile_handler(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .profile_service
        .delete_profile(ProfileId::parse(&profile_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
