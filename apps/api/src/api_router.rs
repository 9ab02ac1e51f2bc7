mod cors;

use axum::Router;
use axum::routing::get;
use meridian_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(frontend_url)?;

    let api_routes = Router::new()
        .route(
            "/api/timezones",
            get(handlers::timezones::list_timezones_handler),
        )
        .route(
            "/api/profiles",
            get(handlers::profiles::list_profiles_handler)
                .post(handlers::profiles::create_profile_handler),
        )
        .route(
            "/api/profiles/{profile_id}",
            get(handlers::profiles::get_profile_handler)
                .put(handlers::profiles::update_profile_handler)
                .delete(handlers::profiles::delete_profile_handler),
        )
        .route(
            "/api/profiles/{profile_id}/events",
            get(handlers::events::list_profile_events_handler),
        )
        .route(
            "/api/events",
            get(handlers::events::list_events_handler)
                .post(handlers::events::create_event_handler),
        )
        .route(
            "/api/events/{event_id}",
            get(handlers::events::get_event_handler)
                .put(handlers::events::update_event_handler)
                .delete(handlers::events::delete_event_handler),
        )
        .route(
            "/api/events/{event_id}/logs",
            get(handlers::logs::list_event_logs_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
