use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        cache::{clear, diagnostics, invalidate_user},
        free_journals::{
            append_transcription, create_free_journal, delete_free_journal, update_free_journal,
        },
        garden::{create_garden_entry, delete_garden_entry},
        guided_journals::{add_guided_entry, create_guided_journal, delete_guided_journal},
        health::healthz,
        previews::list_previews,
        stats::get_user_stats,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        // Read paths
        .route("/users/{user_id}/stats", get(get_user_stats))
        .route("/users/{user_id}/previews/{kind}", get(list_previews))
        // Free journals
        .route("/users/{user_id}/free-journals", post(create_free_journal))
        .route(
            "/users/{user_id}/free-journals/{id}",
            put(update_free_journal).delete(delete_free_journal),
        )
        .route(
            "/users/{user_id}/free-journals/{id}/transcriptions",
            post(append_transcription),
        )
        // Guided journals
        .route("/users/{user_id}/guided-journals", post(create_guided_journal))
        .route(
            "/users/{user_id}/guided-journals/{id}",
            delete(delete_guided_journal),
        )
        .route(
            "/users/{user_id}/guided-journals/{id}/entries",
            post(add_guided_entry),
        )
        // Garden
        .route("/users/{user_id}/garden", post(create_garden_entry))
        .route("/users/{user_id}/garden/{id}", delete(delete_garden_entry))
        // Cache operations
        .route("/cache", delete(clear))
        .route("/cache/diagnostics", get(diagnostics))
        .route("/cache/users/{user_id}/invalidate", post(invalidate_user))
        .layer(cors);

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
