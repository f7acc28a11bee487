// Library crate for WanderPlan
// Exports modules for use by the server binary and tests

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    accept_invitation, collaboration_stats, create_trip, decline_invitation, delete_trip,
    generate_itinerary, generate_recommendations, generate_travel_tips, get_trip, get_user, invite,
    list_trip_collaborations, list_user_invitations, list_user_trips, login, remove_collaboration,
    revoke_invitation, search_trips, search_users, signup, trip_stats, update_profile, update_role,
    update_trip,
};
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/ping",
            get(|| async { Json(serde_json::json!({ "message": "Backend is alive!" })) }),
        )
        // User routes
        .route("/api/users/signup", post(signup))
        .route("/api/users/login", post(login))
        .route("/api/users/search/{query}", get(search_users))
        .route("/api/users/profile/{user_id}", put(update_profile))
        .route("/api/users/{user_id}", get(get_user))
        // Trip routes
        .route("/api/trips", post(create_trip))
        .route("/api/trips/user/{user_id}", get(list_user_trips))
        .route("/api/trips/search/{query}", get(search_trips))
        .route("/api/trips/stats/{user_id}", get(trip_stats))
        .route("/api/trips/{trip_id}", get(get_trip))
        .route("/api/trips/{trip_id}", put(update_trip))
        .route("/api/trips/{trip_id}", delete(delete_trip))
        // AI generation routes
        .route(
            "/api/trips/{trip_id}/generate-itinerary",
            post(generate_itinerary),
        )
        .route(
            "/api/trips/{trip_id}/generate-recommendations",
            post(generate_recommendations),
        )
        .route(
            "/api/trips/{trip_id}/generate-tips",
            post(generate_travel_tips),
        )
        // Collaboration routes
        .route("/api/collaboration/invite", post(invite))
        .route("/api/collaboration/user/{user_id}", get(list_user_invitations))
        .route(
            "/api/collaboration/trip/{trip_id}",
            get(list_trip_collaborations),
        )
        .route(
            "/api/collaboration/stats/{user_id}",
            get(collaboration_stats),
        )
        .route(
            "/api/collaboration/{collaboration_id}/accept",
            put(accept_invitation),
        )
        .route(
            "/api/collaboration/{collaboration_id}/decline",
            put(decline_invitation),
        )
        .route(
            "/api/collaboration/{collaboration_id}/revoke",
            put(revoke_invitation),
        )
        .route(
            "/api/collaboration/{collaboration_id}/role",
            put(update_role),
        )
        .route(
            "/api/collaboration/{collaboration_id}",
            delete(remove_collaboration),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
