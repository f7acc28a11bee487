use axum::extract::{Path, Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, Time};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::common::validate_required;
use crate::models::{
    CreateTrip, Trip, TripPreferences, TripStats, TripStatus, UpdateTrip,
};
use crate::repositories::{Repository, TripRepository};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTripRequest {
    pub user_id: Uuid,
    pub trip_name: String,
    pub destination: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub end_date: OffsetDateTime,
    #[schema(value_type = f64)]
    pub budget: Decimal,
    /// One of planning/upcoming/ongoing/completed/cancelled
    pub status: Option<String>,
    pub preferences: Option<TripPreferences>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTripRequest {
    pub trip_name: Option<String>,
    pub destination: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<OffsetDateTime>,
    #[schema(value_type = Option<f64>)]
    pub budget: Option<Decimal>,
    pub status: Option<String>,
    pub preferences: Option<TripPreferences>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTripsQuery {
    /// Filter by derived status
    pub status: Option<String>,
    /// Substring match on trip name or destination
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchTripsQuery {
    /// Restrict results to one user's trips
    pub user_id: Option<Uuid>,
}

/// Trip as returned by the API; `status` is always the derived value
#[derive(Debug, Serialize, ToSchema)]
pub struct TripResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trip_name: String,
    pub destination: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub end_date: OffsetDateTime,
    pub duration: i32,
    #[schema(value_type = String)]
    pub budget: Decimal,
    #[schema(value_type = String)]
    pub status: TripStatus,
    pub preferences: TripPreferences,
    pub itinerary_generated: bool,
    pub recommendations_generated: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub last_generated_at: Option<OffsetDateTime>,
    #[schema(value_type = Option<Object>)]
    pub activities: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub recommendations: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub travel_tips: Option<serde_json::Value>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
}

impl TripResponse {
    fn from_trip(trip: Trip, now: OffsetDateTime) -> Self {
        let status = trip.current_status(now);
        Self {
            id: trip.id,
            user_id: trip.user_id,
            trip_name: trip.trip_name,
            destination: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            duration: trip.duration,
            budget: trip.budget,
            status,
            preferences: trip.preferences,
            itinerary_generated: trip.itinerary_generated,
            recommendations_generated: trip.recommendations_generated,
            last_generated_at: trip.last_generated_at,
            activities: trip.activities,
            recommendations: trip.recommendations,
            travel_tips: trip.travel_tips,
            notes: trip.notes,
            created_at: trip.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ============ Handlers ============

/// Create a new trip
#[utoipa::path(
    post,
    path = "/api/trips",
    request_body = CreateTripRequest,
    responses(
        (status = 200, description = "Trip created", body = TripResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "Trips"
)]
pub async fn create_trip(
    State(state): State<AppState>,
    Json(payload): Json<CreateTripRequest>,
) -> AppResult<Json<TripResponse>> {
    validate_required(&payload.trip_name, "Trip name")?;
    validate_required(&payload.destination, "Destination")?;

    if payload.end_date <= payload.start_date {
        return Err(AppError::Validation(
            "End date must be after start date".to_string(),
        ));
    }
    let now = OffsetDateTime::now_utc();
    if payload.start_date < now {
        return Err(AppError::Validation(
            "Start date cannot be in the past".to_string(),
        ));
    }
    if payload.budget < Decimal::ZERO {
        return Err(AppError::Validation(
            "Budget cannot be negative".to_string(),
        ));
    }

    let status = payload.status.as_deref().map(str::parse).transpose()?;

    let create = CreateTrip {
        user_id: payload.user_id,
        trip_name: payload.trip_name,
        destination: payload.destination,
        start_date: payload.start_date,
        end_date: payload.end_date,
        budget: payload.budget,
        status,
        preferences: payload.preferences,
    };

    let trip = TripRepository::create(&state.db, &create).await?;
    Ok(Json(TripResponse::from_trip(trip, now)))
}

/// List a user's trips, optionally filtered by derived status and search text
#[utoipa::path(
    get,
    path = "/api/trips/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Owner user ID"),
        ListTripsQuery
    ),
    responses(
        (status = 200, description = "The user's trips", body = [TripResponse]),
        (status = 400, description = "Invalid status filter")
    ),
    tag = "Trips"
)]
pub async fn list_user_trips(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListTripsQuery>,
) -> AppResult<Json<Vec<TripResponse>>> {
    let status_filter: Option<TripStatus> =
        query.status.as_deref().map(str::parse).transpose()?;

    let now = OffsetDateTime::now_utc();
    let trips = TripRepository::list_by_user(&state.db, user_id, query.search.as_deref()).await?;

    let responses = trips
        .into_iter()
        .map(|t| TripResponse::from_trip(t, now))
        .filter(|t| status_filter.map_or(true, |s| t.status == s))
        .collect();

    Ok(Json(responses))
}

/// Get a single trip
#[utoipa::path(
    get,
    path = "/api/trips/{trip_id}",
    params(("trip_id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Trip details", body = TripResponse),
        (status = 404, description = "Trip not found")
    ),
    tag = "Trips"
)]
pub async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<TripResponse>> {
    let trip = TripRepository::find_by_id(&state.db, trip_id).await?;
    Ok(Json(TripResponse::from_trip(trip, OffsetDateTime::now_utc())))
}

/// Update a trip
#[utoipa::path(
    put,
    path = "/api/trips/{trip_id}",
    params(("trip_id" = Uuid, Path, description = "Trip ID")),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Trip updated", body = TripResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Trip not found")
    ),
    tag = "Trips"
)]
pub async fn update_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<UpdateTripRequest>,
) -> AppResult<Json<TripResponse>> {
    if let Some(budget) = payload.budget {
        if budget < Decimal::ZERO {
            return Err(AppError::Validation(
                "Budget cannot be negative".to_string(),
            ));
        }
    }

    let status = payload.status.as_deref().map(str::parse).transpose()?;

    let update = UpdateTrip {
        trip_name: payload.trip_name,
        destination: payload.destination,
        start_date: payload.start_date,
        end_date: payload.end_date,
        budget: payload.budget,
        status,
        preferences: payload.preferences,
        notes: payload.notes,
    };

    let trip = TripRepository::update(&state.db, trip_id, &update).await?;
    Ok(Json(TripResponse::from_trip(trip, OffsetDateTime::now_utc())))
}

/// Soft-delete a trip
#[utoipa::path(
    delete,
    path = "/api/trips/{trip_id}",
    params(("trip_id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Trip deleted", body = MessageResponse),
        (status = 404, description = "Trip not found")
    ),
    tag = "Trips"
)]
pub async fn delete_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    TripRepository::soft_delete(&state.db, trip_id).await?;
    Ok(Json(MessageResponse {
        message: "Trip deleted successfully".to_string(),
    }))
}

/// Search trips by a combined `text;start;end` query segment.
///
/// Each part may be empty; dates are RFC 3339 or `YYYY-MM-DD`.
#[utoipa::path(
    get,
    path = "/api/trips/search/{query}",
    params(
        ("query" = String, Path, description = "Search segment: text;start;end"),
        SearchTripsQuery
    ),
    responses(
        (status = 200, description = "Matching trips", body = [TripResponse]),
        (status = 400, description = "Invalid date in query")
    ),
    tag = "Trips"
)]
pub async fn search_trips(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<SearchTripsQuery>,
) -> AppResult<Json<Vec<TripResponse>>> {
    let mut parts = query.splitn(3, ';');
    let text = parts.next().unwrap_or_default().trim();
    let start = parse_search_date(parts.next().unwrap_or_default())?;
    let end = parse_search_date(parts.next().unwrap_or_default())?;

    let text = if text.is_empty() { None } else { Some(text) };
    if text.is_none() && start.is_none() && end.is_none() {
        return Err(AppError::Validation(
            "Search query must include text or a date range".to_string(),
        ));
    }

    let now = OffsetDateTime::now_utc();
    let trips =
        TripRepository::search(&state.db, text, start, end, params.user_id, 20).await?;

    Ok(Json(
        trips
            .into_iter()
            .map(|t| TripResponse::from_trip(t, now))
            .collect(),
    ))
}

/// Aggregate trip statistics for a user
#[utoipa::path(
    get,
    path = "/api/trips/stats/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Trip statistics", body = TripStats)
    ),
    tag = "Trips"
)]
pub async fn trip_stats(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<TripStats>> {
    let stats = TripRepository::stats(&state.db, user_id, OffsetDateTime::now_utc()).await?;
    Ok(Json(stats))
}

// ============ AI generation ============

/// Generate and persist a day-by-day itinerary for a trip
#[utoipa::path(
    post,
    path = "/api/trips/{trip_id}/generate-itinerary",
    params(("trip_id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Generated itinerary", body = TripResponse),
        (status = 404, description = "Trip not found"),
        (status = 500, description = "Content-Generation error")
    ),
    tag = "Trips"
)]
pub async fn generate_itinerary(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<TripResponse>> {
    let trip = TripRepository::find_by_id(&state.db, trip_id).await?;

    let itinerary = state.gemini.generate_itinerary(&trip).await?;
    let value = serde_json::to_value(&itinerary)
        .map_err(|e| AppError::Internal(format!("Failed to serialize itinerary: {}", e)))?;

    let updated = TripRepository::save_itinerary(&state.db, trip_id, value).await?;
    Ok(Json(TripResponse::from_trip(updated, OffsetDateTime::now_utc())))
}

/// Generate and persist recommendations for a trip
#[utoipa::path(
    post,
    path = "/api/trips/{trip_id}/generate-recommendations",
    params(("trip_id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Generated recommendations", body = TripResponse),
        (status = 404, description = "Trip not found"),
        (status = 500, description = "Content-Generation error")
    ),
    tag = "Trips"
)]
pub async fn generate_recommendations(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<TripResponse>> {
    let trip = TripRepository::find_by_id(&state.db, trip_id).await?;

    let recommendations = state.gemini.generate_recommendations(&trip).await?;
    let value = serde_json::to_value(&recommendations)
        .map_err(|e| AppError::Internal(format!("Failed to serialize recommendations: {}", e)))?;

    let updated = TripRepository::save_recommendations(&state.db, trip_id, value).await?;
    Ok(Json(TripResponse::from_trip(updated, OffsetDateTime::now_utc())))
}

/// Generate and persist travel tips for a trip
#[utoipa::path(
    post,
    path = "/api/trips/{trip_id}/generate-tips",
    params(("trip_id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Generated travel tips", body = TripResponse),
        (status = 404, description = "Trip not found"),
        (status = 500, description = "Content-Generation error")
    ),
    tag = "Trips"
)]
pub async fn generate_travel_tips(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<TripResponse>> {
    let trip = TripRepository::find_by_id(&state.db, trip_id).await?;

    let tips = state.gemini.generate_travel_tips(&trip).await?;
    let value = serde_json::to_value(&tips)
        .map_err(|e| AppError::Internal(format!("Failed to serialize travel tips: {}", e)))?;

    let updated = TripRepository::save_travel_tips(&state.db, trip_id, value).await?;
    Ok(Json(TripResponse::from_trip(updated, OffsetDateTime::now_utc())))
}

/// Parse an optional search-date segment: RFC 3339 first, then `YYYY-MM-DD`
/// at midnight UTC. Empty input is simply absent.
fn parse_search_date(raw: &str) -> AppResult<Option<OffsetDateTime>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(Some(parsed));
    }

    let format = time::macros::format_description!("[year]-[month]-[day]");
    let date = Date::parse(raw, &format)
        .map_err(|_| AppError::Validation(format!("Invalid date in search query: {}", raw)))?;

    Ok(Some(date.with_time(Time::MIDNIGHT).assume_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parse_search_date_empty_is_none() {
        assert!(parse_search_date("").unwrap().is_none());
        assert!(parse_search_date("  ").unwrap().is_none());
    }

    #[test]
    fn test_parse_search_date_accepts_plain_date() {
        let parsed = parse_search_date("2026-10-01").unwrap();
        assert_eq!(parsed, Some(datetime!(2026-10-01 00:00 UTC)));
    }

    #[test]
    fn test_parse_search_date_accepts_rfc3339() {
        let parsed = parse_search_date("2026-10-01T08:30:00Z").unwrap();
        assert_eq!(parsed, Some(datetime!(2026-10-01 08:30 UTC)));
    }

    #[test]
    fn test_parse_search_date_rejects_garbage() {
        assert!(parse_search_date("next tuesday").is_err());
    }
}
