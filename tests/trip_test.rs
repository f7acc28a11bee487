mod common;

use axum::http::StatusCode;
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use common::{Factory, TestApp};

fn rfc3339(dt: OffsetDateTime) -> String {
    dt.format(&Rfc3339).unwrap()
}

#[tokio::test]
async fn test_create_trip_success() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let start = OffsetDateTime::now_utc() + Duration::days(30);
    let end = start + Duration::days(7);

    let response = app
        .server
        .post("/api/trips")
        .json(&json!({
            "user_id": user.id,
            "trip_name": "Autumn in Kyoto",
            "destination": "Kyoto, Japan",
            "start_date": rfc3339(start),
            "end_date": rfc3339(end),
            "budget": 2500.0
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["trip_name"].as_str().unwrap(), "Autumn in Kyoto");
    assert_eq!(body["duration"].as_i64().unwrap(), 7);
    // Future dates derive to upcoming regardless of the stored default
    assert_eq!(body["status"].as_str().unwrap(), "upcoming");
    assert_eq!(body["itinerary_generated"].as_bool().unwrap(), false);
    assert!(body["activities"].is_null());
}

#[tokio::test]
async fn test_create_trip_end_before_start() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let start = OffsetDateTime::now_utc() + Duration::days(30);

    let response = app
        .server
        .post("/api/trips")
        .json(&json!({
            "user_id": user.id,
            "trip_name": "Backwards",
            "destination": "Nowhere",
            "start_date": rfc3339(start),
            "end_date": rfc3339(start - Duration::days(2)),
            "budget": 100.0
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("End date must be after start date"));
}

#[tokio::test]
async fn test_create_trip_start_in_past() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let start = OffsetDateTime::now_utc() - Duration::days(3);

    let response = app
        .server
        .post("/api/trips")
        .json(&json!({
            "user_id": user.id,
            "trip_name": "Time Machine",
            "destination": "Yesterday",
            "start_date": rfc3339(start),
            "end_date": rfc3339(start + Duration::days(5)),
            "budget": 100.0
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_trip_negative_budget() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let start = OffsetDateTime::now_utc() + Duration::days(10);

    let response = app
        .server
        .post("/api/trips")
        .json(&json!({
            "user_id": user.id,
            "trip_name": "Underwater",
            "destination": "Debt",
            "start_date": rfc3339(start),
            "end_date": rfc3339(start + Duration::days(3)),
            "budget": -50.0
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_trip_invalid_status() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let start = OffsetDateTime::now_utc() + Duration::days(10);

    let response = app
        .server
        .post("/api/trips")
        .json(&json!({
            "user_id": user.id,
            "trip_name": "Strange",
            "destination": "Limbo",
            "start_date": rfc3339(start),
            "end_date": rfc3339(start + Duration::days(3)),
            "budget": 100.0,
            "status": "daydreaming"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_trip_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get(&format!("/api/trips/{}", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_user_trips_sorted_by_start_date() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let now = OffsetDateTime::now_utc();

    let later = factory
        .create_trip_with_dates(user.id, now + Duration::days(60), now + Duration::days(67))
        .await;
    let sooner = factory
        .create_trip_with_dates(user.id, now + Duration::days(10), now + Duration::days(14))
        .await;

    let response = app
        .server
        .get(&format!("/api/trips/user/{}", user.id))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let trips = body.as_array().unwrap();
    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0]["id"].as_str().unwrap(), sooner.id.to_string());
    assert_eq!(trips[1]["id"].as_str().unwrap(), later.id.to_string());
}

#[tokio::test]
async fn test_list_user_trips_status_filter_uses_derived_status() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let now = OffsetDateTime::now_utc();

    // Stored status is the planning default, but the dates make it upcoming
    factory
        .create_trip_with_dates(user.id, now + Duration::days(30), now + Duration::days(37))
        .await;

    let upcoming = app
        .server
        .get(&format!("/api/trips/user/{}?status=upcoming", user.id))
        .await;
    upcoming.assert_status(StatusCode::OK);
    let body: serde_json::Value = upcoming.json();
    assert_eq!(body.as_array().unwrap().len(), 1);

    let planning = app
        .server
        .get(&format!("/api/trips/user/{}?status=planning", user.id))
        .await;
    planning.assert_status(StatusCode::OK);
    let body: serde_json::Value = planning.json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_user_trips_invalid_status_filter() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;

    let response = app
        .server
        .get(&format!("/api/trips/user/{}?status=daydreaming", user.id))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_user_trips_search() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    factory.create_trip(user.id).await;

    let response = app
        .server
        .get(&format!("/api/trips/user/{}?search=Kyoto", user.id))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = app
        .server
        .get(&format!("/api/trips/user/{}?search=Reykjavik", user.id))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_trip_partial() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let trip = factory.create_trip(user.id).await;

    let response = app
        .server
        .put(&format!("/api/trips/{}", trip.id))
        .json(&json!({
            "trip_name": "Renamed Adventure",
            "notes": "Pack light"
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["trip_name"].as_str().unwrap(), "Renamed Adventure");
    assert_eq!(body["notes"].as_str().unwrap(), "Pack light");
    // Untouched fields survive
    assert_eq!(body["destination"].as_str().unwrap(), "Kyoto, Japan");
}

#[tokio::test]
async fn test_update_trip_recomputes_duration() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let trip = factory.create_trip(user.id).await;

    let response = app
        .server
        .put(&format!("/api/trips/{}", trip.id))
        .json(&json!({
            "end_date": rfc3339(trip.start_date + Duration::days(10))
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["duration"].as_i64().unwrap(), 10);
}

#[tokio::test]
async fn test_update_trip_invalid_date_pair() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let trip = factory.create_trip(user.id).await;

    let response = app
        .server
        .put(&format!("/api/trips/{}", trip.id))
        .json(&json!({
            "end_date": rfc3339(trip.start_date - Duration::days(1))
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_soft_delete_hides_trip() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let trip = factory.create_trip(user.id).await;

    let response = app
        .server
        .delete(&format!("/api/trips/{}", trip.id))
        .await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    // Gone from reads and listings
    let get = app.server.get(&format!("/api/trips/{}", trip.id)).await;
    get.assert_status(StatusCode::NOT_FOUND);

    let list = app
        .server
        .get(&format!("/api/trips/user/{}", user.id))
        .await;
    let body: serde_json::Value = list.json();
    assert!(body.as_array().unwrap().is_empty());

    // Deleting again reports not found
    let again = app
        .server
        .delete(&format!("/api/trips/{}", trip.id))
        .await;
    again.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_derived_status_reflects_dates() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let now = OffsetDateTime::now_utc();

    let past = factory
        .create_trip_with_dates(user.id, now - Duration::days(20), now - Duration::days(14))
        .await;
    let ongoing = factory
        .create_trip_with_dates(user.id, now - Duration::days(2), now + Duration::days(2))
        .await;

    let response = app.server.get(&format!("/api/trips/{}", past.id)).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"].as_str().unwrap(), "completed");

    let response = app.server.get(&format!("/api/trips/{}", ongoing.id)).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"].as_str().unwrap(), "ongoing");
}

#[tokio::test]
async fn test_cancelled_status_is_sticky() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let now = OffsetDateTime::now_utc();

    // Mid-trip, which would otherwise derive to ongoing
    let trip = factory
        .create_trip_with_dates(user.id, now - Duration::days(1), now + Duration::days(3))
        .await;

    let response = app
        .server
        .put(&format!("/api/trips/{}", trip.id))
        .json(&json!({ "status": "cancelled" }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"].as_str().unwrap(), "cancelled");

    let get = app.server.get(&format!("/api/trips/{}", trip.id)).await;
    let body: serde_json::Value = get.json();
    assert_eq!(body["status"].as_str().unwrap(), "cancelled");
}

#[tokio::test]
async fn test_trip_stats() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let now = OffsetDateTime::now_utc();

    factory
        .create_trip_with_dates(user.id, now + Duration::days(30), now + Duration::days(37))
        .await;
    factory
        .create_trip_with_dates(user.id, now - Duration::days(2), now + Duration::days(2))
        .await;
    factory
        .create_trip_with_dates(user.id, now - Duration::days(20), now - Duration::days(14))
        .await;

    let response = app
        .server
        .get(&format!("/api/trips/stats/{}", user.id))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["total_trips"].as_u64().unwrap(), 3);
    assert_eq!(body["upcoming_trips"].as_u64().unwrap(), 1);
    assert_eq!(body["ongoing_trips"].as_u64().unwrap(), 1);
    assert_eq!(body["completed_trips"].as_u64().unwrap(), 1);
    // Factory trips carry a 2500 budget each
    assert!(body["total_budget"].as_str().unwrap().starts_with("7500"));
    assert!(body["avg_budget"].as_str().unwrap().starts_with("2500"));
}

#[tokio::test]
async fn test_trip_stats_empty() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;

    let response = app
        .server
        .get(&format!("/api/trips/stats/{}", user.id))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["total_trips"].as_u64().unwrap(), 0);
    assert!(body["avg_budget"].as_str().unwrap().starts_with('0'));
}

#[tokio::test]
async fn test_search_trips_by_text() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let trip = factory.create_trip(user.id).await;

    let response = app
        .server
        .get(&format!("/api/trips/search/Kyoto;;?user_id={}", user.id))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let trips = body.as_array().unwrap();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0]["id"].as_str().unwrap(), trip.id.to_string());
}

#[tokio::test]
async fn test_search_trips_by_date_overlap() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let now = OffsetDateTime::now_utc();

    let trip = factory
        .create_trip_with_dates(user.id, now + Duration::days(30), now + Duration::days(37))
        .await;

    // Range overlapping the trip's tail end
    let range_start = (now + Duration::days(35)).date();
    let range_end = (now + Duration::days(50)).date();

    let response = app
        .server
        .get(&format!(
            "/api/trips/search/;{};{}?user_id={}",
            range_start, range_end, user.id
        ))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let trips = body.as_array().unwrap();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0]["id"].as_str().unwrap(), trip.id.to_string());

    // A range entirely after the trip matches nothing
    let response = app
        .server
        .get(&format!(
            "/api/trips/search/;{};{}?user_id={}",
            (now + Duration::days(60)).date(),
            (now + Duration::days(70)).date(),
            user.id
        ))
        .await;

    let body: serde_json::Value = response.json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_trips_caps_results_at_twenty() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    let now = OffsetDateTime::now_utc();

    for i in 0..25 {
        factory
            .create_trip_with_dates(
                user.id,
                now + Duration::days(10 + i),
                now + Duration::days(12 + i),
            )
            .await;
    }

    let response = app
        .server
        .get(&format!("/api/trips/search/Kyoto;;?user_id={}", user.id))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_search_trips_invalid_date() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/api/trips/search/;not-a-date;")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_trips_empty_query() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/trips/search/;;").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_itinerary_trip_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post(&format!("/api/trips/{}/generate-itinerary", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_recommendations_trip_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post(&format!(
            "/api/trips/{}/generate-recommendations",
            Uuid::new_v4()
        ))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
