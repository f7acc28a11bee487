mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{Factory, TestApp};

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::new().await;
    let unique_id = Uuid::new_v4();

    let response = app
        .server
        .post("/api/users/signup")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": format!("ada-{}@example.com", unique_id),
            "username": format!("ada-{}", unique_id),
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert!(body["user"]["id"].as_str().is_some());
    assert_eq!(body["user"]["first_name"].as_str().unwrap(), "Ada");
    assert_eq!(body["user"]["profile_completed"].as_bool().unwrap(), false);
    assert_eq!(body["user"]["is_active"].as_bool().unwrap(), true);
    // Password material must never appear in responses
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_lowercases_email() {
    let app = TestApp::new().await;
    let unique_id = Uuid::new_v4();

    let response = app
        .server
        .post("/api/users/signup")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": format!("ADA-{}@Example.COM", unique_id),
            "username": format!("ada-{}", unique_id),
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(
        body["user"]["email"].as_str().unwrap(),
        format!("ada-{}@example.com", unique_id)
    );
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;

    let response = app
        .server
        .post("/api/users/signup")
        .json(&json!({
            "first_name": "Another",
            "last_name": "Person",
            "email": format!("other-{}@example.com", Uuid::new_v4()),
            "username": user.username,
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;

    let response = app
        .server
        .post("/api/users/signup")
        .json(&json!({
            "first_name": "Another",
            "last_name": "Person",
            "email": user.email,
            "username": format!("other-{}", Uuid::new_v4()),
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_short_username() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/users/signup")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": format!("ada-{}@example.com", Uuid::new_v4()),
            "username": "ab",
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("at least 3 characters"));
}

#[tokio::test]
async fn test_signup_short_password() {
    let app = TestApp::new().await;
    let unique_id = Uuid::new_v4();

    let response = app
        .server
        .post("/api/users/signup")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": format!("ada-{}@example.com", unique_id),
            "username": format!("ada-{}", unique_id),
            "password": "short"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("at least 6 characters"));
}

#[tokio::test]
async fn test_signup_empty_first_name() {
    let app = TestApp::new().await;
    let unique_id = Uuid::new_v4();

    let response = app
        .server
        .post("/api/users/signup")
        .json(&json!({
            "first_name": "",
            "last_name": "Lovelace",
            "email": format!("ada-{}@example.com", unique_id),
            "username": format!("ada-{}", unique_id),
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_username() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;

    let response = app
        .server
        .post("/api/users/login")
        .json(&json!({
            "identifier": user.username,
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["id"].as_str().unwrap(), user.id.to_string());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_with_email() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;

    let response = app
        .server
        .post("/api/users/login")
        .json(&json!({
            "identifier": user.email,
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;

    let response = app
        .server
        .post("/api/users/login")
        .json(&json!({
            "identifier": user.username,
            "password": "wrongpassword"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/users/login")
        .json(&json!({
            "identifier": "nobody-here",
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_deactivated_account() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;
    factory.deactivate_user(user.id).await;

    let response = app
        .server
        .post("/api/users/login")
        .json(&json!({
            "identifier": user.username,
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("deactivated"));
}

#[tokio::test]
async fn test_get_user() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;

    let response = app.server.get(&format!("/api/users/{}", user.id)).await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["username"].as_str().unwrap(), user.username);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get(&format!("/api/users/{}", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let user = factory.create_user().await;

    let response = app
        .server
        .put(&format!("/api/users/profile/{}", user.id))
        .json(&json!({
            "travel_preferences": {
                "budget_range": "luxury",
                "travel_style": "relaxed",
                "interests": ["food", "museums"],
                "accommodation_style": "hotels"
            },
            "profile_completed": true
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["profile_completed"].as_bool().unwrap(), true);
    assert_eq!(
        body["travel_preferences"]["budget_range"].as_str().unwrap(),
        "luxury"
    );
    assert_eq!(
        body["travel_preferences"]["interests"][0].as_str().unwrap(),
        "food"
    );
}

#[tokio::test]
async fn test_update_profile_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .put(&format!("/api/users/profile/{}", Uuid::new_v4()))
        .json(&json!({ "profile_completed": true }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_users() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let marker = Uuid::new_v4().simple().to_string();
    let user = factory
        .create_user_with(
            &format!("finder-{}", marker),
            &format!("finder-{}@example.com", marker),
        )
        .await;

    let response = app
        .server
        .get(&format!("/api/users/search/{}", marker))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"].as_str().unwrap(), user.id.to_string());
    // Search results expose a minimal projection only
    assert!(results[0].get("password_hash").is_none());
    assert!(results[0].get("travel_preferences").is_none());
}

#[tokio::test]
async fn test_search_excludes_deactivated_users() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    let marker = Uuid::new_v4().simple().to_string();
    let user = factory
        .create_user_with(
            &format!("gone-{}", marker),
            &format!("gone-{}@example.com", marker),
        )
        .await;
    factory.deactivate_user(user.id).await;

    let response = app
        .server
        .get(&format!("/api/users/search/{}", marker))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert!(body.as_array().unwrap().is_empty());
}
