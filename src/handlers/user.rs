use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::common::validate_required;
use crate::models::{CreateUser, TravelPreferences, UpdateProfile, UserResponse, UserSummary};
use crate::repositories::{Repository, UserRepository};
use crate::services::AuthService;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub age: Option<i32>,
    pub travel_preferences: Option<TravelPreferences>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username or email
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub travel_preferences: Option<TravelPreferences>,
    pub profile_completed: Option<bool>,
}

// ============ Handlers ============

/// Sign up a new user
#[utoipa::path(
    post,
    path = "/api/users/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created successfully", body = AuthResponse),
        (status = 409, description = "Username or email already exists"),
        (status = 400, description = "Validation error")
    ),
    tag = "Users"
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<Json<AuthResponse>> {
    // Validate input
    validate_required(&payload.first_name, "First name")?;
    validate_required(&payload.last_name, "Last name")?;
    validate_required(&payload.email, "Email")?;
    validate_required(&payload.username, "Username")?;
    if !payload.email.contains('@') {
        return Err(AppError::Validation("Email is invalid".to_string()));
    }
    if payload.username.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    if payload.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    // Friendly duplicate checks; the unique indexes still back this up
    if UserRepository::username_exists(&state.db, &payload.username).await? {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }
    if UserRepository::email_exists(&state.db, &payload.email).await? {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    // Hash password
    let password_hash = AuthService::hash_password(&payload.password)?;

    let create_user = CreateUser {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        username: payload.username,
        age: payload.age,
        travel_preferences: payload.travel_preferences,
    };

    let user = UserRepository::create(&state.db, &create_user, &password_hash).await?;

    Ok(Json(AuthResponse { user: user.into() }))
}

/// Login with username or email
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials or deactivated account")
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepository::find_by_identifier(&state.db, &payload.identifier)
        .await
        .map_err(|_| AppError::InvalidCredentials)?;

    if !user.is_active {
        return Err(AppError::AccountDisabled);
    }

    let is_valid = AuthService::verify_password(&payload.password, &user.password_hash)?;
    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    Ok(Json(AuthResponse { user: user.into() }))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepository::find_by_id(&state.db, user_id).await?;
    Ok(Json(user.into()))
}

/// Update a user's travel preferences and profile completion
#[utoipa::path(
    put,
    path = "/api/users/profile/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let update = UpdateProfile {
        travel_preferences: payload.travel_preferences,
        profile_completed: payload.profile_completed,
    };

    let user = UserRepository::update_profile(&state.db, user_id, &update).await?;
    Ok(Json(user.into()))
}

/// Search active users by username, email, or name
#[utoipa::path(
    get,
    path = "/api/users/search/{query}",
    params(("query" = String, Path, description = "Substring to match")),
    responses(
        (status = 200, description = "Matching users", body = [UserSummary])
    ),
    tag = "Users"
)]
pub async fn search_users(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> AppResult<Json<Vec<UserSummary>>> {
    validate_required(&query, "Search query")?;

    let users = UserRepository::search(&state.db, &query, 10).await?;
    Ok(Json(users.into_iter().map(|u| u.into()).collect()))
}
