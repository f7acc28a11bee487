use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::trip::{AccommodationStyle, BudgetRange, TravelStyle};

/// Travel preference profile, stored as a JSON column on the user
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct TravelPreferences {
    pub budget_range: BudgetRange,
    pub travel_style: TravelStyle,
    #[serde(default)]
    pub interests: Vec<String>,
    pub accommodation_style: AccommodationStyle,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub accessibility_needs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)] // Never expose password hash
    pub password_hash: String,
    pub age: Option<i32>,
    pub travel_preferences: TravelPreferences,
    pub profile_completed: bool,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// User creation DTO (without id and timestamps). The password never
/// travels through here; the repository only ever sees the argon2 hash.
#[derive(Debug)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub age: Option<i32>,
    pub travel_preferences: Option<TravelPreferences>,
}

/// Profile update DTO
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub travel_preferences: Option<TravelPreferences>,
    pub profile_completed: Option<bool>,
}

/// Public user response (safe to return via API)
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub age: Option<i32>,
    pub travel_preferences: TravelPreferences,
    pub profile_completed: bool,
    pub is_active: bool,
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            username: user.username,
            age: user.age,
            travel_preferences: user.travel_preferences,
            profile_completed: user.profile_completed,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Minimal user fields exposed by collaboration search
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}
