use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use wanderplan::entity::user::Entity as UserEntity;
use wanderplan::models::{
    Collaboration, CreateCollaboration, CreateTrip, CreateUser, Role, Trip, User,
};
use wanderplan::repositories::{CollaborationRepository, TripRepository, UserRepository};
use wanderplan::services::AuthService;
use wanderplan::state::AppState;

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a test user with a unique username and email
    pub async fn create_user(&self) -> User {
        let unique_id = Uuid::new_v4();
        self.create_user_with(
            &format!("traveler-{}", unique_id),
            &format!("test-{}@example.com", unique_id),
        )
        .await
    }

    /// Create a test user with specific username and email
    pub async fn create_user_with(&self, username: &str, email: &str) -> User {
        let input = CreateUser {
            first_name: "Test".to_string(),
            last_name: "Traveler".to_string(),
            email: email.to_string(),
            username: username.to_string(),
            age: Some(30),
            travel_preferences: None,
        };

        let password_hash = AuthService::hash_password("password123").unwrap();
        UserRepository::create(&self.state.db, &input, &password_hash)
            .await
            .unwrap()
    }

    /// Deactivate a user directly in the database
    pub async fn deactivate_user(&self, id: Uuid) {
        use sea_orm::EntityTrait;

        let model = UserEntity::find_by_id(id)
            .one(&self.state.db)
            .await
            .unwrap()
            .unwrap();

        let mut active = model.into_active_model();
        active.is_active = Set(false);
        active.update(&self.state.db).await.unwrap();
    }

    /// Create a future trip for a user
    pub async fn create_trip(&self, user_id: Uuid) -> Trip {
        let start = OffsetDateTime::now_utc() + Duration::days(30);
        self.create_trip_with_dates(user_id, start, start + Duration::days(7))
            .await
    }

    /// Create a trip with explicit dates (repository level, so past dates are
    /// allowed for status-derivation tests)
    pub async fn create_trip_with_dates(
        &self,
        user_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Trip {
        let input = CreateTrip {
            user_id,
            trip_name: format!("Test Trip {}", Uuid::new_v4()),
            destination: "Kyoto, Japan".to_string(),
            start_date: start,
            end_date: end,
            budget: Decimal::new(2500, 0),
            status: None,
            preferences: None,
        };

        TripRepository::create(&self.state.db, &input).await.unwrap()
    }

    /// Create a pending collaboration invitation
    pub async fn create_collaboration(
        &self,
        trip_id: Uuid,
        invited_user_id: Uuid,
        invited_by: Uuid,
        role: Role,
    ) -> Collaboration {
        let input = CreateCollaboration {
            trip_id,
            invited_user_id,
            invited_by,
            role,
            message: Some("Join my trip!".to_string()),
        };

        CollaborationRepository::create(&self.state.db, &input)
            .await
            .unwrap()
    }
}
