use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::user::{self, ActiveModel, Column, Entity as UserEntity};
use crate::error::{AppError, AppResult};
use crate::models::{CreateUser, UpdateProfile, User};
use crate::repositories::Repository;

/// User repository for database operations
pub struct UserRepository;

#[async_trait]
impl Repository<User> for UserRepository {
    async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(model.into())
    }
}

impl UserRepository {
    /// Create a new user
    pub async fn create(
        db: &DatabaseConnection,
        input: &CreateUser,
        password_hash: &str,
    ) -> AppResult<User> {
        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            email: Set(input.email.to_lowercase()),
            username: Set(input.username.clone()),
            password_hash: Set(password_hash.to_string()),
            age: Set(input.age),
            travel_preferences: Set(input.travel_preferences.clone().unwrap_or_default()),
            profile_completed: Set(false),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(db).await.map_err(|e| {
            if e.to_string().contains("duplicate key") || e.to_string().contains("unique") {
                AppError::Conflict("Username or email already exists".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        Ok(result.into())
    }

    /// Find user by username or email (for login)
    pub async fn find_by_identifier(db: &DatabaseConnection, identifier: &str) -> AppResult<User> {
        let model = UserEntity::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier.to_lowercase())),
            )
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(model.into())
    }

    /// Check if username is taken
    pub async fn username_exists(db: &DatabaseConnection, username: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(Column::Username.eq(username))
            .count(db)
            .await?;

        Ok(count > 0)
    }

    /// Check if email is taken
    pub async fn email_exists(db: &DatabaseConnection, email: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(Column::Email.eq(email.to_lowercase()))
            .count(db)
            .await?;

        Ok(count > 0)
    }

    /// Update travel preferences and profile completion
    pub async fn update_profile(
        db: &DatabaseConnection,
        id: Uuid,
        input: &UpdateProfile,
    ) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let mut active: ActiveModel = model.into();

        if let Some(preferences) = &input.travel_preferences {
            active.travel_preferences = Set(preferences.clone());
        }
        if let Some(profile_completed) = input.profile_completed {
            active.profile_completed = Set(profile_completed);
        }
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Substring search over active users (for collaboration invites)
    pub async fn search(db: &DatabaseConnection, query: &str, limit: u64) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(Column::Username.contains(query))
                    .add(Column::Email.contains(query))
                    .add(Column::FirstName.contains(query))
                    .add(Column::LastName.contains(query)),
            )
            .limit(limit)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}

// Conversion from SeaORM model to our domain model
impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            username: m.username,
            password_hash: m.password_hash,
            age: m.age,
            travel_preferences: m.travel_preferences,
            profile_completed: m.profile_completed,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
