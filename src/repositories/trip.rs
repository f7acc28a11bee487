use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entity::trip::{self, ActiveModel, Column, Entity as TripEntity};
use crate::error::{AppError, AppResult};
use crate::models::{duration_days, CreateTrip, Trip, TripStats, TripStatus, UpdateTrip};
use crate::repositories::Repository;

/// Trip repository for database operations.
///
/// All standard lookups exclude soft-deleted trips; [`TripRepository::find_by_id_any`]
/// is the only path that sees them and exists for internal validation.
pub struct TripRepository;

#[async_trait]
impl Repository<Trip> for TripRepository {
    async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> AppResult<Trip> {
        let model = TripEntity::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip".to_string()))?;

        Ok(model.into())
    }
}

impl TripRepository {
    /// Create a new trip
    pub async fn create(db: &DatabaseConnection, input: &CreateTrip) -> AppResult<Trip> {
        let now = OffsetDateTime::now_utc();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            trip_name: Set(input.trip_name.clone()),
            destination: Set(input.destination.clone()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            duration: Set(duration_days(input.start_date, input.end_date)),
            budget: Set(input.budget),
            status: Set(input.status.unwrap_or_default()),
            preferences: Set(input.preferences.clone().unwrap_or_default()),
            itinerary_generated: Set(false),
            recommendations_generated: Set(false),
            last_generated_at: Set(None),
            activities: Set(None),
            recommendations: Set(None),
            travel_tips: Set(None),
            notes: Set(None),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(db).await?;
        Ok(result.into())
    }

    /// Find trip by ID including soft-deleted records.
    ///
    /// Internal validation only (e.g. collaboration invite checks raw
    /// existence, then the deleted flag, separately).
    pub async fn find_by_id_any(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<Trip>> {
        let model = TripEntity::find_by_id(id).one(db).await?;
        Ok(model.map(|m| m.into()))
    }

    /// List a user's trips, optionally narrowed by a name/destination
    /// substring, sorted by start date
    pub async fn list_by_user(
        db: &DatabaseConnection,
        user_id: Uuid,
        search: Option<&str>,
    ) -> AppResult<Vec<Trip>> {
        let mut query = TripEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsDeleted.eq(false));

        if let Some(text) = search {
            query = query.filter(
                Condition::any()
                    .add(Column::TripName.contains(text))
                    .add(Column::Destination.contains(text)),
            );
        }

        let models = query.order_by_asc(Column::StartDate).all(db).await?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Partial update; duration is recomputed whenever a date changes
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        input: &UpdateTrip,
    ) -> AppResult<Trip> {
        let model = TripEntity::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip".to_string()))?;

        let (current_start, current_end) = (model.start_date, model.end_date);
        let mut active: ActiveModel = model.into();

        if let Some(trip_name) = &input.trip_name {
            active.trip_name = Set(trip_name.clone());
        }
        if let Some(destination) = &input.destination {
            active.destination = Set(destination.clone());
        }
        if input.start_date.is_some() || input.end_date.is_some() {
            let start = input.start_date.unwrap_or(current_start);
            let end = input.end_date.unwrap_or(current_end);
            if end <= start {
                return Err(AppError::Validation(
                    "End date must be after start date".to_string(),
                ));
            }
            active.start_date = Set(start);
            active.end_date = Set(end);
            active.duration = Set(duration_days(start, end));
        }
        if let Some(budget) = input.budget {
            active.budget = Set(budget);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(preferences) = &input.preferences {
            active.preferences = Set(preferences.clone());
        }
        if let Some(notes) = &input.notes {
            active.notes = Set(Some(notes.clone()));
        }
        active.updated_at = Set(OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Soft delete: the trip disappears from every standard query but the
    /// row is retained
    pub async fn soft_delete(db: &DatabaseConnection, id: Uuid) -> AppResult<Trip> {
        let model = TripEntity::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip".to_string()))?;

        let mut active: ActiveModel = model.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Search trips by text and/or date range, optionally scoped to a user.
    ///
    /// With both range bounds the match is by overlap; with only a start
    /// bound trips must begin at or after it; with only an end bound trips
    /// must finish by the day after it.
    pub async fn search(
        db: &DatabaseConnection,
        text: Option<&str>,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
        user_id: Option<Uuid>,
        limit: u64,
    ) -> AppResult<Vec<Trip>> {
        let mut query = TripEntity::find().filter(Column::IsDeleted.eq(false));

        if let Some(text) = text {
            query = query.filter(
                Condition::any()
                    .add(Column::TripName.contains(text))
                    .add(Column::Destination.contains(text)),
            );
        }

        match (start, end) {
            (Some(start), Some(end)) => {
                query = query
                    .filter(Column::StartDate.lte(end))
                    .filter(Column::EndDate.gte(start));
            }
            (Some(start), None) => {
                query = query.filter(Column::StartDate.gte(start));
            }
            (None, Some(end)) => {
                query = query.filter(Column::EndDate.lte(end + time::Duration::days(1)));
            }
            (None, None) => {}
        }

        if let Some(user_id) = user_id {
            query = query.filter(Column::UserId.eq(user_id));
        }

        let models = query
            .order_by_asc(Column::StartDate)
            .limit(limit)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Aggregate trip counts and budget figures for a user.
    ///
    /// Status counts use the derived status at `now`, not the stored field.
    pub async fn stats(
        db: &DatabaseConnection,
        user_id: Uuid,
        now: OffsetDateTime,
    ) -> AppResult<TripStats> {
        let trips = Self::list_by_user(db, user_id, None).await?;

        let total_trips = trips.len() as u64;
        let total_budget: Decimal = trips.iter().map(|t| t.budget).sum();
        let avg_budget = if total_trips > 0 {
            total_budget / Decimal::from(total_trips)
        } else {
            Decimal::ZERO
        };

        let mut upcoming_trips = 0;
        let mut ongoing_trips = 0;
        let mut completed_trips = 0;
        for trip in &trips {
            match trip.current_status(now) {
                TripStatus::Upcoming => upcoming_trips += 1,
                TripStatus::Ongoing => ongoing_trips += 1,
                TripStatus::Completed => completed_trips += 1,
                _ => {}
            }
        }

        Ok(TripStats {
            total_trips,
            total_budget,
            avg_budget,
            upcoming_trips,
            ongoing_trips,
            completed_trips,
        })
    }

    /// Persist a generated itinerary and flip its generated flag
    pub async fn save_itinerary(
        db: &DatabaseConnection,
        id: Uuid,
        itinerary: serde_json::Value,
    ) -> AppResult<Trip> {
        let model = TripEntity::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip".to_string()))?;

        let now = OffsetDateTime::now_utc();
        let mut active: ActiveModel = model.into();
        active.activities = Set(Some(itinerary));
        active.itinerary_generated = Set(true);
        active.last_generated_at = Set(Some(now));
        active.updated_at = Set(now);

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Persist generated recommendations and flip their generated flag
    pub async fn save_recommendations(
        db: &DatabaseConnection,
        id: Uuid,
        recommendations: serde_json::Value,
    ) -> AppResult<Trip> {
        let model = TripEntity::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip".to_string()))?;

        let now = OffsetDateTime::now_utc();
        let mut active: ActiveModel = model.into();
        active.recommendations = Set(Some(recommendations));
        active.recommendations_generated = Set(true);
        active.last_generated_at = Set(Some(now));
        active.updated_at = Set(now);

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Persist generated travel tips
    pub async fn save_travel_tips(
        db: &DatabaseConnection,
        id: Uuid,
        tips: serde_json::Value,
    ) -> AppResult<Trip> {
        let model = TripEntity::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip".to_string()))?;

        let mut active: ActiveModel = model.into();
        active.travel_tips = Set(Some(tips));
        active.updated_at = Set(OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }
}

// Conversion from SeaORM model to our domain model
impl From<trip::Model> for Trip {
    fn from(m: trip::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            trip_name: m.trip_name,
            destination: m.destination,
            start_date: m.start_date,
            end_date: m.end_date,
            duration: m.duration,
            budget: m.budget,
            status: m.status,
            preferences: m.preferences,
            itinerary_generated: m.itinerary_generated,
            recommendations_generated: m.recommendations_generated,
            last_generated_at: m.last_generated_at,
            activities: m.activities,
            recommendations: m.recommendations,
            travel_tips: m.travel_tips,
            notes: m.notes,
            is_deleted: m.is_deleted,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
