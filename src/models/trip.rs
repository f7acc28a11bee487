use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter, FromJsonQueryResult};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Trip status. `cancelled` is sticky-terminal once set; the other values
/// are derived from the wall clock via [`TripStatus::derive`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    #[sea_orm(string_value = "planning")]
    Planning,
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl TripStatus {
    /// Derive the current status from the stored status and the trip's date
    /// range. Stored `cancelled` always wins; otherwise the result depends
    /// only on `now` relative to `[start, end]` (inclusive).
    ///
    /// This is the single derivation point; callers must invoke it wherever
    /// a current status is needed instead of trusting the stored field.
    pub fn derive(
        stored: TripStatus,
        start: OffsetDateTime,
        end: OffsetDateTime,
        now: OffsetDateTime,
    ) -> TripStatus {
        if stored == TripStatus::Cancelled {
            return TripStatus::Cancelled;
        }
        if now < start {
            TripStatus::Upcoming
        } else if now <= end {
            TripStatus::Ongoing
        } else {
            TripStatus::Completed
        }
    }
}

impl FromStr for TripStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(TripStatus::Planning),
            "upcoming" => Ok(TripStatus::Upcoming),
            "ongoing" => Ok(TripStatus::Ongoing),
            "completed" => Ok(TripStatus::Completed),
            "cancelled" => Ok(TripStatus::Cancelled),
            other => Err(AppError::Validation(format!(
                "Invalid trip status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TravelStyle {
    Relaxed,
    #[default]
    Balanced,
    FastPaced,
    Adventure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetRange {
    Budget,
    #[default]
    MidRange,
    Luxury,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AccommodationStyle {
    #[default]
    Hotels,
    Hostels,
    VacationRentals,
    EcoLodges,
    Camping,
    LuxuryResorts,
}

/// Per-trip preferences, stored as a JSON column. Can override the owner's
/// profile preferences for this trip.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct TripPreferences {
    pub travel_style: TravelStyle,
    #[serde(default)]
    pub interests: Vec<String>,
    pub budget_range: BudgetRange,
    pub accommodation_style: AccommodationStyle,
}

/// A planned trip owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trip_name: String,
    pub destination: String,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    /// Calculated in days, recomputed from the dates on every write
    pub duration: i32,
    pub budget: Decimal,
    pub status: TripStatus,
    pub preferences: TripPreferences,
    pub itinerary_generated: bool,
    pub recommendations_generated: bool,
    pub last_generated_at: Option<OffsetDateTime>,
    pub activities: Option<serde_json::Value>,
    pub recommendations: Option<serde_json::Value>,
    pub travel_tips: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Trip {
    /// Current status reflecting wall-clock time; see [`TripStatus::derive`].
    pub fn current_status(&self, now: OffsetDateTime) -> TripStatus {
        TripStatus::derive(self.status, self.start_date, self.end_date, now)
    }
}

/// Trip duration in whole days, rounding any partial day up.
pub fn duration_days(start: OffsetDateTime, end: OffsetDateTime) -> i32 {
    let secs = (end - start).whole_seconds();
    ((secs + 86_399) / 86_400) as i32
}

/// Trip creation DTO
#[derive(Debug)]
pub struct CreateTrip {
    pub user_id: Uuid,
    pub trip_name: String,
    pub destination: String,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    pub budget: Decimal,
    pub status: Option<TripStatus>,
    pub preferences: Option<TripPreferences>,
}

/// Partial trip update DTO
#[derive(Debug, Default)]
pub struct UpdateTrip {
    pub trip_name: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
    pub budget: Option<Decimal>,
    pub status: Option<TripStatus>,
    pub preferences: Option<TripPreferences>,
    pub notes: Option<String>,
}

/// Aggregated trip figures for a user, over non-deleted trips only
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TripStats {
    pub total_trips: u64,
    #[schema(value_type = String)]
    pub total_budget: Decimal,
    #[schema(value_type = String)]
    pub avg_budget: Decimal,
    pub upcoming_trips: u64,
    pub ongoing_trips: u64,
    pub completed_trips: u64,
}

// ============ AI-generated content ============
//
// The generation service parses Gemini output into these structures before
// anything is persisted; each content type is saved independently.

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItineraryDay {
    pub day: i32,
    pub date: String,
    pub items: Vec<ActivityItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityItem {
    pub time: String,
    pub title: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// In minutes
    pub duration: Option<i64>,
    pub cost: Option<f64>,
    #[serde(default)]
    pub booking_required: bool,
    pub booking_info: Option<BookingInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingInfo {
    pub website: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Recommendations {
    #[serde(default)]
    pub attractions: Vec<Attraction>,
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Attraction {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub rating: Option<f64>,
    pub cost: Option<f64>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Restaurant {
    pub name: String,
    pub cuisine: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub rating: Option<f64>,
    pub price_range: Option<String>,
    #[serde(default)]
    pub dietary_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Experience {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// In minutes
    pub duration: Option<i64>,
    pub cost: Option<f64>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TravelTip {
    pub category: TipCategory,
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub importance: TipImportance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
    Cultural,
    Transportation,
    Safety,
    Language,
    Weather,
    Money,
    Food,
    Customs,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TipImportance {
    Low,
    #[default]
    Medium,
    High,
}
