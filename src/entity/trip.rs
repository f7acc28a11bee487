use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{TripPreferences, TripStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub trip_name: String,
    pub destination: String,
    pub start_date: TimeDateTimeWithTimeZone,
    pub end_date: TimeDateTimeWithTimeZone,
    pub duration: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub budget: Decimal,
    pub status: TripStatus,
    pub preferences: TripPreferences,
    pub itinerary_generated: bool,
    pub recommendations_generated: bool,
    pub last_generated_at: Option<TimeDateTimeWithTimeZone>,
    pub activities: Option<Json>,
    pub recommendations: Option<Json>,
    pub travel_tips: Option<Json>,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::collaboration::Entity")]
    Collaborations,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::collaboration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collaborations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
