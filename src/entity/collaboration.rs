use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{CollaborationStatus, Permissions, Role};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collaborations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trip_id: Uuid,
    pub invited_user_id: Uuid,
    pub invited_by: Uuid,
    pub role: Role,
    pub status: CollaborationStatus,
    pub permissions: Permissions,
    pub message: Option<String>,
    pub invited_at: TimeDateTimeWithTimeZone,
    pub responded_at: Option<TimeDateTimeWithTimeZone>,
    pub is_active: bool,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::InvitedUserId",
        to = "super::user::Column::Id"
    )]
    InvitedUser,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::InvitedBy",
        to = "super::user::Column::Id"
    )]
    Inviter,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvitedUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
