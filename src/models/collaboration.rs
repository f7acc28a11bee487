use std::str::FromStr;

use sea_orm::{DeriveActiveEnum, EnumIter, FromJsonQueryResult};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Role granted to an invited collaborator on a trip
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[default]
    #[sea_orm(string_value = "viewer")]
    Viewer,
    #[sea_orm(string_value = "editor")]
    Editor,
    #[sea_orm(string_value = "co-traveler")]
    CoTraveler,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// Derive the permission set for this role.
    ///
    /// Pure and total over the closed role set. Every mutation path that
    /// changes a collaboration's role must call this and re-assign the
    /// result; permissions are never settable independently.
    pub fn permissions(self) -> Permissions {
        match self {
            Role::Admin => Permissions {
                can_edit: true,
                can_delete: true,
                can_invite: true,
                can_view_budget: true,
                can_view_itinerary: true,
            },
            Role::Editor => Permissions {
                can_edit: true,
                can_delete: false,
                can_invite: true,
                can_view_budget: true,
                can_view_itinerary: true,
            },
            Role::CoTraveler => Permissions {
                can_edit: true,
                can_delete: false,
                can_invite: false,
                can_view_budget: true,
                can_view_itinerary: true,
            },
            Role::Viewer => Permissions {
                can_edit: false,
                can_delete: false,
                can_invite: false,
                can_view_budget: false,
                can_view_itinerary: true,
            },
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "co-traveler" => Ok(Role::CoTraveler),
            "admin" => Ok(Role::Admin),
            other => Err(AppError::Validation(format!("Invalid role: {}", other))),
        }
    }
}

/// Invitation status of a collaboration
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum CollaborationStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "declined")]
    Declined,
    #[sea_orm(string_value = "revoked")]
    Revoked,
}

impl FromStr for CollaborationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CollaborationStatus::Pending),
            "accepted" => Ok(CollaborationStatus::Accepted),
            "declined" => Ok(CollaborationStatus::Declined),
            "revoked" => Ok(CollaborationStatus::Revoked),
            other => Err(AppError::Validation(format!(
                "Invalid collaboration status: {}",
                other
            ))),
        }
    }
}

/// Permission set derived from a role, stored alongside the collaboration
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct Permissions {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_invite: bool,
    pub can_view_budget: bool,
    pub can_view_itinerary: bool,
}

/// A record granting an invited user a role-scoped permission set on a trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaboration {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub invited_user_id: Uuid,
    pub invited_by: Uuid,
    pub role: Role,
    pub status: CollaborationStatus,
    pub permissions: Permissions,
    pub message: Option<String>,
    pub invited_at: OffsetDateTime,
    pub responded_at: Option<OffsetDateTime>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Collaboration creation DTO
#[derive(Debug)]
pub struct CreateCollaboration {
    pub trip_id: Uuid,
    pub invited_user_id: Uuid,
    pub invited_by: Uuid,
    pub role: Role,
    pub message: Option<String>,
}

/// Invitation counts for a user, over active records only
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollaborationStats {
    pub total_invitations: u64,
    pub accepted_invitations: u64,
    pub pending_invitations: u64,
    pub declined_invitations: u64,
}
