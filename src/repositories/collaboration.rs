use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entity::collaboration::{self, ActiveModel, Column, Entity as CollaborationEntity};
use crate::error::{AppError, AppResult};
use crate::models::{
    Collaboration, CollaborationStats, CollaborationStatus, CreateCollaboration, Role,
};
use crate::repositories::Repository;

/// Collaboration repository for database operations.
///
/// Records are never hard-deleted: revocation and removal flip `is_active`
/// and the row is retained for history. Every lifecycle mutation targets an
/// active record; operating on an inactive one reports NotFound.
pub struct CollaborationRepository;

#[async_trait]
impl Repository<Collaboration> for CollaborationRepository {
    async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> AppResult<Collaboration> {
        let model = CollaborationEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Collaboration".to_string()))?;

        Ok(model.into())
    }
}

impl CollaborationRepository {
    /// Create a pending invitation with permissions derived from the role.
    ///
    /// The partial unique index on (trip_id, invited_user_id) backs the
    /// caller's active-pair check, so a concurrent duplicate insert still
    /// surfaces as Conflict.
    pub async fn create(
        db: &DatabaseConnection,
        input: &CreateCollaboration,
    ) -> AppResult<Collaboration> {
        let now = OffsetDateTime::now_utc();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            trip_id: Set(input.trip_id),
            invited_user_id: Set(input.invited_user_id),
            invited_by: Set(input.invited_by),
            role: Set(input.role),
            status: Set(CollaborationStatus::Pending),
            permissions: Set(input.role.permissions()),
            message: Set(input.message.clone()),
            invited_at: Set(now),
            responded_at: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(db).await.map_err(|e| {
            if e.to_string().contains("duplicate key") || e.to_string().contains("unique") {
                AppError::Conflict("User already invited to this trip".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        Ok(result.into())
    }

    /// Find the active collaboration for a (trip, invited user) pair, if any
    pub async fn find_active_pair(
        db: &DatabaseConnection,
        trip_id: Uuid,
        invited_user_id: Uuid,
    ) -> AppResult<Option<Collaboration>> {
        let model = CollaborationEntity::find()
            .filter(Column::TripId.eq(trip_id))
            .filter(Column::InvitedUserId.eq(invited_user_id))
            .filter(Column::IsActive.eq(true))
            .one(db)
            .await?;

        Ok(model.map(|m| m.into()))
    }

    /// Active invitations for a user, newest first, optionally filtered by
    /// status
    pub async fn list_for_user(
        db: &DatabaseConnection,
        user_id: Uuid,
        status: Option<CollaborationStatus>,
    ) -> AppResult<Vec<Collaboration>> {
        let mut query = CollaborationEntity::find()
            .filter(Column::InvitedUserId.eq(user_id))
            .filter(Column::IsActive.eq(true));

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        let models = query.order_by_desc(Column::InvitedAt).all(db).await?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Active collaborations on a trip, newest first
    pub async fn list_for_trip(
        db: &DatabaseConnection,
        trip_id: Uuid,
    ) -> AppResult<Vec<Collaboration>> {
        let models = CollaborationEntity::find()
            .filter(Column::TripId.eq(trip_id))
            .filter(Column::IsActive.eq(true))
            .order_by_desc(Column::InvitedAt)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Accept a pending invitation, stamping responded_at
    pub async fn accept(db: &DatabaseConnection, id: Uuid) -> AppResult<Collaboration> {
        Self::respond(db, id, CollaborationStatus::Accepted).await
    }

    /// Decline a pending invitation, stamping responded_at
    pub async fn decline(db: &DatabaseConnection, id: Uuid) -> AppResult<Collaboration> {
        Self::respond(db, id, CollaborationStatus::Declined).await
    }

    // accept/decline are valid only out of `pending`; a second response
    // attempt is a Conflict rather than a silent overwrite
    async fn respond(
        db: &DatabaseConnection,
        id: Uuid,
        status: CollaborationStatus,
    ) -> AppResult<Collaboration> {
        let model = Self::find_active(db, id).await?;

        if model.status != CollaborationStatus::Pending {
            return Err(AppError::Conflict(
                "Invitation has already been responded to".to_string(),
            ));
        }

        let now = OffsetDateTime::now_utc();
        let mut active: ActiveModel = model.into();
        active.status = Set(status);
        active.responded_at = Set(Some(now));
        active.updated_at = Set(now);

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Revoke an invitation: status becomes revoked and the record leaves
    /// all default listings, regardless of its prior status
    pub async fn revoke(db: &DatabaseConnection, id: Uuid) -> AppResult<Collaboration> {
        let model = Self::find_active(db, id).await?;

        let mut active: ActiveModel = model.into();
        active.status = Set(CollaborationStatus::Revoked);
        active.is_active = Set(false);
        active.updated_at = Set(OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Change the role, re-deriving the permission set
    pub async fn update_role(
        db: &DatabaseConnection,
        id: Uuid,
        role: Role,
    ) -> AppResult<Collaboration> {
        let model = Self::find_active(db, id).await?;

        let mut active: ActiveModel = model.into();
        active.role = Set(role);
        active.permissions = Set(role.permissions());
        active.updated_at = Set(OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Remove a collaboration from default listings; status is untouched
    pub async fn remove(db: &DatabaseConnection, id: Uuid) -> AppResult<Collaboration> {
        let model = Self::find_active(db, id).await?;

        let mut active: ActiveModel = model.into();
        active.is_active = Set(false);
        active.updated_at = Set(OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Invitation counts for a user over active records; all zeros when the
    /// user has none
    pub async fn stats(db: &DatabaseConnection, user_id: Uuid) -> AppResult<CollaborationStats> {
        let base = CollaborationEntity::find()
            .filter(Column::InvitedUserId.eq(user_id))
            .filter(Column::IsActive.eq(true));

        let total_invitations = base.clone().count(db).await?;
        let accepted_invitations = base
            .clone()
            .filter(Column::Status.eq(CollaborationStatus::Accepted))
            .count(db)
            .await?;
        let pending_invitations = base
            .clone()
            .filter(Column::Status.eq(CollaborationStatus::Pending))
            .count(db)
            .await?;
        let declined_invitations = base
            .filter(Column::Status.eq(CollaborationStatus::Declined))
            .count(db)
            .await?;

        Ok(CollaborationStats {
            total_invitations,
            accepted_invitations,
            pending_invitations,
            declined_invitations,
        })
    }

    async fn find_active(db: &DatabaseConnection, id: Uuid) -> AppResult<collaboration::Model> {
        CollaborationEntity::find_by_id(id)
            .filter(Column::IsActive.eq(true))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Collaboration".to_string()))
    }
}

// Conversion from SeaORM model to our domain model
impl From<collaboration::Model> for Collaboration {
    fn from(m: collaboration::Model) -> Self {
        Self {
            id: m.id,
            trip_id: m.trip_id,
            invited_user_id: m.invited_user_id,
            invited_by: m.invited_by,
            role: m.role,
            status: m.status,
            permissions: m.permissions,
            message: m.message,
            invited_at: m.invited_at,
            responded_at: m.responded_at,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
