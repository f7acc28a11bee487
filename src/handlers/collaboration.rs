use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Collaboration, CollaborationStats, CollaborationStatus, CreateCollaboration, Permissions, Role,
};
use crate::repositories::{
    CollaborationRepository, Repository, TripRepository, UserRepository,
};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct InviteRequest {
    pub trip_id: Uuid,
    pub invited_user_id: Uuid,
    pub invited_by: Uuid,
    /// One of viewer/editor/co-traveler/admin; defaults to viewer
    pub role: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct InvitationsQuery {
    /// Filter by invitation status
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollaborationResponse {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub invited_user_id: Uuid,
    pub invited_by: Uuid,
    #[schema(value_type = String)]
    pub role: Role,
    #[schema(value_type = String)]
    pub status: CollaborationStatus,
    pub permissions: Permissions,
    pub message: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub invited_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub responded_at: Option<OffsetDateTime>,
    pub is_active: bool,
}

impl From<Collaboration> for CollaborationResponse {
    fn from(c: Collaboration) -> Self {
        Self {
            id: c.id,
            trip_id: c.trip_id,
            invited_user_id: c.invited_user_id,
            invited_by: c.invited_by,
            role: c.role,
            status: c.status,
            permissions: c.permissions,
            message: c.message,
            invited_at: c.invited_at,
            responded_at: c.responded_at,
            is_active: c.is_active,
        }
    }
}

// ============ Handlers ============

/// Invite a user to collaborate on a trip
#[utoipa::path(
    post,
    path = "/api/collaboration/invite",
    request_body = InviteRequest,
    responses(
        (status = 200, description = "Invitation created", body = CollaborationResponse),
        (status = 400, description = "Invalid role"),
        (status = 404, description = "Trip or user not found"),
        (status = 409, description = "User already invited to this trip")
    ),
    tag = "Collaboration"
)]
pub async fn invite(
    State(state): State<AppState>,
    Json(payload): Json<InviteRequest>,
) -> AppResult<Json<CollaborationResponse>> {
    let role: Role = payload
        .role
        .as_deref()
        .map(str::parse)
        .transpose()?
        .unwrap_or_default();

    // Preconditions, in order: trip exists and is not deleted, invited user
    // exists and is active, no active invitation already in place
    let trip = TripRepository::find_by_id_any(&state.db, payload.trip_id)
        .await?
        .filter(|t| !t.is_deleted)
        .ok_or_else(|| AppError::NotFound("Trip".to_string()))?;

    let invited_user = UserRepository::find_by_id(&state.db, payload.invited_user_id).await?;
    if !invited_user.is_active {
        return Err(AppError::NotFound("User".to_string()));
    }

    let existing =
        CollaborationRepository::find_active_pair(&state.db, trip.id, invited_user.id).await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "User already invited to this trip".to_string(),
        ));
    }

    let create = CreateCollaboration {
        trip_id: payload.trip_id,
        invited_user_id: payload.invited_user_id,
        invited_by: payload.invited_by,
        role,
        message: payload.message,
    };

    let collaboration = CollaborationRepository::create(&state.db, &create).await?;
    Ok(Json(collaboration.into()))
}

/// List a user's active invitations, optionally filtered by status
#[utoipa::path(
    get,
    path = "/api/collaboration/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Invited user ID"),
        InvitationsQuery
    ),
    responses(
        (status = 200, description = "The user's invitations", body = [CollaborationResponse]),
        (status = 400, description = "Invalid status filter")
    ),
    tag = "Collaboration"
)]
pub async fn list_user_invitations(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<InvitationsQuery>,
) -> AppResult<Json<Vec<CollaborationResponse>>> {
    let status: Option<CollaborationStatus> =
        query.status.as_deref().map(str::parse).transpose()?;

    let collaborations = CollaborationRepository::list_for_user(&state.db, user_id, status).await?;
    Ok(Json(collaborations.into_iter().map(|c| c.into()).collect()))
}

/// List the active collaborations on a trip
#[utoipa::path(
    get,
    path = "/api/collaboration/trip/{trip_id}",
    params(("trip_id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "The trip's collaborations", body = [CollaborationResponse])
    ),
    tag = "Collaboration"
)]
pub async fn list_trip_collaborations(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<Vec<CollaborationResponse>>> {
    let collaborations = CollaborationRepository::list_for_trip(&state.db, trip_id).await?;
    Ok(Json(collaborations.into_iter().map(|c| c.into()).collect()))
}

/// Accept a pending invitation
#[utoipa::path(
    put,
    path = "/api/collaboration/{collaboration_id}/accept",
    params(("collaboration_id" = Uuid, Path, description = "Collaboration ID")),
    responses(
        (status = 200, description = "Invitation accepted", body = CollaborationResponse),
        (status = 404, description = "Collaboration not found"),
        (status = 409, description = "Invitation has already been responded to")
    ),
    tag = "Collaboration"
)]
pub async fn accept_invitation(
    State(state): State<AppState>,
    Path(collaboration_id): Path<Uuid>,
) -> AppResult<Json<CollaborationResponse>> {
    let collaboration = CollaborationRepository::accept(&state.db, collaboration_id).await?;
    Ok(Json(collaboration.into()))
}

/// Decline a pending invitation
#[utoipa::path(
    put,
    path = "/api/collaboration/{collaboration_id}/decline",
    params(("collaboration_id" = Uuid, Path, description = "Collaboration ID")),
    responses(
        (status = 200, description = "Invitation declined", body = CollaborationResponse),
        (status = 404, description = "Collaboration not found"),
        (status = 409, description = "Invitation has already been responded to")
    ),
    tag = "Collaboration"
)]
pub async fn decline_invitation(
    State(state): State<AppState>,
    Path(collaboration_id): Path<Uuid>,
) -> AppResult<Json<CollaborationResponse>> {
    let collaboration = CollaborationRepository::decline(&state.db, collaboration_id).await?;
    Ok(Json(collaboration.into()))
}

/// Revoke an invitation (inviter side)
#[utoipa::path(
    put,
    path = "/api/collaboration/{collaboration_id}/revoke",
    params(("collaboration_id" = Uuid, Path, description = "Collaboration ID")),
    responses(
        (status = 200, description = "Invitation revoked", body = CollaborationResponse),
        (status = 404, description = "Collaboration not found")
    ),
    tag = "Collaboration"
)]
pub async fn revoke_invitation(
    State(state): State<AppState>,
    Path(collaboration_id): Path<Uuid>,
) -> AppResult<Json<CollaborationResponse>> {
    let collaboration = CollaborationRepository::revoke(&state.db, collaboration_id).await?;
    Ok(Json(collaboration.into()))
}

/// Change a collaborator's role; permissions follow the role
#[utoipa::path(
    put,
    path = "/api/collaboration/{collaboration_id}/role",
    params(("collaboration_id" = Uuid, Path, description = "Collaboration ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = CollaborationResponse),
        (status = 400, description = "Invalid role"),
        (status = 404, description = "Collaboration not found")
    ),
    tag = "Collaboration"
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(collaboration_id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<CollaborationResponse>> {
    let role: Role = payload.role.parse()?;

    let collaboration =
        CollaborationRepository::update_role(&state.db, collaboration_id, role).await?;
    Ok(Json(collaboration.into()))
}

/// Remove a collaboration from listings; the record is retained
#[utoipa::path(
    delete,
    path = "/api/collaboration/{collaboration_id}",
    params(("collaboration_id" = Uuid, Path, description = "Collaboration ID")),
    responses(
        (status = 200, description = "Collaboration removed", body = CollaborationResponse),
        (status = 404, description = "Collaboration not found")
    ),
    tag = "Collaboration"
)]
pub async fn remove_collaboration(
    State(state): State<AppState>,
    Path(collaboration_id): Path<Uuid>,
) -> AppResult<Json<CollaborationResponse>> {
    let collaboration = CollaborationRepository::remove(&state.db, collaboration_id).await?;
    Ok(Json(collaboration.into()))
}

/// Invitation counts for a user
#[utoipa::path(
    get,
    path = "/api/collaboration/stats/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Invitation statistics", body = CollaborationStats)
    ),
    tag = "Collaboration"
)]
pub async fn collaboration_stats(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<CollaborationStats>> {
    let stats = CollaborationRepository::stats(&state.db, user_id).await?;
    Ok(Json(stats))
}
