pub mod collaboration;
pub mod trip;
pub mod user;

pub use collaboration::CollaborationRepository;
pub use trip::TripRepository;
pub use user::UserRepository;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::AppResult;

/// Base repository trait for common lookups.
///
/// Nothing in this domain is ever hard-deleted; removal is modelled as
/// soft-delete flags on the individual repositories.
#[async_trait]
pub trait Repository<T>
where
    T: Send + Sync,
{
    /// Find entity by ID
    async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> AppResult<T>;
}
