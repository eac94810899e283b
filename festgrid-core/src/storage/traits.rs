use crate::common::error::Result;
use crate::domain::{Event, Venue};
use async_trait::async_trait;
use uuid::Uuid;

/// Storage surface the import reconciler and its host need. Richer queries
/// (calendar grid, search, moderation) belong to the owning storage
/// collaborator and are out of scope here.
///
/// `create_*` persists the id already set on the record, assigning a fresh
/// one when it is `None`.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_venue(&self, venue: &mut Venue) -> Result<()>;
    async fn delete_venue(&self, venue_id: Uuid) -> Result<()>;
    async fn get_all_venues(&self) -> Result<Vec<Venue>>;

    async fn create_event(&self, event: &mut Event) -> Result<()>;
    async fn delete_event(&self, event_id: Uuid) -> Result<()>;
    async fn get_all_events(&self) -> Result<Vec<Event>>;
}
