use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::Storage;
use crate::common::error::{CoreError, Result};
use crate::domain::{Event, Venue};

/// In-memory storage used by tests and dry runs. A deployment plugs a
/// database-backed implementation in behind the same trait.
#[derive(Default)]
pub struct MemoryStorage {
    venues: RwLock<HashMap<Uuid, Venue>>,
    events: RwLock<HashMap<Uuid, Event>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_venue(&self, venue: &mut Venue) -> Result<()> {
        let id = *venue.id.get_or_insert_with(Uuid::new_v4);
        self.venues.write().await.insert(id, venue.clone());
        Ok(())
    }

    async fn delete_venue(&self, venue_id: Uuid) -> Result<()> {
        self.venues
            .write()
            .await
            .remove(&venue_id)
            .map(|_| ())
            .ok_or_else(|| CoreError::Storage {
                message: format!("venue {venue_id} not found"),
            })
    }

    async fn get_all_venues(&self) -> Result<Vec<Venue>> {
        let mut venues: Vec<Venue> = self.venues.read().await.values().cloned().collect();
        venues.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(venues)
    }

    async fn create_event(&self, event: &mut Event) -> Result<()> {
        let id = *event.id.get_or_insert_with(Uuid::new_v4);
        self.events.write().await.insert(id, event.clone());
        Ok(())
    }

    async fn delete_event(&self, event_id: Uuid) -> Result<()> {
        self.events
            .write()
            .await
            .remove(&event_id)
            .map(|_| ())
            .ok_or_else(|| CoreError::Storage {
                message: format!("event {event_id} not found"),
            })
    }

    async fn get_all_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.artist.cmp(&b.artist)));
        Ok(events)
    }
}
