//! Merges freshly scraped shows into the persisted calendar.
//!
//! Routine (non-headliner) content is overwritten wholesale on every run,
//! while the festival-headliner track and user submissions still pending
//! moderation survive untouched. `first_seen_at` timestamps are carried
//! forward by `venue|date|artist` key so a show that merely reappears is not
//! presented as new.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::common::error::Result;
use crate::domain::{Event, Show, Venue};
use crate::storage::traits::Storage;

/// Insert/delete operations for one import run, computed up front so the
/// storage host can apply them in a single pass.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    pub delete_events: Vec<Uuid>,
    pub delete_venues: Vec<Uuid>,
    pub create_venues: Vec<Venue>,
    pub create_events: Vec<Event>,
    pub summary: ImportSummary,
}

/// Tally of one import run, detailed enough for the host's logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub venues_created: usize,
    pub events_created: usize,
    pub venues_deleted: usize,
    pub events_deleted: usize,
    pub preserved_pending_events: usize,
    pub preserved_protected_events: usize,
}

/// Computes the operations that reconcile `shows` against the persisted
/// state. Pure apart from fresh ids for created records; `now` becomes the
/// `first_seen_at` of any show whose key has not been seen before.
pub fn plan_import(
    venues: &[Venue],
    events: &[Event],
    shows: &[Show],
    now: DateTime<Utc>,
) -> ImportPlan {
    let mut plan = ImportPlan::default();

    let venue_names: HashMap<Uuid, &str> = venues
        .iter()
        .filter_map(|v| v.id.map(|id| (id, v.name.as_str())))
        .collect();
    let protected: HashSet<Uuid> = venues
        .iter()
        .filter(|v| v.headliner)
        .filter_map(|v| v.id)
        .collect();

    // First-seen lookup scoped to routine events, keyed by the venue's name
    // as of deletion time. Last write wins on key collision.
    let mut first_seen: HashMap<String, DateTime<Utc>> = HashMap::new();
    for event in events {
        if protected.contains(&event.venue_id) {
            continue;
        }
        if let Some(name) = venue_names.get(&event.venue_id) {
            first_seen.insert(event.import_key(name), event.first_seen_at);
        }
    }

    let mut venues_with_pending: HashSet<Uuid> = HashSet::new();
    for event in events {
        if protected.contains(&event.venue_id) {
            plan.summary.preserved_protected_events += 1;
            continue;
        }
        if !event.approved {
            plan.summary.preserved_pending_events += 1;
            venues_with_pending.insert(event.venue_id);
            continue;
        }
        if let Some(id) = event.id {
            plan.delete_events.push(id);
        }
    }

    // Routine venues go unless a pending submission still points at them.
    let mut name_to_id: HashMap<&str, Uuid> = HashMap::new();
    let mut max_order: i64 = -1;
    for venue in venues {
        let Some(id) = venue.id else { continue };
        if venue.headliner || venues_with_pending.contains(&id) {
            name_to_id.insert(venue.name.as_str(), id);
            max_order = max_order.max(venue.order);
        } else {
            plan.delete_venues.push(id);
        }
    }

    // Distinct venue names from the scrape, first-seen order. Names already
    // present among the survivors reuse that venue's identity.
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut next_order = max_order + 1;
    for show in shows {
        if !seen_names.insert(show.venue.as_str()) {
            continue;
        }
        if name_to_id.contains_key(show.venue.as_str()) {
            continue;
        }
        let id = Uuid::new_v4();
        plan.create_venues.push(Venue {
            id: Some(id),
            name: show.venue.clone(),
            headliner: false,
            order: next_order,
        });
        next_order += 1;
        name_to_id.insert(show.venue.as_str(), id);
    }

    for show in shows {
        // Every show's venue was just registered, so a miss should not occur
        // by construction; skip silently rather than fail the run.
        let Some(&venue_id) = name_to_id.get(show.venue.as_str()) else {
            continue;
        };
        let first_seen_at = first_seen.get(&show.import_key()).copied().unwrap_or(now);
        plan.create_events.push(Event {
            id: Some(Uuid::new_v4()),
            venue_id,
            date: show.date.clone(),
            title: show.title.clone(),
            artist: show.artist.clone(),
            featuring: show.featuring.clone(),
            time: show.time.clone(),
            doors: show.doors.clone(),
            price: show.price.clone(),
            approved: true,
            first_seen_at,
        });
    }

    plan.summary.venues_created = plan.create_venues.len();
    plan.summary.events_created = plan.create_events.len();
    plan.summary.venues_deleted = plan.delete_venues.len();
    plan.summary.events_deleted = plan.delete_events.len();
    plan
}

/// Applies a plan against storage: deletes first, then inserts.
pub async fn apply_plan(storage: &dyn Storage, plan: &ImportPlan) -> Result<ImportSummary> {
    for id in &plan.delete_events {
        storage.delete_event(*id).await?;
    }
    for id in &plan.delete_venues {
        storage.delete_venue(*id).await?;
    }
    for venue in &plan.create_venues {
        let mut venue = venue.clone();
        storage.create_venue(&mut venue).await?;
    }
    for event in &plan.create_events {
        let mut event = event.clone();
        storage.create_event(&mut event).await?;
    }
    info!(
        venues_created = plan.summary.venues_created,
        events_created = plan.summary.events_created,
        venues_deleted = plan.summary.venues_deleted,
        events_deleted = plan.summary.events_deleted,
        preserved_pending = plan.summary.preserved_pending_events,
        preserved_protected = plan.summary.preserved_protected_events,
        "import applied"
    );
    Ok(plan.summary)
}

/// Reads the persisted state, plans, and applies in one call.
pub async fn import_shows(
    storage: &dyn Storage,
    shows: &[Show],
    now: DateTime<Utc>,
) -> Result<ImportSummary> {
    let venues = storage.get_all_venues().await?;
    let events = storage.get_all_events().await?;
    let plan = plan_import(&venues, &events, shows, now);
    apply_plan(storage, &plan).await
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::storage::memory::MemoryStorage;

    fn show(venue: &str, date: &str, artist: &str) -> Show {
        Show {
            venue: venue.to_string(),
            date: date.to_string(),
            title: None,
            artist: artist.to_string(),
            featuring: None,
            time: None,
            doors: None,
            price: None,
        }
    }

    fn venue(name: &str, headliner: bool, order: i64) -> Venue {
        Venue {
            id: Some(Uuid::new_v4()),
            name: name.to_string(),
            headliner,
            order,
        }
    }

    fn event(venue: &Venue, date: &str, artist: &str, approved: bool) -> Event {
        Event {
            id: Some(Uuid::new_v4()),
            venue_id: venue.id.unwrap(),
            date: date.to_string(),
            title: None,
            artist: artist.to_string(),
            featuring: None,
            time: None,
            doors: None,
            price: None,
            approved,
            first_seen_at: Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn rescrape_preserves_first_seen_timestamps() {
        let maple = venue("Maple Leaf", false, 0);
        let existing = event(&maple, "2026-04-23", "Rebirth Brass Band", true);
        let original_seen = existing.first_seen_at;

        let shows = vec![show("Maple Leaf", "2026-04-23", "Rebirth Brass Band")];
        let now = Utc.with_ymd_and_hms(2026, 4, 20, 0, 0, 0).unwrap();
        let plan = plan_import(&[maple], &[existing], &shows, now);

        assert_eq!(plan.create_events.len(), 1);
        assert_eq!(plan.create_events[0].first_seen_at, original_seen);
    }

    #[test]
    fn brand_new_show_is_first_seen_now() {
        let now = Utc.with_ymd_and_hms(2026, 4, 20, 0, 0, 0).unwrap();
        let shows = vec![show("Blue Nile", "2026-04-24", "Kermit Ruffins")];
        let plan = plan_import(&[], &[], &shows, now);

        assert_eq!(plan.create_events.len(), 1);
        assert_eq!(plan.create_events[0].first_seen_at, now);
        assert!(plan.create_events[0].approved);
    }

    #[test]
    fn protected_and_pending_events_survive() {
        let fairgrounds = venue("Fair Grounds", true, 0);
        let maple = venue("Maple Leaf", false, 1);
        let headliner_event = event(&fairgrounds, "2026-04-25", "The Headliner", true);
        let pending = event(&maple, "2026-04-26", "Unreviewed Act", false);
        let routine = event(&maple, "2026-04-26", "Old Listing", true);

        let plan = plan_import(
            &[fairgrounds.clone(), maple.clone()],
            &[headliner_event.clone(), pending.clone(), routine.clone()],
            &[],
            Utc::now(),
        );

        assert_eq!(plan.delete_events, vec![routine.id.unwrap()]);
        assert!(plan.delete_venues.is_empty(), "venue with pending survives");
        assert_eq!(plan.summary.preserved_pending_events, 1);
        assert_eq!(plan.summary.preserved_protected_events, 1);
    }

    #[test]
    fn routine_venue_without_pending_is_deleted() {
        let maple = venue("Maple Leaf", false, 0);
        let routine = event(&maple, "2026-04-26", "Old Listing", true);

        let plan = plan_import(&[maple.clone()], &[routine], &[], Utc::now());

        assert_eq!(plan.delete_venues, vec![maple.id.unwrap()]);
        assert_eq!(plan.summary.events_deleted, 1);
    }

    #[test]
    fn surviving_venue_is_reused_by_exact_name() {
        let fairgrounds = venue("Fair Grounds", true, 3);
        let shows = vec![
            show("Fair Grounds", "2026-04-25", "Festival Act"),
            show("fair grounds", "2026-04-25", "Lowercase Act"),
        ];
        let plan = plan_import(&[fairgrounds.clone()], &[], &shows, Utc::now());

        // Exact match reuses identity; the differently-cased name is a new
        // venue, ranked after the survivor.
        assert_eq!(plan.create_venues.len(), 1);
        assert_eq!(plan.create_venues[0].name, "fair grounds");
        assert_eq!(plan.create_venues[0].order, 4);
        assert_eq!(plan.create_events[0].venue_id, fairgrounds.id.unwrap());
        assert_eq!(plan.create_events[1].venue_id, plan.create_venues[0].id.unwrap());
    }

    #[test]
    fn new_venues_rank_in_first_seen_order() {
        let shows = vec![
            show("Tipitina's", "2026-04-23", "A"),
            show("Blue Nile", "2026-04-23", "B"),
            show("Tipitina's", "2026-04-24", "C"),
        ];
        let plan = plan_import(&[], &[], &shows, Utc::now());

        let names: Vec<&str> = plan.create_venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Tipitina's", "Blue Nile"]);
        assert_eq!(plan.create_venues[0].order, 0);
        assert_eq!(plan.create_venues[1].order, 1);
        assert_eq!(plan.summary.venues_created, 2);
        assert_eq!(plan.summary.events_created, 3);
    }

    #[test]
    fn first_seen_collision_is_last_write_wins() {
        let maple = venue("Maple Leaf", false, 0);
        let mut earlier = event(&maple, "2026-04-23", "Same Act", true);
        earlier.first_seen_at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let later = event(&maple, "2026-04-23", "Same Act", true);

        let shows = vec![show("Maple Leaf", "2026-04-23", "Same Act")];
        let plan = plan_import(&[maple], &[earlier, later.clone()], &shows, Utc::now());

        assert_eq!(plan.create_events[0].first_seen_at, later.first_seen_at);
    }

    #[tokio::test]
    async fn import_shows_roundtrips_through_storage() {
        let storage = MemoryStorage::new();
        let now = Utc.with_ymd_and_hms(2026, 4, 20, 0, 0, 0).unwrap();
        let shows = vec![
            show("Maple Leaf", "2026-04-23", "Rebirth Brass Band"),
            show("Blue Nile", "2026-04-23", "Kermit Ruffins"),
        ];

        let summary = import_shows(&storage, &shows, now).await.unwrap();
        assert_eq!(summary.venues_created, 2);
        assert_eq!(summary.events_created, 2);

        // Second run a day later: same shows, timestamps carried forward.
        let later = Utc.with_ymd_and_hms(2026, 4, 21, 0, 0, 0).unwrap();
        let summary = import_shows(&storage, &shows, later).await.unwrap();
        assert_eq!(summary.events_deleted, 2);
        assert_eq!(summary.events_created, 2);

        let events = storage.get_all_events().await.unwrap();
        assert!(events.iter().all(|e| e.first_seen_at == now));
    }
}
