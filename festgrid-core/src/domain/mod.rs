use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One show as parsed off a grid page. Ephemeral: produced fresh on every
/// scrape run, with no identity across runs beyond the reconciler's derived
/// `venue|date|artist` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// Venue display name as scraped; used as a join key during import.
    pub venue: String,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Overarching event title, when the block names a themed event distinct
    /// from any single artist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display name for the show: the title when present, otherwise the
    /// primary artist. Never empty.
    pub artist: String,
    /// Secondary artists in insertion order; `None` rather than an empty list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featuring: Option<Vec<String>>,
    /// Free-text start time in whatever format the venue supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Free-text doors-open time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doors: Option<String>,
    /// Free-text price, either "$40.00" or "from $70.00".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl Show {
    /// Key used to carry `first_seen_at` forward when a show reappears on a
    /// later scrape of the same grid.
    pub fn import_key(&self) -> String {
        format!("{}|{}|{}", self.venue, self.date, self.artist)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: Option<Uuid>,
    /// Display name. Deliberately the de-duplication key during import, with
    /// no case or whitespace normalization.
    pub name: String,
    /// Festival-headliner track: exempt from the overwrite-on-rescrape policy.
    pub headliner: bool,
    /// Display ordering rank in the calendar grid.
    pub order: i64,
}

/// A materialized show plus lifecycle metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<Uuid>,
    pub venue_id: Uuid,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featuring: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Routine scrapes insert pre-approved; the manual submission path starts
    /// events at `false` pending moderation.
    pub approved: bool,
    /// When this listing first appeared, carried across rescrapes so the UI
    /// can flag newly-added shows.
    pub first_seen_at: DateTime<Utc>,
}

impl Event {
    /// Same derived key as [`Show::import_key`], using the owning venue's name.
    pub fn import_key(&self, venue_name: &str) -> String {
        format!("{}|{}|{}", venue_name, self.date, self.artist)
    }
}
