//! Extraction of atomic performer entries from a show block.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use super::inner_text;
use super::text::clean;

static ARTIST_NAME: Lazy<Selector> = Lazy::new(|| Selector::parse("b").expect("valid selector"));
static TIME_LABEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".show_time").expect("valid selector"));
static INFO_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".show_info").expect("valid selector"));

/// One performer entry inside a show block: its own optional start time plus
/// the relationship markers ("featuring" / "with" / "special guest") that
/// follow it in the markup. The flags only steer grouping and are never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gig {
    pub artist: String,
    /// A time attached to this performer rather than the whole block.
    pub time: Option<String>,
    pub has_featuring_after: bool,
    pub has_with_after: bool,
    pub has_special_guest_after: bool,
}

impl Gig {
    pub fn has_relation(&self) -> bool {
        self.has_featuring_after || self.has_with_after || self.has_special_guest_after
    }
}

/// Extracts one gig from a `.show_artist` slot. A slot with no emphasized
/// artist name, or an empty one, contributes nothing.
pub fn extract_gig(slot: ElementRef<'_>) -> Option<Gig> {
    let artist = slot.select(&ARTIST_NAME).next().map(inner_text)?;
    if artist.is_empty() {
        return None;
    }

    let mut gig = Gig {
        artist,
        ..Gig::default()
    };

    // A bare time label inside the slot belongs to this performer; labeled
    // doors/show times are block-level concerns handled by the assembler.
    for label in slot.select(&TIME_LABEL) {
        let text = inner_text(label);
        let lower = text.to_lowercase();
        if !lower.starts_with("doors:") && !lower.starts_with("show:") && !text.is_empty() {
            gig.time = Some(text);
            break;
        }
    }

    for info in slot.select(&INFO_TEXT) {
        let text = clean(&info.text().collect::<String>()).to_lowercase();
        if text.starts_with("featuring") {
            gig.has_featuring_after = true;
        }
        if text == "with" {
            gig.has_with_after = true;
        }
        if text.contains("special guest") {
            gig.has_special_guest_after = true;
        }
    }

    Some(gig)
}
