//! Parser for the grid site's show listings.
//!
//! The markup is a table of venues by dates whose cells hold nested show
//! blocks. This is a fixed-shape extractor tuned to that one site's class
//! vocabulary (`.show_div`, `.show_artist`, `.show_time`, ...), with a
//! deterministic rule set for inferring artist groupings, featuring
//! relationships, shared vs. per-act times, and ticket prices. The whole
//! parser is a pure function from an HTML document to a sequence of shows.

pub mod gig;
pub mod page;
pub mod show;
pub mod text;

pub use gig::{extract_gig, Gig};
pub use page::parse_page;
pub use show::assemble_shows;

use scraper::ElementRef;

/// Cleaned text content of an element, descendant text joined.
pub(crate) fn inner_text(element: ElementRef<'_>) -> String {
    text::clean(&element.text().collect::<String>())
}
