//! Traversal of a whole grid page: the date-header row plus one row per
//! venue, each cell holding the show blocks for that venue and date.

use festgrid_core::domain::Show;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::inner_text;
use super::show::assemble_shows;

static TABLE_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static COLUMN_HEADER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".column_header").expect("valid selector"));
static VENUE_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".venue_cell").expect("valid selector"));
static VENUE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".venue_cell a.base_link b").expect("valid selector"));
static SHOW_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".show_cell").expect("valid selector"));
static SHOW_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".show_div").expect("valid selector"));

// Loose month-day pair like "4-23" anywhere in the header text.
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)-(\d+)").expect("valid date regex"));

/// Parses one grid page into shows, in venue-row then date-column then
/// in-cell order. The festival year comes from configuration; the page's
/// headers only carry month and day.
pub fn parse_page(html: &str, festival_year: u16) -> Vec<Show> {
    let document = Html::parse_document(html);

    let dates = date_columns(&document, festival_year);

    let mut shows = Vec::new();
    for row in document.select(&TABLE_ROW) {
        if row.select(&VENUE_CELL).next().is_none() {
            continue;
        }
        let venue = match row.select(&VENUE_LINK).next() {
            Some(link) => inner_text(link),
            None => continue,
        };
        if venue.is_empty() {
            continue;
        }

        for (column, cell) in row.select(&SHOW_CELL).enumerate() {
            let Some(date) = dates.get(column).and_then(|d| d.as_ref()) else {
                continue;
            };
            for block in cell.select(&SHOW_BLOCK) {
                shows.extend(assemble_shows(block, &venue, date));
            }
        }
    }

    debug!(count = shows.len(), "parsed grid page");
    shows
}

/// Date columns from the first header row, index-aligned with the show cells
/// that follow. A header with no month-day pair keeps its position as `None`
/// so later columns do not shift.
fn date_columns(document: &Html, festival_year: u16) -> Vec<Option<String>> {
    let mut dates = Vec::new();
    for row in document.select(&TABLE_ROW) {
        let headers: Vec<_> = row.select(&COLUMN_HEADER).collect();
        if headers.is_empty() {
            continue;
        }
        // First column is the venue-name header, not a date.
        for header in headers.into_iter().skip(1) {
            dates.push(parse_date_header(&inner_text(header), festival_year));
        }
        break;
    }
    dates
}

/// `"4-23"` with year 2026 becomes `"2026-04-23"`.
fn parse_date_header(header: &str, festival_year: u16) -> Option<String> {
    let caps = DATE_RE.captures(header)?;
    Some(format!(
        "{festival_year}-{:0>2}-{:0>2}",
        &caps[1], &caps[2]
    ))
}
