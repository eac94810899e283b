//! Assembly of show blocks into [`Show`] records.
//!
//! A block can name a themed event title, carry block-level time/doors/price
//! labels, and hold several performer slots. Grouping follows two regimes:
//! when performers carry their own times (and no shared time exists) each
//! timed performer anchors an independent show, consuming trailing timeless
//! performers as its featuring run; otherwise the whole block collapses into
//! a single show.

use festgrid_core::domain::Show;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use super::gig::{extract_gig, Gig};
use super::inner_text;
use super::text::{extract_price, strip_prefix_ci};

static SHOW_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".show_title b").expect("valid selector"));
static GIG_SLOT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".show_artist").expect("valid selector"));
static TIME_LABEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".show_time").expect("valid selector"));
static INFO_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".show_info").expect("valid selector"));
static TICKET_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".ticket_link").expect("valid selector"));

/// Parses one `.show_div` block into zero or more shows. Best-effort
/// throughout: a block with no resolvable artists yields nothing.
pub fn assemble_shows(block: ElementRef<'_>, venue: &str, date: &str) -> Vec<Show> {
    let title = block
        .select(&SHOW_TITLE)
        .next()
        .map(inner_text)
        .filter(|t| !t.is_empty());

    let gigs: Vec<Gig> = block.select(&GIG_SLOT).filter_map(extract_gig).collect();
    if gigs.is_empty() {
        return Vec::new();
    }

    let (shared_time, shared_doors) = shared_times(block);
    let shared_price = shared_price(block);
    let inline_featuring = inline_featuring(block);

    let ctx = BlockContext {
        venue,
        date,
        title: title.as_deref(),
    };

    let has_gig_times = gigs.iter().any(|g| g.time.is_some());
    if has_gig_times && shared_time.is_none() {
        per_gig_shows(&gigs, &ctx)
    } else {
        vec![single_show(
            &gigs,
            &ctx,
            shared_time,
            shared_doors,
            shared_price,
            &inline_featuring,
        )]
    }
}

struct BlockContext<'a> {
    venue: &'a str,
    date: &'a str,
    title: Option<&'a str>,
}

/// Block-level `show:`/`doors:` labels, ignoring ones inside performer slots.
/// A bare label (no prefix, no mention of doors) falls back to the show time.
fn shared_times(block: ElementRef<'_>) -> (Option<String>, Option<String>) {
    let mut time = None;
    let mut doors = None;
    for label in block.select(&TIME_LABEL) {
        if in_gig_slot(label, block) {
            continue;
        }
        let text = inner_text(label);
        if let Some(rest) = strip_prefix_ci(&text, "doors:") {
            doors = Some(rest.to_string());
        } else if let Some(rest) = strip_prefix_ci(&text, "show:") {
            time = Some(rest.to_string());
        } else if time.is_none() && !text.to_lowercase().contains("doors") && !text.is_empty() {
            time = Some(text);
        }
    }
    (time, doors)
}

/// Price source chain: ticket links first, then informational texts. First
/// dollar amount wins; "starting at" phrasing marks it as a minimum.
fn shared_price(block: ElementRef<'_>) -> Option<String> {
    let sources: [&dyn Fn() -> Option<String>; 2] = [
        &|| price_from(block.select(&TICKET_LINK).map(inner_text)),
        &|| price_from(block.select(&INFO_TEXT).map(inner_text)),
    ];
    sources.iter().find_map(|source| source())
}

fn price_from(texts: impl Iterator<Item = String>) -> Option<String> {
    for text in texts {
        if let Some(amount) = extract_price(&text) {
            return Some(if text.to_lowercase().contains("starting at") {
                format!("from {amount}")
            } else {
                amount
            });
        }
    }
    None
}

/// Names from the last `featuring ...` informational text, comma-split.
fn inline_featuring(block: ElementRef<'_>) -> Vec<String> {
    let mut names = Vec::new();
    for info in block.select(&INFO_TEXT) {
        let text = inner_text(info);
        if let Some(rest) = strip_prefix_ci(&text, "featuring ") {
            names = rest
                .split(',')
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
    names
}

/// True when the element sits inside a performer slot within this block.
fn in_gig_slot(element: ElementRef<'_>, block: ElementRef<'_>) -> bool {
    for node in element.ancestors() {
        if node.id() == block.id() {
            break;
        }
        if let Some(ancestor) = ElementRef::wrap(node) {
            if ancestor.value().classes().any(|c| c == "show_artist") {
                return true;
            }
        }
    }
    false
}

/// Per-gig-time regime: an ordered walk over the gig sequence. A gig carrying
/// a relationship marker anchors a show and consumes the run of immediately
/// following timeless gigs as its featuring list; a timed gig with no marker
/// stands alone; anything else contributes nothing.
fn per_gig_shows(gigs: &[Gig], ctx: &BlockContext<'_>) -> Vec<Show> {
    let mut shows = Vec::new();
    let mut iter = gigs.iter().peekable();

    while let Some(gig) = iter.next() {
        if gig.has_relation() {
            let mut featuring = Vec::new();
            while let Some(follower) = iter.next_if(|g| g.time.is_none()) {
                featuring.push(follower.artist.clone());
            }
            if gig.has_special_guest_after {
                if let Some(first) = featuring.first_mut() {
                    first.push_str(" (special guest)");
                }
            }
            // Per-act shows do not inherit block-level doors/price.
            shows.push(Show {
                venue: ctx.venue.to_string(),
                date: ctx.date.to_string(),
                title: ctx.title.map(str::to_string),
                artist: ctx.title.unwrap_or(&gig.artist).to_string(),
                featuring: if featuring.is_empty() {
                    None
                } else {
                    Some(featuring)
                },
                time: gig.time.clone(),
                doors: None,
                price: None,
            });
        } else if gig.time.is_some() {
            shows.push(Show {
                venue: ctx.venue.to_string(),
                date: ctx.date.to_string(),
                title: None,
                artist: gig.artist.clone(),
                featuring: None,
                time: gig.time.clone(),
                doors: None,
                price: None,
            });
        }
    }
    shows
}

/// Shared-time regime: the whole block is one show fronted by its first gig.
fn single_show(
    gigs: &[Gig],
    ctx: &BlockContext<'_>,
    shared_time: Option<String>,
    shared_doors: Option<String>,
    shared_price: Option<String>,
    inline_featuring: &[String],
) -> Show {
    let main = &gigs[0];

    let featuring: Vec<String> = if ctx.title.is_some() {
        // A themed event credits every listed performer, the first included.
        gigs.iter().map(|g| g.artist.clone()).collect()
    } else if main.has_relation() && gigs.len() > 1 {
        let mut rest: Vec<String> = gigs[1..].iter().map(|g| g.artist.clone()).collect();
        if main.has_special_guest_after {
            if let Some(first) = rest.first_mut() {
                first.push_str(" (special guest)");
            }
        }
        rest
    } else {
        inline_featuring.to_vec()
    };

    Show {
        venue: ctx.venue.to_string(),
        date: ctx.date.to_string(),
        title: ctx.title.map(str::to_string),
        artist: ctx.title.unwrap_or(&main.artist).to_string(),
        featuring: if featuring.is_empty() {
            None
        } else {
            Some(featuring)
        },
        time: shared_time.or_else(|| main.time.clone()),
        doors: shared_doors,
        price: shared_price,
    }
}
