use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::info;

static LOCATION_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.psrk-events").unwrap());

/// Collect location hrefs from the top-level index page: document order,
/// first occurrence wins, filtered to hrefs containing `marker` (the state
/// code that distinguishes location links from the rest of the nav).
pub fn discover_locations(doc: &Html, marker: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut locations = Vec::new();

    for anchor in doc.select(&LOCATION_LINK) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.contains(marker) && seen.insert(href.to_string()) {
            locations.push(href.to_string());
        }
    }

    info!("Discovered {} locations", locations.len());
    locations
}

// ── Tests ──
