use std::collections::HashSet;
use std::sync::LazyLock;

use futures::{stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::{Html, Selector};
use tracing::{error, info, warn};

use crate::extract::{self, Listing};
use crate::fetch::PageFetcher;
use crate::locations::discover_locations;

static LISTING_CARD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li.lslide").unwrap());
static CARD_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Site constants plus the two user-facing knobs (page limit, concurrency).
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: String,
    pub index_path: String,
    pub location_marker: String,
    pub listing_prefix: String,
    pub page_limit: usize,
    pub concurrency: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.point2homes.com".to_string(),
            index_path: "/US/Real-Estate-Listings/CA.html".to_string(),
            location_marker: "CA".to_string(),
            listing_prefix: "/US".to_string(),
            page_limit: 1,
            concurrency: 8,
        }
    }
}

/// Crawl totals returned after completion.
#[derive(Debug, Default)]
pub struct CrawlStats {
    pub locations: usize,
    pub pages: usize,
    pub listings: usize,
    pub dropped: usize,
}

struct LocationOutcome {
    listings: Vec<Listing>,
    pages: usize,
    dropped: usize,
}

/// Full pipeline: top index → location discovery → one paginated crawl per
/// location, concatenated in discovery order. A top-index fetch failure is
/// the only point that empties the whole run.
pub async fn run_crawl(fetcher: &dyn PageFetcher, config: &CrawlConfig) -> (Vec<Listing>, CrawlStats) {
    let index_url = format!("{}{}", config.base_url, config.index_path);
    let html = match fetcher.fetch(&index_url).await {
        Ok(html) => html,
        Err(e) => {
            error!("Top index page unavailable, nothing to crawl: {}", e);
            return (Vec::new(), CrawlStats::default());
        }
    };

    let locations = {
        let doc = Html::parse_document(&html);
        discover_locations(&doc, &config.location_marker)
    };

    let pb = ProgressBar::new(locations.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} locations ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut all = Vec::new();
    let mut stats = CrawlStats {
        locations: locations.len(),
        ..CrawlStats::default()
    };

    for location in &locations {
        let outcome = crawl_location(fetcher, config, location).await;
        stats.pages += outcome.pages;
        stats.dropped += outcome.dropped;
        all.extend(outcome.listings);
        pb.inc(1);
    }

    pb.finish_and_clear();
    stats.listings = all.len();
    info!(
        "Crawled {} locations, {} pages: {} listings kept, {} dropped",
        stats.locations, stats.pages, stats.listings, stats.dropped
    );
    (all, stats)
}

/// Walk one location's index pages in order. The visited set is created
/// here and dies here: links are marked visited before dispatch, so a link
/// recurring on a later page is never fetched twice even if its first
/// dispatch failed. An index fetch failure truncates this location only.
async fn crawl_location(
    fetcher: &dyn PageFetcher,
    config: &CrawlConfig,
    location: &str,
) -> LocationOutcome {
    let mut visited: HashSet<String> = HashSet::new();
    let mut listings = Vec::new();
    let mut pages = 0;
    let mut dropped = 0;

    for page in 1..=config.page_limit {
        let page_url = format!("{}{}?page={}", config.base_url, location, page);
        let html = match fetcher.fetch(&page_url).await {
            Ok(html) => html,
            Err(e) => {
                error!("Index page fetch failed, truncating {}: {}", location, e);
                break;
            }
        };
        pages += 1;

        let (cards, links) = {
            let doc = Html::parse_document(&html);
            listing_links(&doc, &config.listing_prefix)
        };

        if cards == 0 {
            info!("{} exhausted at page {}", location, page);
            break;
        }

        let fresh: Vec<String> = links
            .into_iter()
            .filter(|link| visited.insert(link.clone()))
            .collect();

        let results: Vec<Option<Listing>> = stream::iter(fresh)
            .map(|link| {
                let url = format!("{}{}", config.base_url, link);
                async move {
                    let html = match fetcher.fetch(&url).await {
                        Ok(html) => html,
                        Err(e) => {
                            error!("Listing fetch failed: {}", e);
                            return None;
                        }
                    };
                    let doc = Html::parse_document(&html);
                    let span = tracing::info_span!("listing", url = %url);
                    match span.in_scope(|| extract::extract_listing(&doc)) {
                        Ok(listing) => Some(listing),
                        Err(e) => {
                            warn!("Skipping listing {}: {}", url, e);
                            None
                        }
                    }
                }
            })
            .buffered(config.concurrency)
            .collect()
            .await;

        for result in results {
            match result {
                Some(listing) => listings.push(listing),
                None => dropped += 1,
            }
        }
    }

    LocationOutcome {
        listings,
        pages,
        dropped,
    }
}

/// Card count plus each card's first link, prefix-filtered. The raw card
/// count drives pagination termination; an all-duplicates page still
/// advances to the next one.
fn listing_links(doc: &Html, prefix: &str) -> (usize, Vec<String>) {
    let mut cards = 0;
    let mut links = Vec::new();
    for card in doc.select(&LISTING_CARD) {
        cards += 1;
        let href = card
            .select(&CARD_LINK)
            .next()
            .and_then(|a| a.value().attr("href"));
        if let Some(href) = href {
            if href.starts_with(prefix) {
                links.push(href.to_string());
            }
        }
    }
    (cards, links)
}

// ── Tests ──
