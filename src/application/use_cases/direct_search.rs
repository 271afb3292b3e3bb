use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::application::ListingSource;
use crate::domain::{
    CarListing, DirectSearchDebug, DomainError, SearchDebug, SearchMethod, SearchRequest,
    SearchResponse, SearchResults,
};

/// Site-selection entry that enables every Danish marketplace source.
const DK_GROUP: &str = "group:DK";

/// Fan a search out to the marketplace sources, merge, dedupe and sort.
pub struct DirectSearchUseCase {
    sources: Vec<Arc<dyn ListingSource>>,
}

impl DirectSearchUseCase {
    pub fn new(sources: Vec<Arc<dyn ListingSource>>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[Arc<dyn ListingSource>] {
        &self.sources
    }

    pub async fn execute(&self, request: SearchRequest) -> Result<SearchResponse, DomainError> {
        let request = request.normalized();
        request.validate_for_direct_search()?;

        info!("Direct search: {}", request.summary());
        let start_time = Instant::now();

        let selected: Vec<&Arc<dyn ListingSource>> = self
            .sources
            .iter()
            .filter(|source| is_selected(source.domain(), &request.sites))
            .collect();

        let batches = join_all(selected.iter().map(|source| source.search(&request))).await;

        let mut raw: Vec<CarListing> = Vec::new();
        for (source, batch) in selected.iter().zip(batches) {
            match batch {
                Ok(listings) => {
                    info!("{} returned {} listings", source.name(), listings.len());
                    raw.extend(listings);
                }
                Err(e) => warn!("{} search failed: {}", source.name(), e),
            }
        }

        let raw_results = raw.len();
        let mut unique = dedupe_by_url(raw);
        sort_for_optimization(&mut unique, request.optimization());

        let debug_info = DirectSearchDebug {
            sites_searched: selected.len(),
            raw_results,
            unique_results: unique.len(),
            duplicates_removed: raw_results - unique.len(),
        };

        info!(
            "Direct search found {} unique listings across {} sites in {:?}",
            unique.len(),
            selected.len(),
            start_time.elapsed()
        );

        Ok(SearchResponse::success(
            SearchMethod::DirectSearch,
            request,
            SearchResults::Listings(unique),
        )
        .with_debug(SearchDebug::Direct(debug_info)))
    }
}

fn is_selected(domain: &str, sites: &[String]) -> bool {
    sites.is_empty()
        || sites
            .iter()
            .any(|s| s == DK_GROUP || s.eq_ignore_ascii_case(domain))
}

/// Exact-URL dedupe, first occurrence wins. Listings without a URL are kept.
fn dedupe_by_url(listings: Vec<CarListing>) -> Vec<CarListing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|l| match l.url.as_deref() {
            Some(url) => seen.insert(url.to_string()),
            None => true,
        })
        .collect()
}

/// Sorts are stable so ties keep the merge order.
fn sort_for_optimization(listings: &mut [CarListing], optimization: Option<&str>) {
    match optimization {
        Some("laveste_pris") => listings.sort_by_key(|l| l.ask_price.unwrap_or(0)),
        Some("nyeste_årgang") => listings.sort_by(|a, b| b.year.cmp(&a.year)),
        Some("laveste_km") => listings.sort_by(|a, b| missing_last(a.mileage, b.mileage)),
        Some("laveste_månedlig") => {
            listings.sort_by(|a, b| missing_last(a.monthly_price, b.monthly_price))
        }
        _ => {}
    }
}

fn missing_last(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
