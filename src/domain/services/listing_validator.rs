use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use super::url_normalize::normalize_url;
use crate::domain::site::{all_sites, host_matches_site};
use crate::domain::{current_year, CarListing, MIN_MODEL_YEAR};

/// Path segments that mark search or overview pages rather than adverts.
fn search_segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(search|soeg|sog|søg|find|results?|resultater|soegning|sogning|søgning)$")
            .expect("search segment pattern is valid")
    })
}

/// Query keys carrying a free-text search.
fn search_query_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(^|&)(q|query|search|searchterm|fritekst)=")
            .expect("search query pattern is valid")
    })
}

/// A numeric advert id such as `12345678` or `id-1234567890`.
fn listing_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{4,}").expect("listing id pattern is valid"))
}

/// An advert id carried in the query, e.g. `details.html?id=391234567`.
fn listing_id_query_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(^|&)(id|adid|ad_id|listing_?id|annonce_?id)=\d{4,}(&|$)")
            .expect("listing id query pattern is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MissingUrl,
    MalformedUrl,
    DomainNotAllowed,
    NotAListingPage,
    MissingTitle,
    ImplausibleValues,
    Duplicate,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingUrl => "missing url",
            RejectReason::MalformedUrl => "malformed url",
            RejectReason::DomainNotAllowed => "domain not in selected sites",
            RejectReason::NotAListingPage => "url is not a listing page",
            RejectReason::MissingTitle => "missing title",
            RejectReason::ImplausibleValues => "implausible year, price or mileage",
            RejectReason::Duplicate => "duplicate url",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub url: Option<String>,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    pub accepted: Vec<CarListing>,
    pub rejected: Vec<Rejection>,
}

/// Filters untrusted listings down to adverts on the selected marketplaces.
pub struct ListingValidator {
    allowed_sites: Vec<String>,
    max_year: i64,
}

impl ListingValidator {
    /// An empty site list allows every known marketplace.
    pub fn new(allowed_sites: Vec<String>) -> Self {
        let allowed_sites = if allowed_sites.is_empty() {
            all_sites()
        } else {
            allowed_sites
        };

        Self {
            allowed_sites,
            max_year: i64::from(current_year()) + 1,
        }
    }

    pub fn allowed_sites(&self) -> &[String] {
        &self.allowed_sites
    }

    /// Keep the listings that pass every check, in input order. Listings with
    /// only make and model get a composed title.
    pub fn validate(&self, listings: Vec<CarListing>) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();
        let mut seen: HashSet<String> = HashSet::new();

        for mut listing in listings {
            let url = listing.url().map(str::to_string);

            let verdict = self.check(&listing).and_then(|parsed| {
                if seen.insert(normalize_url(parsed.as_str())) {
                    Ok(())
                } else {
                    Err(RejectReason::Duplicate)
                }
            });

            match verdict {
                Ok(()) => {
                    listing.url = url;
                    if listing.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
                        listing.title = listing.display_title();
                    }
                    outcome.accepted.push(listing);
                }
                Err(reason) => outcome.rejected.push(Rejection { url, reason }),
            }
        }

        outcome
    }

    fn check(&self, listing: &CarListing) -> Result<Url, RejectReason> {
        let raw = listing.url().ok_or(RejectReason::MissingUrl)?;
        let url = Url::parse(raw).map_err(|_| RejectReason::MalformedUrl)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(RejectReason::MalformedUrl);
        }

        let host = url.host_str().ok_or(RejectReason::MalformedUrl)?;
        if !self
            .allowed_sites
            .iter()
            .any(|site| host_matches_site(host, site))
        {
            return Err(RejectReason::DomainNotAllowed);
        }

        if !is_listing_page(&url) {
            return Err(RejectReason::NotAListingPage);
        }

        if listing.display_title().is_none() {
            return Err(RejectReason::MissingTitle);
        }

        if !self.is_plausible(listing) {
            return Err(RejectReason::ImplausibleValues);
        }

        Ok(url)
    }

    fn is_plausible(&self, listing: &CarListing) -> bool {
        let year_ok = listing
            .year
            .map_or(true, |y| (i64::from(MIN_MODEL_YEAR)..=self.max_year).contains(&y));
        let non_negative = [listing.ask_price, listing.monthly_price, listing.mileage]
            .iter()
            .all(|v| v.map_or(true, |n| n >= 0));

        year_ok && non_negative
    }
}

/// Marketplaces whose adverts always carry a numeric id.
const ID_ADDRESSED_SITES: &[&str] = &["bilbasen.dk", "dba.dk", "mobile.de"];

/// Heuristic: does this URL point at a single advert?
///
/// Search and overview pages are recognised by a search-like path segment or
/// a free-text query parameter. Adverts carry a numeric id of four or more
/// digits in the path or in an id-style query key. On sites outside
/// `ID_ADDRESSED_SITES` a path at least three segments deep is enough.
pub fn is_listing_page(url: &Url) -> bool {
    let segments: Vec<Cow<'_, str>> = url
        .path_segments()
        .map(|s| {
            s.filter(|seg| !seg.is_empty())
                .map(|seg| urlencoding::decode(seg).unwrap_or(Cow::Borrowed(seg)))
                .collect()
        })
        .unwrap_or_default();

    if segments.len() < 2 {
        return false;
    }

    if segments
        .iter()
        .any(|seg| search_segment_pattern().is_match(seg))
    {
        return false;
    }

    if url
        .query()
        .is_some_and(|q| search_query_pattern().is_match(q))
    {
        return false;
    }

    let has_id = listing_id_pattern().is_match(url.path())
        || url
            .query()
            .is_some_and(|q| listing_id_query_pattern().is_match(q));
    if has_id {
        return true;
    }

    let id_addressed = url.host_str().is_some_and(|host| {
        ID_ADDRESSED_SITES
            .iter()
            .any(|site| host_matches_site(host, site))
    });

    !id_addressed && segments.len() >= 3
}
