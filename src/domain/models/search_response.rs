use serde::{Deserialize, Serialize};

use super::{CarListing, SearchRequest};

/// Listings when the answer could be structured, otherwise the raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResults {
    Listings(Vec<CarListing>),
    Raw { raw: String },
}

impl SearchResults {
    pub fn listings(&self) -> Option<&[CarListing]> {
        match self {
            SearchResults::Listings(listings) => Some(listings),
            SearchResults::Raw { .. } => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            SearchResults::Listings(_) => None,
            SearchResults::Raw { raw } => Some(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    LlmSearch,
    DirectSearch,
}

/// Pipeline counters for an LLM search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmSearchDebug {
    pub original_count: usize,
    pub filtered_count: usize,
    pub extraction_used: bool,
    pub strategy: String,
}

/// Fan-out counters for a direct search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectSearchDebug {
    pub sites_searched: usize,
    pub raw_results: usize,
    pub unique_results: usize,
    pub duplicates_removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchDebug {
    Llm(LlmSearchDebug),
    Direct(DirectSearchDebug),
}

/// Envelope returned by both search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<SearchRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<SearchResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_found: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<SearchMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<SearchDebug>,
}

impl SearchResponse {
    pub fn success(method: SearchMethod, query: SearchRequest, results: SearchResults) -> Self {
        let total_found = results.listings().map(<[CarListing]>::len);
        Self {
            ok: true,
            query: Some(query),
            results: Some(results),
            error: None,
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp_millis()),
            total_found,
            raw_total: None,
            method: Some(method),
            debug: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            query: None,
            results: None,
            error: Some(error.into()),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp_millis()),
            total_found: None,
            raw_total: None,
            method: None,
            debug: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_raw_total(mut self, raw_total: usize) -> Self {
        self.raw_total = Some(raw_total);
        self
    }

    pub fn with_debug(mut self, debug: SearchDebug) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn listings(&self) -> &[CarListing] {
        self.results
            .as_ref()
            .and_then(SearchResults::listings)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakesResponse {
    pub makes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SearchMode;

    #[test]
    fn raw_results_serialize_as_object() {
        let response = SearchResponse::success(
            SearchMethod::LlmSearch,
            SearchRequest::new(SearchMode::Buy),
            SearchResults::Raw {
                raw: "Ingen fund".to_string(),
            },
        );
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["results"]["raw"], "Ingen fund");
        assert!(json.get("total_found").is_none());
        assert_eq!(json["method"], "llm_search");
    }

    #[test]
    fn listing_results_serialize_as_array() {
        let listings = vec![CarListing::new("Audi A4", "https://www.bilbasen.dk/brugt/bil/audi/1")];
        let response = SearchResponse::success(
            SearchMethod::DirectSearch,
            SearchRequest::new(SearchMode::Buy),
            SearchResults::Listings(listings),
        )
        .with_debug(SearchDebug::Direct(DirectSearchDebug {
            sites_searched: 1,
            raw_results: 1,
            unique_results: 1,
            duplicates_removed: 0,
        }));
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["results"].is_array());
        assert_eq!(json["total_found"], 1);
        assert_eq!(json["debug"]["duplicates_removed"], 0);
    }

    #[test]
    fn failure_carries_error_only() {
        let json = serde_json::to_value(SearchResponse::failure("Search failed")).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "Search failed");
        assert!(json.get("results").is_none());
    }

    #[test]
    fn untagged_results_round_trip_through_clients() {
        let raw: SearchResults = serde_json::from_str(r#"{"raw":"tekst"}"#).unwrap();
        assert_eq!(raw.raw(), Some("tekst"));

        let listings: SearchResults = serde_json::from_str(r#"[{"title":"Audi"}]"#).unwrap();
        assert_eq!(listings.listings().map(<[CarListing]>::len), Some(1));
    }
}
