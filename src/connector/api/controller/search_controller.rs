use anyhow::Result;

use crate::cli::OutputFormat;
use crate::{SearchRequest, SearchResponse, SearchResults};

use super::super::Container;

pub struct SearchController<'a> {
    container: &'a Container,
}

impl<'a> SearchController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn search(&self, request: SearchRequest, format: OutputFormat) -> Result<String> {
        let use_case = self.container.llm_search_use_case();
        let response = use_case.execute(request).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&response)?,
            OutputFormat::Text => format_search_response(&response),
        })
    }
}

/// Numbered listing lines, or the raw answer when nothing structured came back.
pub(super) fn format_search_response(response: &SearchResponse) -> String {
    if let Some(raw) = response.results.as_ref().and_then(SearchResults::raw) {
        return format!("No structured listings found. Answer from search:\n\n{raw}");
    }

    let listings = response.listings();
    if listings.is_empty() {
        return "No listings found.".to_string();
    }

    let mut output = match response.raw_total {
        Some(raw_total) => format!(
            "Found {} listings ({} before validation):\n\n",
            listings.len(),
            raw_total
        ),
        None => format!("Found {} listings:\n\n", listings.len()),
    };

    for (i, listing) in listings.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, listing.display_line()));
        if let Some(url) = listing.url() {
            output.push_str(&format!("   {url}\n"));
        }
    }

    output
}
