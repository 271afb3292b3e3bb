use anyhow::Result;

use crate::cli::OutputFormat;
use crate::{SearchDebug, SearchRequest};

use super::super::Container;
use super::search_controller::format_search_response;

pub struct DirectSearchController<'a> {
    container: &'a Container,
}

impl<'a> DirectSearchController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn search(&self, request: SearchRequest, format: OutputFormat) -> Result<String> {
        let use_case = self.container.direct_search_use_case();
        let response = use_case.execute(request).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&response)?,
            OutputFormat::Text => {
                let mut output = format_search_response(&response);
                if let Some(SearchDebug::Direct(debug)) = &response.debug {
                    output.push_str(&format!(
                        "\nSearched {} sites, {} duplicates removed.",
                        debug.sites_searched, debug.duplicates_removed
                    ));
                }
                output
            }
        })
    }
}
