use anyhow::Result;

use crate::cli::OutputFormat;
use crate::{MakesResponse, ModelsResponse, ProviderChoice};

use super::super::Container;

pub struct CatalogController<'a> {
    container: &'a Container,
}

impl<'a> CatalogController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn makes(&self, provider: Option<String>, format: OutputFormat) -> Result<String> {
        let provider = ProviderChoice::from_param(provider.as_deref());
        let makes = self.container.catalog_use_case().list_makes(provider).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&MakesResponse {
                makes,
                error: None,
            })?,
            OutputFormat::Text => format_names("makes", &makes),
        })
    }

    pub async fn models(
        &self,
        make: String,
        provider: Option<String>,
        format: OutputFormat,
    ) -> Result<String> {
        let provider = ProviderChoice::from_param(provider.as_deref());
        let models = self
            .container
            .catalog_use_case()
            .list_models(&make, provider)
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&ModelsResponse {
                models,
                error: None,
            })?,
            OutputFormat::Text => format_names(&format!("{make} models"), &models),
        })
    }
}

fn format_names(what: &str, names: &[String]) -> String {
    if names.is_empty() {
        return format!("No {what} found.");
    }
    format!("{} {what}:\n{}", names.len(), names.join("\n"))
}
