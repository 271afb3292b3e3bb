use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{
    CatalogController, DirectSearchController, OptionsController, SearchController,
};

/// Dispatches one-shot CLI commands to their controllers.
pub struct Router<'a> {
    search_controller: SearchController<'a>,
    direct_search_controller: DirectSearchController<'a>,
    catalog_controller: CatalogController<'a>,
    options_controller: OptionsController,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            search_controller: SearchController::new(container),
            direct_search_controller: DirectSearchController::new(container),
            catalog_controller: CatalogController::new(container),
            options_controller: OptionsController,
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Search { criteria, format } => {
                self.search_controller
                    .search(criteria.into_request()?, format)
                    .await
            }
            Commands::DirectSearch { criteria, format } => {
                self.direct_search_controller
                    .search(criteria.into_request()?, format)
                    .await
            }
            Commands::Makes { provider, format } => {
                self.catalog_controller.makes(provider, format).await
            }
            Commands::Models {
                make,
                provider,
                format,
            } => self.catalog_controller.models(make, provider, format).await,
            Commands::Options { format } => self.options_controller.options(format),
            Commands::Serve { .. } => unreachable!("serve is handled separately in main"),
        }
    }
}
