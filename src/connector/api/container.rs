use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::application::{ListingSource, SearchCompletionClient, VehicleCatalogProvider};
use crate::{
    default_listing_sources, CarQueryProvider, CatalogUseCase, DirectSearchUseCase,
    LlmSearchUseCase, MockSearchClient, PerplexityClient, VpicProvider, DEFAULT_CATALOG_TTL_SECS,
};

pub struct ContainerConfig {
    /// Answer LLM searches from a canned reply instead of calling Perplexity.
    pub mock_llm: bool,
    /// How long catalogue answers stay cached.
    pub catalog_ttl_secs: u64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            mock_llm: false,
            catalog_ttl_secs: DEFAULT_CATALOG_TTL_SECS,
        }
    }
}

/// Wires adapters into use cases. One container lives for the whole process
/// so the catalogue cache is shared between requests.
pub struct Container {
    search_client: Arc<dyn SearchCompletionClient>,
    listing_sources: Vec<Arc<dyn ListingSource>>,
    catalog_use_case: Arc<CatalogUseCase>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Self {
        let search_client: Arc<dyn SearchCompletionClient> = if config.mock_llm {
            debug!("Using mock search client");
            Arc::new(MockSearchClient::new())
        } else {
            let client = PerplexityClient::from_env();
            if !client.is_configured() {
                warn!("PERPLEXITY_API_KEY is not set; LLM search will fail until it is");
            }
            Arc::new(client)
        };

        Self::with_components(
            config,
            search_client,
            Arc::new(CarQueryProvider::from_env()),
            Arc::new(VpicProvider::from_env()),
            default_listing_sources(),
        )
    }

    /// Build from explicit adapters, e.g. ones pointed at local fakes.
    pub fn with_components(
        config: ContainerConfig,
        search_client: Arc<dyn SearchCompletionClient>,
        primary_catalog: Arc<dyn VehicleCatalogProvider>,
        fallback_catalog: Arc<dyn VehicleCatalogProvider>,
        listing_sources: Vec<Arc<dyn ListingSource>>,
    ) -> Self {
        let catalog_use_case = Arc::new(CatalogUseCase::new(
            primary_catalog,
            fallback_catalog,
            Duration::from_secs(config.catalog_ttl_secs),
        ));

        Self {
            search_client,
            listing_sources,
            catalog_use_case,
            config,
        }
    }

    pub fn llm_search_use_case(&self) -> LlmSearchUseCase {
        LlmSearchUseCase::new(self.search_client.clone())
    }

    pub fn direct_search_use_case(&self) -> DirectSearchUseCase {
        DirectSearchUseCase::new(self.listing_sources.clone())
    }

    pub fn catalog_use_case(&self) -> Arc<CatalogUseCase> {
        self.catalog_use_case.clone()
    }

    pub fn mock_llm(&self) -> bool {
        self.config.mock_llm
    }
}
