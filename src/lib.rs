pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    CatalogUseCase, DirectSearchUseCase, ListingSource, LlmSearchUseCase, ProviderChoice,
    SearchCompletionClient, VehicleCatalogProvider, DEFAULT_CATALOG_TTL_SECS,
};

pub use cli::{Commands, OutputFormat, SearchArgs};

pub use connector::{
    build_app, default_listing_sources, serve, AutoUncleSource, BilbasenSource, CarQueryProvider,
    Container, ContainerConfig, DbaSource, MockSearchClient, PerplexityClient, Router,
    VpicProvider,
};

pub use domain::{
    CarListing, DirectSearchDebug, DomainError, FormOptions, FuelType, LlmSearchDebug,
    MakesResponse, ModelsResponse, SearchDebug, SearchMethod, SearchMode, SearchRequest,
    SearchResponse, SearchResults, SelectOption,
};
