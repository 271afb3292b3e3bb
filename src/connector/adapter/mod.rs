mod carquery_provider;
mod mock_listing_sources;
mod mock_search_client;
mod perplexity_client;
mod vpic_provider;

pub use carquery_provider::*;
pub use mock_listing_sources::*;
pub use mock_search_client::*;
pub use perplexity_client::*;
pub use vpic_provider::*;
