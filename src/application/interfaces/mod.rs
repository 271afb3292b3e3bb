mod listing_source;
mod search_completion_client;
mod vehicle_catalog_provider;

pub use listing_source::*;
pub use search_completion_client::*;
pub use vehicle_catalog_provider::*;
