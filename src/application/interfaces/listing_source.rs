use async_trait::async_trait;

use crate::domain::{CarListing, DomainError, SearchRequest};

/// One marketplace that can be searched directly for listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Display name, e.g. `Bilbasen`.
    fn name(&self) -> &str;

    /// Domain used to match the source against a site selection.
    fn domain(&self) -> &str;

    async fn search(&self, request: &SearchRequest) -> Result<Vec<CarListing>, DomainError>;
}
