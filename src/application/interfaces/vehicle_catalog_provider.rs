use async_trait::async_trait;

use crate::domain::DomainError;

/// A public vehicle catalogue that knows which makes and models exist.
#[async_trait]
pub trait VehicleCatalogProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Raw make names as the provider spells them. Cleaning and sorting is
    /// left to the caller.
    async fn fetch_makes(&self) -> Result<Vec<String>, DomainError>;

    async fn fetch_models(&self, make: &str) -> Result<Vec<String>, DomainError>;
}
