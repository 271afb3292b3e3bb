use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, info, warn};

use crate::application::VehicleCatalogProvider;
use crate::domain::DomainError;

/// Catalogue data changes rarely; a day is plenty.
pub const DEFAULT_CATALOG_TTL_SECS: u64 = 24 * 60 * 60;

const MAX_CACHE_ENTRIES: u64 = 1_000;

/// Which upstream chain a catalogue lookup goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderChoice {
    /// Primary provider, falling back to the secondary on any error.
    #[default]
    Auto,
    /// Secondary provider only.
    Vpic,
}

impl ProviderChoice {
    /// `vpic` selects the vPIC-only chain; anything else is `Auto`.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some(p) if p.eq_ignore_ascii_case("vpic") => ProviderChoice::Vpic,
            _ => ProviderChoice::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CatalogKind {
    Makes,
    Models,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: CatalogKind,
    provider: ProviderChoice,
    make: String,
}

impl CacheKey {
    fn new(kind: CatalogKind, provider: ProviderChoice, make: &str) -> Self {
        Self {
            kind,
            provider,
            make: make.trim().to_lowercase(),
        }
    }
}

/// Resolves vehicle makes and models through a primary catalogue with a
/// fallback, caching successful answers in memory.
pub struct CatalogUseCase {
    primary: Arc<dyn VehicleCatalogProvider>,
    fallback: Arc<dyn VehicleCatalogProvider>,
    cache: Cache<CacheKey, Vec<String>>,
}

impl CatalogUseCase {
    pub fn new(
        primary: Arc<dyn VehicleCatalogProvider>,
        fallback: Arc<dyn VehicleCatalogProvider>,
        ttl: Duration,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(ttl)
            .build();

        Self {
            primary,
            fallback,
            cache,
        }
    }

    pub async fn list_makes(&self, provider: ProviderChoice) -> Result<Vec<String>, DomainError> {
        let key = CacheKey::new(CatalogKind::Makes, provider, "");
        if let Some(makes) = self.cache.get(&key).await {
            debug!("Catalog cache hit for makes ({:?})", provider);
            return Ok(makes);
        }

        let raw = match provider {
            ProviderChoice::Vpic => self.fallback.fetch_makes().await?,
            ProviderChoice::Auto => match self.primary.fetch_makes().await {
                Ok(makes) => makes,
                Err(e) => {
                    warn!(
                        "{} makes failed, falling back to {}: {}",
                        self.primary.name(),
                        self.fallback.name(),
                        e
                    );
                    self.fallback.fetch_makes().await?
                }
            },
        };

        let makes = clean_names(raw);
        info!("Resolved {} makes", makes.len());
        self.cache.insert(key, makes.clone()).await;
        Ok(makes)
    }

    pub async fn list_models(
        &self,
        make: &str,
        provider: ProviderChoice,
    ) -> Result<Vec<String>, DomainError> {
        let make = make.trim();
        if make.is_empty() {
            return Err(DomainError::invalid_input("Make parameter is required"));
        }

        let key = CacheKey::new(CatalogKind::Models, provider, make);
        if let Some(models) = self.cache.get(&key).await {
            debug!("Catalog cache hit for {} models ({:?})", make, provider);
            return Ok(models);
        }

        let raw = match provider {
            ProviderChoice::Vpic => self.fallback.fetch_models(make).await?,
            ProviderChoice::Auto => match self.primary.fetch_models(make).await {
                Ok(models) => models,
                Err(e) => {
                    warn!(
                        "{} models for {} failed, falling back to {}: {}",
                        self.primary.name(),
                        make,
                        self.fallback.name(),
                        e
                    );
                    self.fallback.fetch_models(make).await?
                }
            },
        };

        let models = clean_names(raw);
        info!("Resolved {} models for {}", models.len(), make);
        self.cache.insert(key, models.clone()).await;
        Ok(models)
    }
}

/// Trim, drop blanks, sort and dedupe.
fn clean_names(names: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    cleaned.sort();
    cleaned.dedup();
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        name: &'static str,
        names: Option<Vec<&'static str>>,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        fn ok(name: &'static str, names: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                name,
                names: Some(names),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                names: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn answer(&self) -> Result<Vec<String>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.names
                .as_ref()
                .map(|n| n.iter().map(|s| s.to_string()).collect())
                .ok_or_else(|| DomainError::upstream(format!("{} is down", self.name)))
        }
    }

    #[async_trait]
    impl VehicleCatalogProvider for FixedProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_makes(&self) -> Result<Vec<String>, DomainError> {
            self.answer()
        }

        async fn fetch_models(&self, _make: &str) -> Result<Vec<String>, DomainError> {
            self.answer()
        }
    }

    fn catalog(
        primary: Arc<FixedProvider>,
        fallback: Arc<FixedProvider>,
    ) -> CatalogUseCase {
        CatalogUseCase::new(primary, fallback, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn makes_are_cleaned_and_sorted() {
        let primary = FixedProvider::ok("CarQuery", vec!["Volvo", " Audi ", "", "BMW", "Audi"]);
        let use_case = catalog(primary, FixedProvider::ok("vPIC", vec![]));

        let makes = use_case.list_makes(ProviderChoice::Auto).await.unwrap();
        assert_eq!(makes, vec!["Audi", "BMW", "Volvo"]);
    }

    #[tokio::test]
    async fn falls_back_when_primary_fails() {
        let fallback = FixedProvider::ok("vPIC", vec!["TESLA"]);
        let use_case = catalog(FixedProvider::failing("CarQuery"), fallback.clone());

        let makes = use_case.list_makes(ProviderChoice::Auto).await.unwrap();
        assert_eq!(makes, vec!["TESLA"]);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn vpic_choice_skips_primary() {
        let primary = FixedProvider::ok("CarQuery", vec!["A4"]);
        let use_case = catalog(primary.clone(), FixedProvider::ok("vPIC", vec!["Q5"]));

        let models = use_case.list_models("Audi", ProviderChoice::Vpic).await.unwrap();
        assert_eq!(models, vec!["Q5"]);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn both_failing_is_an_error() {
        let use_case = catalog(FixedProvider::failing("CarQuery"), FixedProvider::failing("vPIC"));
        assert!(use_case.list_makes(ProviderChoice::Auto).await.is_err());
    }

    #[tokio::test]
    async fn blank_make_is_rejected() {
        let use_case = catalog(FixedProvider::ok("CarQuery", vec![]), FixedProvider::ok("vPIC", vec![]));
        let err = use_case.list_models("  ", ProviderChoice::Auto).await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.public_message(), "Make parameter is required");
    }

    #[tokio::test]
    async fn repeated_lookups_hit_the_cache() {
        let primary = FixedProvider::ok("CarQuery", vec!["A4", "A6"]);
        let use_case = catalog(primary.clone(), FixedProvider::ok("vPIC", vec![]));

        use_case.list_models("Audi", ProviderChoice::Auto).await.unwrap();
        use_case.list_models(" audi ", ProviderChoice::Auto).await.unwrap();
        use_case.list_models("BMW", ProviderChoice::Auto).await.unwrap();

        assert_eq!(primary.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn provider_param_parsing() {
        assert_eq!(ProviderChoice::from_param(Some("vpic")), ProviderChoice::Vpic);
        assert_eq!(ProviderChoice::from_param(Some("VPIC")), ProviderChoice::Vpic);
        assert_eq!(ProviderChoice::from_param(Some("carquery")), ProviderChoice::Auto);
        assert_eq!(ProviderChoice::from_param(None), ProviderChoice::Auto);
    }
}
