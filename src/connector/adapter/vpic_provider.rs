use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::carquery_provider::CATALOG_TIMEOUT;
use crate::application::VehicleCatalogProvider;
use crate::domain::DomainError;

pub const DEFAULT_VPIC_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api/vehicles";

#[derive(Deserialize)]
struct ResultsEnvelope<T> {
    #[serde(rename = "Results")]
    results: Option<Vec<T>>,
}

#[derive(Deserialize)]
struct VpicMake {
    #[serde(rename = "Make_Name", default)]
    make_name: Option<String>,
}

#[derive(Deserialize)]
struct VpicModel {
    #[serde(rename = "Model_Name", default)]
    model_name: Option<String>,
}

/// Fallback vehicle catalogue, backed by the NHTSA vPIC API.
pub struct VpicProvider {
    client: reqwest::Client,
    base_url: String,
}

impl VpicProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::builder()
                .timeout(CATALOG_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `VPIC_BASE_URL`, defaulting to the public API.
    pub fn from_env() -> Self {
        let base = std::env::var("VPIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_VPIC_BASE_URL.to_string());
        Self::new(base)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DomainError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DomainError::configuration(format!("Invalid vPIC base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| DomainError::configuration("Invalid vPIC base URL"))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("format", "json");
        Ok(url)
    }

    async fn get_results<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, DomainError> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            warn!("vPIC returned {status}");
            return Err(DomainError::upstream(format!(
                "vPIC API error: {}",
                status.as_u16()
            )));
        }

        let envelope: ResultsEnvelope<T> = response
            .json()
            .await
            .map_err(|_| DomainError::upstream("Invalid vPIC response format"))?;

        envelope
            .results
            .ok_or_else(|| DomainError::upstream("Invalid vPIC response format"))
    }
}

#[async_trait]
impl VehicleCatalogProvider for VpicProvider {
    fn name(&self) -> &str {
        "vPIC"
    }

    async fn fetch_makes(&self) -> Result<Vec<String>, DomainError> {
        let url = self.endpoint(&["GetAllMakes"])?;
        let makes: Vec<VpicMake> = self.get_results(url).await?;
        Ok(makes.into_iter().filter_map(|m| m.make_name).collect())
    }

    async fn fetch_models(&self, make: &str) -> Result<Vec<String>, DomainError> {
        let url = self.endpoint(&["GetModelsForMake", make])?;
        let models: Vec<VpicModel> = self.get_results(url).await?;
        Ok(models.into_iter().filter_map(|m| m.model_name).collect())
    }
}
