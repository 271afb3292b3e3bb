use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::VehicleCatalogProvider;
use crate::domain::DomainError;

pub const DEFAULT_CARQUERY_BASE_URL: &str = "https://www.carqueryapi.com/api/0.3";
pub(crate) const CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct MakesEnvelope {
    #[serde(rename = "Makes")]
    makes: Option<Vec<CarQueryMake>>,
}

#[derive(Deserialize)]
struct CarQueryMake {
    #[serde(default)]
    make_display: Option<String>,
}

#[derive(Deserialize)]
struct ModelsEnvelope {
    #[serde(rename = "Models")]
    models: Option<Vec<CarQueryModel>>,
}

#[derive(Deserialize)]
struct CarQueryModel {
    #[serde(default)]
    model_name: Option<String>,
}

/// Primary vehicle catalogue, backed by the CarQuery API.
///
/// CarQuery answers in JSONP unless asked otherwise and sometimes does so
/// even then, so a `callback(...)` wrapper around the body is stripped.
pub struct CarQueryProvider {
    client: reqwest::Client,
    base_url: String,
}

impl CarQueryProvider {
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

    /// Reads `CARQUERY_BASE_URL`, defaulting to the public API.
    pub fn from_env() -> Self {
        let base = std::env::var("CARQUERY_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_CARQUERY_BASE_URL.to_string());
        Self::new(base)
    }

    async fn get<T: DeserializeOwned>(&self, query: &[(&str, &str)]) -> Result<T, DomainError> {
        let url = format!("{}/", self.base_url);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            warn!("CarQuery returned {status}");
            return Err(DomainError::upstream(format!(
                "CarQuery API error: {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(strip_jsonp(&body))
            .map_err(|_| DomainError::upstream("Invalid CarQuery response format"))
    }
}

#[async_trait]
impl VehicleCatalogProvider for CarQueryProvider {
    fn name(&self) -> &str {
        "CarQuery"
    }

    async fn fetch_makes(&self) -> Result<Vec<String>, DomainError> {
        let envelope: MakesEnvelope = self
            .get(&[("cmd", "getMakes"), ("sold_in_us", "0")])
            .await?;

        envelope
            .makes
            .map(|makes| makes.into_iter().filter_map(|m| m.make_display).collect())
            .ok_or_else(|| DomainError::upstream("Invalid CarQuery response format"))
    }

    async fn fetch_models(&self, make: &str) -> Result<Vec<String>, DomainError> {
        let envelope: ModelsEnvelope = self.get(&[("cmd", "getModels"), ("make", make)]).await?;

        envelope
            .models
            .map(|models| models.into_iter().filter_map(|m| m.model_name).collect())
            .ok_or_else(|| DomainError::upstream("Invalid CarQuery response format"))
    }
}

/// `?({...});` or `cb({...})` becomes `{...}`. Plain JSON passes through.
fn strip_jsonp(body: &str) -> &str {
    let trimmed = body.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    match (trimmed.find('('), trimmed.rfind(')')) {
        (Some(open), Some(close)) if open < close => trimmed[open + 1..close].trim(),
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_jsonp_wrappers() {
        assert_eq!(strip_jsonp(r#"?({"Makes":[]});"#), r#"{"Makes":[]}"#);
        assert_eq!(strip_jsonp(r#"cb( {"Models":[]} )"#), r#"{"Models":[]}"#);
        assert_eq!(strip_jsonp(r#" {"Makes":[]} "#), r#"{"Makes":[]}"#);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = CarQueryProvider::new("http://localhost:9999/api/0.3/");
        assert_eq!(provider.base_url, "http://localhost:9999/api/0.3");
    }
}
