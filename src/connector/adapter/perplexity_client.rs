use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::SearchCompletionClient;
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
const COMPLETIONS_PATH: &str = "/chat/completions";
const DEFAULT_MODEL: &str = "sonar";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for the Perplexity chat completions API.
///
/// Configured from the environment:
///
/// | Variable              | Default                     |
/// |-----------------------|-----------------------------|
/// | `PERPLEXITY_API_KEY`  | none, required              |
/// | `PERPLEXITY_BASE_URL` | `https://api.perplexity.ai` |
/// | `PERPLEXITY_MODEL`    | `sonar`                     |
///
/// A missing key is only reported when a search is attempted, so the rest
/// of the service keeps working without one.
pub struct PerplexityClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    url: String,
}

impl PerplexityClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{COMPLETIONS_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            url,
        }
    }

    pub fn from_env() -> Self {
        let base = std::env::var("PERPLEXITY_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("PERPLEXITY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let key = std::env::var("PERPLEXITY_API_KEY").ok();
        Self::new(key, model, base)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl SearchCompletionClient for PerplexityClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::configuration("Perplexity API key not configured"))?;

        let request = ApiRequest {
            model: &self.model,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("POST {} (model={})", self.url, self.model);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Perplexity API returned {status}: {body}");
            return Err(DomainError::upstream(format!(
                "Perplexity API error: {}",
                status.as_u16()
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| DomainError::parse(format!("Perplexity response: {e}")))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| DomainError::upstream("No content received from Perplexity API"))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
