use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::SearchCompletionClient;
use crate::domain::{
    build_search_prompt, listing_from_value, parse_llm_content, DomainError, LlmSearchDebug,
    ListingValidator, SearchDebug, SearchMethod, SearchRequest, SearchResponse, SearchResults,
};

/// Search through a web-grounded language model and keep only the answers
/// that look like real adverts on the selected sites.
pub struct LlmSearchUseCase {
    client: Arc<dyn SearchCompletionClient>,
}

impl LlmSearchUseCase {
    pub fn new(client: Arc<dyn SearchCompletionClient>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, request: SearchRequest) -> Result<SearchResponse, DomainError> {
        let request = request.normalized();
        request.validate_for_llm_search()?;

        info!("LLM search: {}", request.summary());
        let start_time = Instant::now();

        let prompt = build_search_prompt(&request);
        debug!("Prompt ({} chars) for {}", prompt.len(), self.client.model_name());

        let content = self.client.complete(&prompt).await?;
        if content.trim().is_empty() {
            return Err(DomainError::upstream(
                "No content received from Perplexity API",
            ));
        }

        let parsed = parse_llm_content(&content);
        if parsed.is_raw_text() {
            warn!("Search answer contained no JSON, returning raw text");
            return Ok(SearchResponse::success(
                SearchMethod::LlmSearch,
                request,
                SearchResults::Raw { raw: content },
            ));
        }

        let raw_total = parsed.candidates.len();
        let listings = parsed
            .candidates
            .iter()
            .filter_map(listing_from_value)
            .collect::<Vec<_>>();

        let validator = ListingValidator::new(request.expanded_sites());
        let outcome = validator.validate(listings);

        for rejection in &outcome.rejected {
            debug!(
                "Rejected listing {}: {}",
                rejection.url.as_deref().unwrap_or("<no url>"),
                rejection.reason
            );
        }

        let filtered_count = outcome.accepted.len();
        info!(
            "Kept {}/{} listings (strategy={}) in {:?}",
            filtered_count,
            raw_total,
            parsed.strategy,
            start_time.elapsed()
        );

        let debug_info = LlmSearchDebug {
            original_count: raw_total,
            filtered_count,
            extraction_used: parsed.strategy.extraction_used(),
            strategy: parsed.strategy.to_string(),
        };

        Ok(SearchResponse::success(
            SearchMethod::LlmSearch,
            request,
            SearchResults::Listings(outcome.accepted),
        )
        .with_raw_total(raw_total)
        .with_debug(SearchDebug::Llm(debug_info)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SearchMode;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedClient {
        answer: String,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedClient {
        fn new(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: answer.to_string(),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SearchCompletionClient for CannedClient {
        async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.answer.clone())
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    fn request() -> SearchRequest {
        SearchRequest::new(SearchMode::Buy)
            .with_makes(vec!["Audi".to_string()])
            .with_sites(vec!["bilbasen.dk".to_string()])
    }

    #[tokio::test]
    async fn keeps_only_valid_listings() {
        let answer = r#"Her er fundene:
```json
[
  {"title": "Audi A4", "url": "https://www.bilbasen.dk/brugt/bil/audi/12345678", "ask_price": "245.000 kr", "year": 2020},
  {"title": "Audi A4 Avant", "url": "https://www.mobile.de/auto/audi/98765432"},
  {"title": "Audi søgning", "url": "https://www.bilbasen.dk/brugt/bil?Make=Audi"}
]
```"#;
        let client = CannedClient::new(answer);
        let use_case = LlmSearchUseCase::new(client.clone());

        let response = use_case.execute(request()).await.unwrap();

        assert!(response.ok);
        assert_eq!(response.method, Some(SearchMethod::LlmSearch));
        assert_eq!(response.total_found, Some(1));
        assert_eq!(response.raw_total, Some(3));
        assert_eq!(response.listings()[0].ask_price, Some(245000));

        match response.debug {
            Some(SearchDebug::Llm(debug)) => {
                assert_eq!(debug.original_count, 3);
                assert_eq!(debug.filtered_count, 1);
                assert!(debug.extraction_used);
                assert_eq!(debug.strategy, "fenced_block");
            }
            other => panic!("unexpected debug block: {other:?}"),
        }

        let prompts = client.prompts.lock().unwrap();
        assert!(prompts[0].contains("bilbasen.dk"));
    }

    #[tokio::test]
    async fn prose_answer_is_returned_raw() {
        let client = CannedClient::new("Jeg fandt desværre ingen biler, der matcher.");
        let response = LlmSearchUseCase::new(client).execute(request()).await.unwrap();

        assert!(response.ok);
        assert_eq!(
            response.results.as_ref().and_then(SearchResults::raw),
            Some("Jeg fandt desværre ingen biler, der matcher.")
        );
        assert!(response.debug.is_none());
    }

    #[tokio::test]
    async fn empty_answer_is_an_upstream_error() {
        let client = CannedClient::new("   ");
        let err = LlmSearchUseCase::new(client)
            .execute(request())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Upstream(_)));
        assert_eq!(err.public_message(), "No content received from Perplexity API");
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_the_client() {
        let client = CannedClient::new("[]");
        let err = LlmSearchUseCase::new(client.clone())
            .execute(SearchRequest::new(SearchMode::Buy).with_sites(vec!["dba.dk".to_string()]))
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(client.prompts.lock().unwrap().is_empty());
    }
}
