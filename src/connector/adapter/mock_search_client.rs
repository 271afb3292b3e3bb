use async_trait::async_trait;
use tracing::debug;

use crate::application::SearchCompletionClient;
use crate::domain::DomainError;

/// Answer shaped like a real search model reply: prose around a fenced JSON
/// block, with one search page and one foreign listing mixed in.
const CANNED_ANSWER: &str = r#"Her er de bedste fund på de valgte sites:

```json
[
  {
    "title": "Audi A4 Avant 2.0 TDI S-line",
    "url": "https://www.bilbasen.dk/brugt/bil/audi/a4/5123456",
    "ask_price": "239.900 kr",
    "year": 2020,
    "mileage": "89.000 km",
    "location": "Vejle"
  },
  {
    "title": "Volkswagen Passat Variant 2.0 TDI",
    "url": "https://www.dba.dk/bil/volkswagen-passat/id-1098765432",
    "ask_price": 214500,
    "year": 2019,
    "mileage": 112000,
    "location": "Roskilde"
  },
  {
    "title": "BMW 320d Touring",
    "url": "https://suchen.mobile.de/fahrzeuge/details.html?id=391234567",
    "ask_price": 27900,
    "year": 2021,
    "mileage": 54000,
    "location": "Hamburg"
  },
  {
    "title": "Alle Audi til salg",
    "url": "https://www.bilbasen.dk/brugt/bil?Make=Audi"
  }
]
```

Priserne er vejledende og kan ændre sig."#;

/// Offline [`SearchCompletionClient`] that ignores the prompt and returns a
/// fixed answer.
pub struct MockSearchClient {
    answer: String,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self {
            answer: CANNED_ANSWER.to_string(),
        }
    }

    pub fn with_answer(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

impl Default for MockSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchCompletionClient for MockSearchClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        debug!("Mock search client received {} char prompt", prompt.len());
        Ok(self.answer.clone())
    }

    fn model_name(&self) -> &str {
        "mock-search"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_llm_content, ParseStrategy};

    #[tokio::test]
    async fn canned_answer_parses_as_fenced_block() {
        let content = MockSearchClient::new().complete("prompt").await.unwrap();
        let parsed = parse_llm_content(&content);
        assert_eq!(parsed.strategy, ParseStrategy::FencedBlock);
        assert_eq!(parsed.candidates.len(), 4);
    }

    #[tokio::test]
    async fn custom_answer_is_returned_verbatim() {
        let client = MockSearchClient::with_answer("[]");
        assert_eq!(client.complete("x").await.unwrap(), "[]");
    }
}
