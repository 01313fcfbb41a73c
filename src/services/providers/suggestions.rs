/// Suggestion service client
///
/// Issues `GET {api_url}?normalizedInput={title}` and parses the suggestion list.
/// The service is only a cross-reference oracle, so every failure degrades to an
/// empty response instead of an error.
use crate::{
    error::{AppError, AppResult},
    models::SuggestionResponse,
    services::providers::SuggestionClient,
};
use reqwest::{header::ACCEPT, Client as HttpClient};
use std::time::Duration;

#[derive(Clone)]
pub struct SuggestionServiceClient {
    http_client: HttpClient,
    api_url: String,
}

impl SuggestionServiceClient {
    pub fn new(api_url: String, timeout: Duration) -> reqwest::Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
        })
    }

    async fn fetch(&self, search: &str) -> AppResult<SuggestionResponse> {
        let response = self
            .http_client
            .get(&self.api_url)
            .header(ACCEPT, "application/json")
            .query(&[("normalizedInput", search)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "Suggestion service returned status {}",
                status
            )));
        }

        let body = response.json::<SuggestionResponse>().await?;
        Ok(body)
    }
}

#[async_trait::async_trait]
impl SuggestionClient for SuggestionServiceClient {
    async fn find_suggestions(&self, search: &str) -> SuggestionResponse {
        match self.fetch(search).await {
            Ok(mut response) => {
                response.purge_failures();
                tracing::debug!(
                    search = %search,
                    suggestions = response.suggestions.len(),
                    "Suggestions fetched"
                );
                response
            }
            Err(e) => {
                tracing::warn!(search = %search, error = %e, "Suggestion lookup failed");
                SuggestionResponse::default()
            }
        }
    }
}
