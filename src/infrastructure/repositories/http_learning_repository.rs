use super::learning_repository::LearningRepository;
use crate::domain::document::{DocumentText, SummaryType};
use crate::domain::narration::ChunkRecord;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct ReadAloudRequest<'a> {
    sentences: &'a [String],
    num_clusters: usize,
}

#[derive(Debug, Deserialize)]
struct ReadAloudResponse {
    #[serde(default)]
    chunks: Vec<ChunkRecord>,
}

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    document_id: &'a str,
    summary_type: SummaryType,
    max_length: u32,
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    summary: String,
}

/// Learning service client over its JSON HTTP API
pub struct HttpLearningRepository {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpLearningRepository {
    pub fn new(base_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn error_text(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        format!("learning service returned {}: {}", status, body)
    }
}

#[async_trait]
impl LearningRepository for HttpLearningRepository {
    async fn fetch_document_text(&self, document_id: &str) -> Result<Option<DocumentText>, String> {
        let url = self.url(&format!(
            "/documents/{}/text",
            urlencoding::encode(document_id)
        ));
        tracing::debug!(document_id, url = %url, "Fetching document text");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Failed to reach learning service: {}", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_text(response).await);
        }

        response
            .json::<DocumentText>()
            .await
            .map(Some)
            .map_err(|e| format!("Failed to parse document text: {}", e))
    }

    async fn fetch_chunks(
        &self,
        sentences: &[String],
        chunk_count: usize,
    ) -> Result<Vec<ChunkRecord>, String> {
        tracing::info!(
            sentence_count = sentences.len(),
            chunk_count,
            "Requesting read-aloud chunks"
        );

        let response = self
            .http_client
            .post(self.url("/read-aloud"))
            .json(&ReadAloudRequest {
                sentences,
                num_clusters: chunk_count,
            })
            .send()
            .await
            .map_err(|e| format!("Failed to reach learning service: {}", e))?;

        if !response.status().is_success() {
            return Err(Self::error_text(response).await);
        }

        let body: ReadAloudResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse read-aloud chunks: {}", e))?;

        Ok(body.chunks)
    }

    async fn generate_summary(
        &self,
        document_id: &str,
        summary_type: SummaryType,
        max_length: u32,
    ) -> Result<String, String> {
        tracing::info!(document_id, summary_type = %summary_type, max_length, "Requesting summary");

        let response = self
            .http_client
            .post(self.url("/summarize"))
            .json(&SummarizeRequest {
                document_id,
                summary_type,
                max_length,
            })
            .send()
            .await
            .map_err(|e| format!("Failed to reach learning service: {}", e))?;

        if !response.status().is_success() {
            return Err(Self::error_text(response).await);
        }

        response
            .json::<SummarizeResponse>()
            .await
            .map(|body| body.summary)
            .map_err(|e| format!("Failed to parse summary: {}", e))
    }
}
