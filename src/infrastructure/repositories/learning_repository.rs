use crate::domain::document::{DocumentText, SummaryType};
use crate::domain::narration::ChunkRecord;
use async_trait::async_trait;

/// Repository for the external learning service.
/// Abstracts the service that owns uploaded documents, semantic chunking and
/// summarization; everything it returns is treated as opaque, already-ordered data.
#[async_trait]
pub trait LearningRepository: Send + Sync {
    /// Extracted text and sentence list of an uploaded document
    ///
    /// Returns `Ok(None)` when the document does not exist
    async fn fetch_document_text(&self, document_id: &str) -> Result<Option<DocumentText>, String>;

    /// Group ordered sentences into roughly `chunk_count` narration chunks
    async fn fetch_chunks(
        &self,
        sentences: &[String],
        chunk_count: usize,
    ) -> Result<Vec<ChunkRecord>, String>;

    /// Generate a summary of a document
    async fn generate_summary(
        &self,
        document_id: &str,
        summary_type: SummaryType,
        max_length: u32,
    ) -> Result<String, String>;
}
