//! Per-chunk extraction loop

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::Result;
use crate::ingest::ChunkSplitter;
use crate::llm::ChatModel;
use crate::types::{Document, QaPair};

use super::interpreter::interpret;
use super::prompt::PromptBuilder;

/// Drives QA extraction over a document's chunks, one model call per
/// chunk, in order. A chunk whose call fails after all retries is
/// skipped; the rest of the document is still processed.
pub struct QaExtractor {
    model: Arc<dyn ChatModel>,
    splitter: ChunkSplitter,
}

impl QaExtractor {
    pub fn new(model: Arc<dyn ChatModel>, splitter: ChunkSplitter) -> Self {
        Self { model, splitter }
    }

    /// Extract QA pairs from every chunk of `document`
    pub async fn extract_document(&self, document: &Document, instruction: &str) -> Vec<QaPair> {
        let chunks = if document.chunks.is_empty() {
            self.splitter.split(&document.file_content)
        } else {
            document.chunks.clone()
        };

        if chunks.is_empty() {
            tracing::error!("no content found in document: {}", document.file_name);
            return Vec::new();
        }

        let mut all_pairs = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            tracing::info!(
                "processing chunk {}/{} of {}",
                i + 1,
                chunks.len(),
                document.file_name
            );

            match self.extract_chunk(chunk, instruction).await {
                Ok(pairs) => all_pairs.extend(pairs),
                Err(e) => {
                    tracing::error!(
                        "skipping chunk {} of {}: {}",
                        i + 1,
                        document.file_name,
                        e
                    );
                }
            }
        }
        all_pairs
    }

    /// One model call for one chunk; returned pairs carry the chunk
    /// they were extracted from
    async fn extract_chunk(&self, chunk: &str, instruction: &str) -> Result<Vec<QaPair>> {
        let system_prompt = PromptBuilder::system_prompt(instruction);
        let user_prompt = PromptBuilder::user_prompt(instruction, chunk);

        let response = self.model.complete(system_prompt, &user_prompt).await?;

        let mut pairs = interpret(&response);
        for pair in &mut pairs {
            pair.source_chunk = chunk.to_string();
        }
        Ok(pairs)
    }

    /// Process documents in order, skipping any whose content hash has
    /// already been seen. Returns one (file name, pairs) entry per
    /// document; duplicates get an empty list.
    pub async fn extract_batch(
        &self,
        documents: &[Document],
        instruction: &str,
    ) -> Vec<(String, Vec<QaPair>)> {
        let mut seen_hashes = HashSet::new();
        let mut results = Vec::new();

        for document in documents {
            if !seen_hashes.insert(document.content_hash.clone()) {
                tracing::info!("skipping {}: duplicate content", document.file_name);
                results.push((document.file_name.clone(), Vec::new()));
                continue;
            }

            let pairs = self.extract_document(document, instruction).await;
            tracing::info!("generated {} QA pairs from {}", pairs.len(), document.file_name);
            results.push((document.file_name.clone(), pairs));
        }
        results
    }
}
