use crate::config::RetrievalConfig;
use crate::embedder::Embedder;
use crate::error::{Result, RetrievalError};
use crate::rank::rank;
use crate::store::{DocumentFilter, DocumentStore};
use promptline_protocol::{KbCandidate, KbMatch};
use std::sync::Arc;

/// Embeds queries and ranks the document store's candidates against them.
#[derive(Clone)]
pub struct KnowledgeRetriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn DocumentStore>,
    config: RetrievalConfig,
}

impl KnowledgeRetriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn DocumentStore>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Top matches for `query_text`; `k` is clamped like [`rank`].
    pub async fn retrieve(&self, query_text: &str, k: i64) -> Result<Vec<KbMatch>> {
        if query_text.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }
        let query = self
            .embedder
            .embed(query_text)
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;

        let candidates = self.load_candidates().await?;
        let matches = rank(&query, &candidates, k)?;
        log::debug!(
            "Retrieved {} of {} candidates (k={})",
            matches.len(),
            candidates.len(),
            k
        );
        Ok(matches)
    }

    /// Embed and persist a document, replacing any with the same id.
    pub async fn ingest(&self, mut document: KbCandidate) -> Result<()> {
        if document.content.trim().is_empty() {
            return Err(RetrievalError::Store(format!(
                "document {} has no content",
                document.id
            )));
        }
        let embedding = self
            .embedder
            .embed(&document.content)
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;
        document.declared_dimensions = Some(embedding.len());
        document.embedding = Some(embedding);

        let id = document.id.clone();
        self.store
            .persist(document)
            .await
            .map_err(|e| RetrievalError::Store(e.to_string()))?;
        log::debug!("Ingested document {id}");
        Ok(())
    }

    async fn load_candidates(&self) -> Result<Vec<KbCandidate>> {
        let mut filter = DocumentFilter {
            doc_types: self.config.doc_types.clone(),
            offset: 0,
            limit: self.config.page_size.max(1),
        };
        let mut candidates = Vec::new();
        loop {
            let page = self
                .store
                .list(&filter)
                .await
                .map_err(|e| RetrievalError::Store(e.to_string()))?;
            candidates.extend(page.items);
            match page.next_offset {
                Some(next) if next > filter.offset => filter.offset = next,
                _ => break,
            }
        }
        Ok(candidates)
    }
}
