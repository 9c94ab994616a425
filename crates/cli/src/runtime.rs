use crate::kb;
use anyhow::{Context as AnyhowContext, Result};
use promptline_pipeline::{Collaborators, EchoGenerator, LogTraceSink, Pipeline, PipelineConfig};
use promptline_prompt_cache::PromptCache;
use promptline_retrieval::{InMemoryDocumentStore, KnowledgeRetriever, StubEmbedder};
use std::path::Path;
use std::sync::Arc;

/// Dimensionality of the offline stub embedder
pub const STUB_EMBEDDING_DIM: usize = 256;

/// Offline collaborators shared by every request of one CLI invocation
pub struct Runtime {
    pub config: PipelineConfig,
    pub cache: Arc<PromptCache>,
    pub documents: Arc<InMemoryDocumentStore>,
    pub embedder: Arc<StubEmbedder>,
}

impl Runtime {
    /// Build the collaborators and seed the knowledge store from `kb`.
    pub async fn start(config: PipelineConfig, kb: Option<&Path>) -> Result<Self> {
        let runtime = Self {
            cache: Arc::new(PromptCache::new(config.cache.clone())),
            documents: Arc::new(InMemoryDocumentStore::new()),
            embedder: Arc::new(StubEmbedder::new(STUB_EMBEDDING_DIM)),
            config,
        };
        if let Some(path) = kb {
            kb::seed(&runtime.retriever(), runtime.documents.as_ref(), path).await?;
        }
        Ok(runtime)
    }

    pub fn retriever(&self) -> KnowledgeRetriever {
        KnowledgeRetriever::new(
            self.embedder.clone(),
            self.documents.clone(),
            self.config.retrieval.clone(),
        )
    }

    /// Full pipeline answering with the echo generator
    pub fn pipeline(&self) -> Result<Pipeline> {
        Pipeline::from_config(
            &self.config,
            Collaborators {
                generator: Arc::new(EchoGenerator),
                embedder: self.embedder.clone(),
                documents: self.documents.clone(),
                cache: self.cache.clone(),
                trace_sink: Arc::new(LogTraceSink),
            },
        )
        .context("Failed to assemble the pipeline")
    }
}
