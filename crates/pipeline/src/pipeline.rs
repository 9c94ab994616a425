use crate::collaborators::{Generator, LogTraceSink, TraceSink};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::stage::{Stage, StageFlow};
use crate::stages::{
    AssembleStage, CacheLookupStage, CacheStoreStage, CannedResponseStage, GenerateStage,
    IntentStage, LanguageStage, NormalizeStage, RetrievalStage,
};
use promptline_intent::{IntentClassifier, IntentResources};
use promptline_language::LanguageIndexer;
use promptline_normalizer::Normalizer;
use promptline_prompt_cache::CacheBackend;
use promptline_protocol::{ProcessingContext, StepStatus};
use promptline_retrieval::{DocumentStore, Embedder, KnowledgeRetriever};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// External collaborators the built-in stages call into
#[derive(Clone)]
pub struct Collaborators {
    pub generator: Arc<dyn Generator>,
    pub embedder: Arc<dyn Embedder>,
    pub documents: Arc<dyn DocumentStore>,
    /// Shared by every request of the process
    pub cache: Arc<dyn CacheBackend>,
    pub trace_sink: Arc<dyn TraceSink>,
}

/// Explicit, ordered stage list assembled once at startup.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    trace_sink: Arc<dyn TraceSink>,
    next_request: AtomicU64,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>, trace_sink: Arc<dyn TraceSink>) -> Self {
        Self {
            stages,
            trace_sink,
            next_request: AtomicU64::new(1),
        }
    }

    /// Build the standard stage order from config.
    pub fn from_config(config: &PipelineConfig, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        let resources = IntentResources::load(config.intent.rules_path.as_deref());
        let retriever = KnowledgeRetriever::new(
            collaborators.embedder,
            collaborators.documents,
            config.retrieval.clone(),
        );

        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(NormalizeStage::new(Normalizer::new(config.normalizer.clone()))),
            Box::new(LanguageStage::new(LanguageIndexer::new(config.language.clone()))),
            Box::new(IntentStage::new(IntentClassifier::new(resources))),
            Box::new(CacheLookupStage::new(Arc::clone(&collaborators.cache))),
            Box::new(CannedResponseStage::new(config.prompt.greeting_reply.clone())),
            Box::new(RetrievalStage::new(retriever)),
            Box::new(AssembleStage::new(config.prompt.clone())),
            Box::new(GenerateStage::new(collaborators.generator, config.prompt.stream)),
            Box::new(CacheStoreStage::new(collaborators.cache)),
        ];
        Ok(Self::new(stages, collaborators.trace_sink))
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage in order over a fresh context.
    ///
    /// Only blank input is rejected. A failing stage becomes a skipped trace
    /// entry; after a short circuit the remaining stages are recorded as
    /// skipped without running.
    pub async fn run(&self, raw: &str, scope: Option<&str>) -> Result<ProcessingContext> {
        if raw.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let mut ctx = ProcessingContext::new(raw);
        if let Some(scope) = scope {
            ctx = ctx.with_scope(scope);
        }
        let request_id = format!("req-{}", self.next_request.fetch_add(1, Ordering::Relaxed));
        log::debug!("[{request_id}] processing {} chars", raw.chars().count());

        let mut finished_by: Option<&'static str> = None;
        for stage in &self.stages {
            let name = stage.name();
            if let Some(by) = finished_by {
                ctx.record(name, StepStatus::Skipped, format!("answered by {by}"));
                continue;
            }

            match stage.run(&mut ctx).await {
                Ok(StageFlow::Continue(note)) => ctx.record(name, StepStatus::Completed, note),
                Ok(StageFlow::Skip(note)) => ctx.record(name, StepStatus::Skipped, note),
                Ok(StageFlow::Finish(note)) => {
                    ctx.record(name, StepStatus::ShortCircuit, note);
                    finished_by = Some(name);
                }
                Err(e) => {
                    log::warn!("[{request_id}] stage {name} failed: {e:#}");
                    ctx.record(name, StepStatus::Skipped, format!("failed: {e:#}"));
                }
            }
        }

        self.trace_sink.record(&request_id, &ctx.trace);
        Ok(ctx)
    }
}

impl Default for Pipeline {
    /// Empty pipeline that only validates input and traces to the log
    fn default() -> Self {
        Self::new(Vec::new(), Arc::new(LogTraceSink))
    }
}
