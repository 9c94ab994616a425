use crate::stage::{Stage, StageFlow};
use async_trait::async_trait;
use promptline_intent::IntentClassifier;
use promptline_language::LanguageIndexer;
use promptline_normalizer::Normalizer;
use promptline_protocol::ProcessingContext;

/// Tag added when the message contains fenced code
pub const HAS_CODE_TAG: &str = "has_code";

pub struct NormalizeStage {
    normalizer: Normalizer,
}

impl NormalizeStage {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }
}

#[async_trait]
impl Stage for NormalizeStage {
    fn name(&self) -> &'static str {
        "normalize"
    }

    async fn run(&self, ctx: &mut ProcessingContext) -> anyhow::Result<StageFlow> {
        let out = self.normalizer.normalize(&ctx.raw_input);
        ctx.normalized_text = out.text;
        ctx.outline = out.outline;
        ctx.change_ratio = out.change_ratio;
        ctx.has_code = out.has_code;
        if ctx.has_code {
            ctx.add_tag(HAS_CODE_TAG);
        }
        Ok(StageFlow::proceed(format!(
            "{} chars, change ratio {:.2}",
            ctx.normalized_text.chars().count(),
            ctx.change_ratio
        )))
    }
}

pub struct LanguageStage {
    indexer: LanguageIndexer,
}

impl LanguageStage {
    pub fn new(indexer: LanguageIndexer) -> Self {
        Self { indexer }
    }
}

#[async_trait]
impl Stage for LanguageStage {
    fn name(&self) -> &'static str {
        "language"
    }

    async fn run(&self, ctx: &mut ProcessingContext) -> anyhow::Result<StageFlow> {
        self.indexer.index_context(ctx);
        Ok(StageFlow::proceed(format!(
            "{} ({:.2}), index language {}",
            ctx.language.iso_code, ctx.language.confidence, ctx.index_language
        )))
    }
}

pub struct IntentStage {
    classifier: IntentClassifier,
}

impl IntentStage {
    pub fn new(classifier: IntentClassifier) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Stage for IntentStage {
    fn name(&self) -> &'static str {
        "intent"
    }

    async fn run(&self, ctx: &mut ProcessingContext) -> anyhow::Result<StageFlow> {
        let result = self.classifier.classify_context(ctx);
        let note = match result.rule {
            Some(rule) => format!("{} via {rule} (score {})", result.intent, result.score),
            None => result.intent.to_string(),
        };
        Ok(StageFlow::proceed(note))
    }
}
