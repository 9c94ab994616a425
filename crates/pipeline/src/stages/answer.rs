use crate::collaborators::Generator;
use crate::config::PromptConfig;
use crate::prompt::render_prompt;
use crate::stage::{Stage, StageFlow};
use anyhow::Context;
use async_trait::async_trait;
use promptline_protocol::{ProcessingContext, RenderedPrompt};
use promptline_retrieval::KnowledgeRetriever;
use std::sync::Arc;

/// Answers greetings without calling the generator.
pub struct CannedResponseStage {
    reply: String,
}

impl CannedResponseStage {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl Stage for CannedResponseStage {
    fn name(&self) -> &'static str {
        "canned_response"
    }

    async fn run(&self, ctx: &mut ProcessingContext) -> anyhow::Result<StageFlow> {
        if !ctx.intent.is_greeting() {
            return Ok(StageFlow::skip("not a greeting"));
        }
        ctx.prompt = Some(RenderedPrompt {
            system: String::new(),
            user: ctx.normalized_text.clone(),
        });
        ctx.answer = Some(self.reply.clone());
        Ok(StageFlow::finish("greeting"))
    }
}

pub struct RetrievalStage {
    retriever: KnowledgeRetriever,
}

impl RetrievalStage {
    pub fn new(retriever: KnowledgeRetriever) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Stage for RetrievalStage {
    fn name(&self) -> &'static str {
        "retrieval"
    }

    async fn run(&self, ctx: &mut ProcessingContext) -> anyhow::Result<StageFlow> {
        let top_k = self.retriever.config().top_k;
        let matches = self.retriever.retrieve(ctx.query_text(), top_k).await?;
        let note = match matches.first() {
            Some(best) => format!("{} matches, best {} ({:.3})", matches.len(), best.id(), best.score()),
            None => "no matches".to_string(),
        };
        ctx.kb_matches = matches;
        Ok(StageFlow::proceed(note))
    }
}

pub struct AssembleStage {
    config: PromptConfig,
}

impl AssembleStage {
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Stage for AssembleStage {
    fn name(&self) -> &'static str {
        "assemble"
    }

    async fn run(&self, ctx: &mut ProcessingContext) -> anyhow::Result<StageFlow> {
        let prompt = render_prompt(ctx, &self.config);
        let note = format!(
            "system {} chars, user {} chars",
            prompt.system.chars().count(),
            prompt.user.chars().count()
        );
        ctx.prompt = Some(prompt);
        Ok(StageFlow::proceed(note))
    }
}

pub struct GenerateStage {
    generator: Arc<dyn Generator>,
    stream: bool,
}

impl GenerateStage {
    pub fn new(generator: Arc<dyn Generator>, stream: bool) -> Self {
        Self { generator, stream }
    }
}

#[async_trait]
impl Stage for GenerateStage {
    fn name(&self) -> &'static str {
        "generate"
    }

    async fn run(&self, ctx: &mut ProcessingContext) -> anyhow::Result<StageFlow> {
        let prompt = ctx.prompt.as_ref().context("no prompt was assembled")?;

        let answer = if self.stream {
            let mut chunks = self
                .generator
                .generate_stream(prompt)
                .await
                .context("generation stream failed to start")?;
            let mut answer = String::new();
            let mut count = 0usize;
            while let Some(chunk) = chunks.recv().await {
                answer.push_str(&chunk.context("generation stream failed")?);
                count += 1;
            }
            log::debug!("Accumulated {count} streamed chunks");
            answer
        } else {
            self.generator
                .generate(prompt)
                .await
                .context("generation failed")?
        };

        if answer.trim().is_empty() {
            anyhow::bail!("generator returned an empty answer");
        }
        let note = format!("{} chars", answer.chars().count());
        ctx.answer = Some(answer);
        Ok(StageFlow::proceed(note))
    }
}
