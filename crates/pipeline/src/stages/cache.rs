use crate::stage::{Stage, StageFlow};
use async_trait::async_trait;
use promptline_prompt_cache::{derive_key, CacheBackend};
use promptline_protocol::{ProcessingContext, RenderedPrompt};
use std::sync::Arc;

/// Derives the cache key and answers from the cache on a hit.
pub struct CacheLookupStage {
    cache: Arc<dyn CacheBackend>,
}

impl CacheLookupStage {
    pub fn new(cache: Arc<dyn CacheBackend>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl Stage for CacheLookupStage {
    fn name(&self) -> &'static str {
        "cache_lookup"
    }

    async fn run(&self, ctx: &mut ProcessingContext) -> anyhow::Result<StageFlow> {
        ctx.cache_key = derive_key(
            ctx.scope.as_deref(),
            &ctx.language.iso_code,
            &ctx.normalized_text,
        );
        let Some(key) = ctx.cache_key.as_deref() else {
            return Ok(StageFlow::skip("no cache key"));
        };

        match self.cache.lookup(key).await {
            Some(entry) => {
                ctx.cache_hit = true;
                ctx.cache_frequency = entry.frequency;
                ctx.prompt = Some(RenderedPrompt {
                    system: entry.system_prompt,
                    user: entry.user_prompt,
                });
                ctx.answer = Some(entry.final_prompt);
                Ok(StageFlow::finish(format!("hit, frequency {}", entry.frequency)))
            }
            None => Ok(StageFlow::proceed("miss")),
        }
    }
}

/// Stores the generated answer. Runs only after a successful generation.
pub struct CacheStoreStage {
    cache: Arc<dyn CacheBackend>,
}

impl CacheStoreStage {
    pub fn new(cache: Arc<dyn CacheBackend>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl Stage for CacheStoreStage {
    fn name(&self) -> &'static str {
        "cache_store"
    }

    async fn run(&self, ctx: &mut ProcessingContext) -> anyhow::Result<StageFlow> {
        let (Some(key), Some(prompt), Some(answer)) = (&ctx.cache_key, &ctx.prompt, &ctx.answer)
        else {
            return Ok(StageFlow::skip("nothing to store"));
        };

        let stored = self
            .cache
            .store(key, &prompt.system, &prompt.user, answer)
            .await;
        match stored {
            Some(entry) => {
                ctx.cache_frequency = entry.frequency;
                Ok(StageFlow::proceed(format!(
                    "stored in {}, frequency {}",
                    self.cache.name(),
                    entry.frequency
                )))
            }
            None => Ok(StageFlow::skip("cache refused the key")),
        }
    }
}
