use crate::cache::{CacheEntry, PromptCache};
use async_trait::async_trait;

/// Storage seam for the pipeline. The in-memory [`PromptCache`] is the
/// default; a distributed store implements the same contract.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Atomically count a hit and return a snapshot
    async fn lookup(&self, key: &str) -> Option<CacheEntry>;

    /// Insert or overwrite, bumping the frequency
    async fn store(
        &self,
        key: &str,
        system_prompt: &str,
        user_prompt: &str,
        final_prompt: &str,
    ) -> Option<CacheEntry>;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl CacheBackend for PromptCache {
    async fn lookup(&self, key: &str) -> Option<CacheEntry> {
        PromptCache::lookup(self, key)
    }

    async fn store(
        &self,
        key: &str,
        system_prompt: &str,
        user_prompt: &str,
        final_prompt: &str,
    ) -> Option<CacheEntry> {
        PromptCache::store(self, key, system_prompt, user_prompt, final_prompt)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
