use async_trait::async_trait;
use promptline_protocol::{RenderedPrompt, StepTrace};
use tokio::sync::mpsc;

/// Chunk stream returned by [`Generator::generate_stream`]
pub type ChunkReceiver = mpsc::Receiver<anyhow::Result<String>>;

/// Language-generation collaborator
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &RenderedPrompt) -> anyhow::Result<String>;

    /// Incremental answer. The default sends the whole answer as one chunk.
    async fn generate_stream(&self, prompt: &RenderedPrompt) -> anyhow::Result<ChunkReceiver> {
        let answer = self.generate(prompt).await?;
        let (tx, rx) = mpsc::channel(1);
        tx.send(Ok(answer)).await.ok();
        Ok(rx)
    }
}

/// Deterministic offline generator: echoes the user prompt.
#[derive(Debug, Clone, Default)]
pub struct EchoGenerator;

impl EchoGenerator {
    fn answer(prompt: &RenderedPrompt) -> String {
        format!("Echo: {}", prompt.user.trim())
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &RenderedPrompt) -> anyhow::Result<String> {
        Ok(Self::answer(prompt))
    }

    /// One chunk per word, separators included.
    async fn generate_stream(&self, prompt: &RenderedPrompt) -> anyhow::Result<ChunkReceiver> {
        let answer = Self::answer(prompt);
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            for chunk in answer.split_inclusive(' ') {
                if tx.send(Ok(chunk.to_string())).await.is_err() {
                    break;
                }
            }
        });
        Ok(rx)
    }
}

/// Receives the step trace once per request; the pipeline never reads it back.
pub trait TraceSink: Send + Sync {
    fn record(&self, request_id: &str, trace: &[StepTrace]);
}

/// Writes the trace to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTraceSink;

impl TraceSink for LogTraceSink {
    fn record(&self, request_id: &str, trace: &[StepTrace]) {
        for step in trace {
            log::debug!(
                "[{request_id}] {} {:?} @{}: {}",
                step.stage,
                step.status,
                step.at_ms,
                step.note
            );
        }
        log::info!("[{request_id}] pipeline finished after {} steps", trace.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    #[async_trait]
    impl Generator for Fixed {
        async fn generate(&self, _prompt: &RenderedPrompt) -> anyhow::Result<String> {
            Ok("fixed".to_string())
        }
    }

    async fn collect(mut rx: ChunkReceiver) -> String {
        let mut out = String::new();
        while let Some(chunk) = rx.recv().await {
            out.push_str(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn default_stream_yields_whole_answer() {
        let rx = Fixed.generate_stream(&RenderedPrompt::default()).await.unwrap();
        assert_eq!(collect(rx).await, "fixed");
    }

    #[tokio::test]
    async fn echo_stream_matches_generate() {
        let prompt = RenderedPrompt {
            system: "sys".to_string(),
            user: "how do I reset it".to_string(),
        };
        let whole = EchoGenerator.generate(&prompt).await.unwrap();
        let streamed = collect(EchoGenerator.generate_stream(&prompt).await.unwrap()).await;
        assert_eq!(whole, "Echo: how do I reset it");
        assert_eq!(streamed, whole);
    }
}
