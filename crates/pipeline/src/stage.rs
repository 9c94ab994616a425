use async_trait::async_trait;
use promptline_protocol::ProcessingContext;

/// What the driver does after a stage returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageFlow {
    /// Stage did its work; run the next one
    Continue(String),
    /// Nothing to do for this request; run the next one
    Skip(String),
    /// Request answered; the remaining stages are skipped
    Finish(String),
}

impl StageFlow {
    pub fn proceed(note: impl Into<String>) -> Self {
        Self::Continue(note.into())
    }

    pub fn skip(note: impl Into<String>) -> Self {
        Self::Skip(note.into())
    }

    pub fn finish(note: impl Into<String>) -> Self {
        Self::Finish(note.into())
    }
}

/// One step of the request pipeline.
///
/// The driver lends the context to exactly one stage at a time. An `Err` is
/// recorded as a skipped step and the pipeline carries on.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &mut ProcessingContext) -> anyhow::Result<StageFlow>;
}
