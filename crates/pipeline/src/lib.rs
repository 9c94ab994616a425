//! # Promptline Pipeline
//!
//! Turns one raw user message into an answer through an explicit, ordered
//! list of [`Stage`]s sharing a [`ProcessingContext`](promptline_protocol::ProcessingContext).
//!
//! ```text
//! normalize → language → intent → cache_lookup → canned_response →
//! retrieval → assemble → generate → cache_store
//! ```
//!
//! Every stage appends one step to the trace. A stage that answers the
//! request (cache hit, greeting) short-circuits the rest; a stage that fails
//! is recorded as skipped and the request carries on. Generation, document
//! storage and embedding are external collaborators passed in through
//! [`Collaborators`].

mod collaborators;
mod config;
mod error;
mod pipeline;
mod prompt;
mod stage;
pub mod stages;

pub use collaborators::{ChunkReceiver, EchoGenerator, Generator, LogTraceSink, TraceSink};
pub use config::{IntentConfig, PipelineConfig, PromptConfig, CONFIG_ENV};
pub use error::{PipelineError, Result};
pub use pipeline::{Collaborators, Pipeline};
pub use prompt::render_prompt;
pub use stage::{Stage, StageFlow};
