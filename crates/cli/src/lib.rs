use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use promptline_intent::{IntentClassifier, IntentResources};
use promptline_language::LanguageIndexer;
use promptline_normalizer::Normalizer;
use promptline_pipeline::stages::{IntentStage, LanguageStage, NormalizeStage};
use promptline_pipeline::{LogTraceSink, Pipeline, PipelineConfig, Stage};
use promptline_prompt_cache::CacheStats;
use promptline_protocol::{Intent, KbMatch, ProcessingContext, StepTrace};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

mod kb;
mod runtime;

use runtime::Runtime;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    print_stdout(&text)
}

#[derive(Parser)]
#[command(name = "promptline")]
#[command(about = "Normalize, classify and answer chat messages", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Pipeline config file (overrides PROMPTLINE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON array of knowledge documents loaded into the in-memory store
    #[arg(long, global = true)]
    kb: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline with offline collaborators
    Process(ProcessArgs),

    /// Normalize a message and show its outline
    Normalize(InputArgs),

    /// Detect the language and build the index text
    Detect(InputArgs),

    /// Classify the intent of a message
    Classify(InputArgs),

    /// Rank the --kb documents against a message
    Retrieve(RetrieveArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Message text; read from stdin when omitted
    text: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ProcessArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Cache scope (user or session id)
    #[arg(long)]
    scope: Option<String>,

    /// Consume the generator as a chunk stream
    #[arg(long)]
    stream: bool,

    /// Run the same message N times against one cache
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    repeat: u32,
}

#[derive(Args)]
struct RetrieveArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Number of matches (clamped to 1..=20; defaults to [retrieval] top_k)
    #[arg(short, long)]
    k: Option<i64>,
}

#[derive(Serialize)]
struct ProcessOutput {
    request: ProcessingContext,
    cache: CacheStats,
}

#[derive(Serialize)]
struct ClassifyOutput {
    intent: Intent,
    tags: BTreeSet<String>,
    index_text: String,
    trace: Vec<StepTrace>,
}

#[derive(Serialize)]
struct RetrieveOutput {
    query: String,
    k: i64,
    matches: Vec<KbMatch>,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = PipelineConfig::load(cli.config.as_deref())
        .context("Failed to load pipeline config")?;

    match cli.command {
        Commands::Process(args) => run_process(args, config, cli.kb).await?,
        Commands::Normalize(args) => run_normalize(args, &config)?,
        Commands::Detect(args) => run_detect(args, &config)?,
        Commands::Classify(args) => run_classify(args, &config).await?,
        Commands::Retrieve(args) => run_retrieve(args, config, cli.kb).await?,
    }

    Ok(())
}

fn read_input(text: Option<String>) -> Result<String> {
    let input = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read message from stdin")?;
            buffer
        }
    };

    if input.trim().is_empty() {
        anyhow::bail!("Message is empty. Pass it as an argument or pipe it via stdin.");
    }
    Ok(input)
}

async fn run_process(
    args: ProcessArgs,
    mut config: PipelineConfig,
    kb: Option<PathBuf>,
) -> Result<()> {
    let raw = read_input(args.input.text)?;
    if args.stream {
        config.prompt.stream = true;
    }

    let runtime = Runtime::start(config, kb.as_deref()).await?;
    let pipeline = runtime.pipeline()?;

    let mut last = None;
    for _ in 0..args.repeat {
        last = Some(pipeline.run(&raw, args.scope.as_deref()).await?);
    }
    let request = last.context("Pipeline did not run")?;

    print_json(
        &ProcessOutput {
            request,
            cache: runtime.cache.stats(),
        },
        args.input.pretty,
    )
}

fn run_normalize(args: InputArgs, config: &PipelineConfig) -> Result<()> {
    let raw = read_input(args.text)?;
    let normalized = Normalizer::new(config.normalizer.clone()).normalize(&raw);
    print_json(&normalized, args.pretty)
}

fn run_detect(args: InputArgs, config: &PipelineConfig) -> Result<()> {
    let raw = read_input(args.text)?;
    let normalized = Normalizer::new(config.normalizer.clone()).normalize(&raw);
    let report = LanguageIndexer::new(config.language.clone()).index(&normalized.text);
    print_json(&report, args.pretty)
}

async fn run_classify(args: InputArgs, config: &PipelineConfig) -> Result<()> {
    let raw = read_input(args.text)?;
    let resources = IntentResources::load(config.intent.rules_path.as_deref());
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(NormalizeStage::new(Normalizer::new(config.normalizer.clone()))),
        Box::new(LanguageStage::new(LanguageIndexer::new(config.language.clone()))),
        Box::new(IntentStage::new(IntentClassifier::new(resources))),
    ];
    let ctx = Pipeline::new(stages, Arc::new(LogTraceSink))
        .run(&raw, None)
        .await?;

    print_json(
        &ClassifyOutput {
            intent: ctx.intent,
            tags: ctx.tags,
            index_text: ctx.index_text,
            trace: ctx.trace,
        },
        args.pretty,
    )
}

async fn run_retrieve(
    args: RetrieveArgs,
    config: PipelineConfig,
    kb: Option<PathBuf>,
) -> Result<()> {
    let raw = read_input(args.input.text)?;
    if kb.is_none() {
        log::warn!("No --kb given; the knowledge store is empty");
    }

    let normalized = Normalizer::new(config.normalizer.clone()).normalize(&raw);
    let report = LanguageIndexer::new(config.language.clone()).index(&normalized.text);
    let query = if report.index_text.trim().is_empty() {
        normalized.text
    } else {
        report.index_text
    };

    let k = args.k.unwrap_or(config.retrieval.top_k);
    let runtime = Runtime::start(config, kb.as_deref()).await?;
    let matches = runtime
        .retriever()
        .retrieve(&query, k)
        .await
        .context("Retrieval failed")?;

    print_json(&RetrieveOutput { query, k, matches }, args.input.pretty)
}
