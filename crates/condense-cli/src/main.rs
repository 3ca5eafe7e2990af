mod atomic;
mod config;
mod config_cmd;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use condense_core::document::{ChunkPlan, word_count};
use condense_core::highlight::highlight;
use condense_core::pipeline::Pipeline;
use condense_core::summarize::{CompletionOptions, create_summarize_provider};
use config::{Config, ConfigPaths, ProviderConfig};
use std::fmt::Display;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "condense", version, about = "chunked bullet-point summarizer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    Config(config_cmd::ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
struct RunArgs {
    /// Text file to summarize; reads stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Words per chunk (disables auto-shrink)
    #[arg(long, value_name = "words", allow_negative_numbers = true)]
    chunk_size: Option<i64>,

    /// Words shared between consecutive chunks (disables auto-shrink)
    #[arg(long, value_name = "words", allow_negative_numbers = true)]
    overlap: Option<i64>,

    /// First page to include (1-based, form-feed separated input)
    #[arg(long, value_name = "page")]
    page_start: Option<usize>,

    /// Last page to include (inclusive)
    #[arg(long, value_name = "page")]
    page_end: Option<usize>,

    /// Regex to highlight in the printed summary
    #[arg(long, value_name = "regex")]
    highlight: Option<String>,

    /// Save the summary to this file
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,

    /// Summarize mode: local or cloud
    #[arg(long)]
    summarize: Option<String>,

    /// Summarize model override for the selected mode
    #[arg(long, value_name = "model")]
    summarize_model: Option<String>,

    /// Chunks summarized concurrently
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Debug, Clone)]
struct ResolvedRunArgs {
    input: Option<PathBuf>,
    profile: ProviderConfig,
    options: CompletionOptions,
    chunk_size: i64,
    overlap: i64,
    auto_shrink: bool,
    workers: usize,
    page_start: Option<usize>,
    page_end: Option<usize>,
    highlight: String,
    output: Option<PathBuf>,
}

impl RunArgs {
    fn resolve(self, config: &Config) -> Result<ResolvedRunArgs, String> {
        let mut summarize = config.summarize.clone();
        apply_env_overrides(&mut summarize.local, &mut summarize.cloud);

        let mode = select_mode(summarize.active.as_str(), self.summarize.as_deref())?;
        let mut profile = if mode == "cloud" {
            summarize.cloud
        } else {
            summarize.local
        };
        if let Some(model) = self.summarize_model {
            profile.model = model;
        }

        let explicit_sizes = self.chunk_size.is_some() || self.overlap.is_some();
        let workers = self.workers.unwrap_or(config.chunking.workers);
        if workers == 0 {
            return Err("workers must be greater than 0".to_string());
        }

        let highlight = self
            .highlight
            .unwrap_or_else(|| config.output.highlight.clone());
        condense_core::highlight::highlight("", &highlight)
            .map_err(|e| format!("highlight: {e}"))?;

        Ok(ResolvedRunArgs {
            input: self.input,
            profile,
            options: CompletionOptions {
                temperature: summarize.temperature,
                max_tokens: summarize.max_tokens,
            },
            chunk_size: self.chunk_size.unwrap_or(config.chunking.size),
            overlap: self.overlap.unwrap_or(config.chunking.overlap),
            auto_shrink: config.chunking.auto_shrink && !explicit_sizes,
            workers,
            page_start: self.page_start,
            page_end: self.page_end,
            highlight,
            output: self.output,
        })
    }
}

impl ResolvedRunArgs {
    fn chunk_plan(&self, words: usize) -> ChunkPlan {
        if self.auto_shrink {
            ChunkPlan::for_word_count(words, self.chunk_size, self.overlap)
        } else {
            ChunkPlan {
                size: self.chunk_size,
                overlap: self.overlap,
            }
        }
    }
}

fn select_mode(active: &str, selector: Option<&str>) -> Result<String, String> {
    match selector {
        None => Ok(if active == "cloud" {
            "cloud".to_string()
        } else {
            "local".to_string()
        }),
        Some("local") => Ok("local".to_string()),
        Some("cloud") => Ok("cloud".to_string()),
        Some(other) => Err(format!("summarize must be local or cloud (got {other})")),
    }
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn apply_env_overrides(local: &mut ProviderConfig, cloud: &mut ProviderConfig) {
    if let Some(value) = env_override("CONDENSE_SUMMARIZE_LOCAL_MODEL") {
        local.model = value;
    }
    if let Some(value) = env_override("CONDENSE_SUMMARIZE_CLOUD_MODEL") {
        cloud.model = value;
    }
    if let Some(value) = env_override("CONDENSE_SUMMARIZE_CLOUD_API_KEY") {
        cloud.api_key = value;
    }
    if cloud.api_key.trim().is_empty()
        && let Some(value) = env_override("OPENROUTER_API_KEY")
    {
        cloud.api_key = value;
    }
}

fn non_empty_str(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(label: &str, err: impl Display) -> ! {
    eprintln!("{label}: {err}");
    std::process::exit(1);
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = ConfigPaths::from_home().unwrap_or_else(|e| fail("config paths error", e));
    let config = Config::load_or_create(&paths).unwrap_or_else(|e| fail("config load failed", e));

    if let Some(Command::Config(args)) = cli.command {
        if let Err(e) = config_cmd::run(&args, &paths) {
            fail("config failed", e);
        }
        return;
    }

    let run = cli
        .run
        .resolve(&config)
        .unwrap_or_else(|e| fail("run args error", e));

    let document = input::read_document(run.input.as_deref())
        .unwrap_or_else(|e| fail("input read failed", e));
    let text = document
        .select(run.page_start, run.page_end)
        .unwrap_or_else(|e| fail("page selection failed", e));
    let pages = if document.is_paginated() {
        Some(
            document
                .resolve_range(run.page_start, run.page_end)
                .unwrap_or_else(|e| fail("page selection failed", e)),
        )
    } else {
        None
    };
    let words = word_count(&text);
    let plan = run.chunk_plan(words);
    tracing::info!(words, size = plan.size, overlap = plan.overlap, "input loaded");

    let provider = create_summarize_provider(
        run.profile.provider.as_str(),
        non_empty_str(run.profile.model.as_str()),
        non_empty_str(run.profile.api_key.as_str()),
        run.options,
    )
    .unwrap_or_else(|e| fail("summarize init failed", e));
    let pipeline = Pipeline::new(provider).with_workers(run.workers);

    let summary = pipeline
        .summarize(&text, plan.size, plan.overlap)
        .unwrap_or_else(|e| fail("summarize failed", e));

    if let Some(path) = run.output.as_deref() {
        output::save_summary(path, &summary).unwrap_or_else(|e| fail("save failed", e));
        tracing::info!(path = %path.display(), "summary saved");
    }

    let rendered =
        highlight(summary.as_str(), &run.highlight).unwrap_or_else(|e| fail("highlight failed", e));
    println!(
        "{}",
        output::render_header(pages, words, plan.size, plan.overlap)
    );
    println!();
    println!("{rendered}");
}
