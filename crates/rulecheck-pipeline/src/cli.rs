//! CLI module for rulecheck.
//!
//! Provides the `check` and `inspect` commands, usable either through the
//! standalone `rulecheck-pipeline` binary or as subcommands of `rulecheck`.

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rulecheck_config::{
    CliOverrides, Config, LoggingConfig, apply_overrides, load_config, validate_config,
};
use rulecheck_core::defaults::DEFAULT_HIERARCHY_DEPTH;
use rulecheck_rules::{DomainHierarchy, RuleIndex};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::PipelineError;
use crate::pipeline::Pipeline;

/// Standalone pipeline CLI.
#[derive(Parser, Debug, Clone)]
#[command(name = "rulecheck-pipeline", version, about = "Validate ad-block rule lists")]
pub struct PipelineCli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve every referenced domain and write the filtered artifacts.
    Check(Box<CheckArgs>),
    /// Parse a rule file and print statistics without any DNS traffic.
    Inspect(InspectArgs),
}

/// `check` arguments.
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Config file path (json/yaml/toml). Built-in defaults when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// `inspect` arguments.
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Rule file to parse
    pub input: PathBuf,
    /// Aggregation depth used for the query estimate
    #[arg(long, default_value_t = DEFAULT_HIERARCHY_DEPTH)]
    pub depth: usize,
    /// Log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Dispatch a parsed [`Command`].
pub async fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Check(args) => run_check(*args).await,
        Command::Inspect(args) => run_inspect(args),
    }
}

/// Full validation run.
///
/// Succeeds even when some artifacts could not be written; those are
/// listed in the printed summary.
pub async fn run_check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;

    init_tracing(&config.logging);
    info!(
        version = rulecheck_core::VERSION,
        input = %config.input.path,
        tiers = config.resolver.tiers.len(),
        max_concurrency = config.resolver.max_concurrency,
        "starting check"
    );

    let outcome = Pipeline::new(config).run().await?;
    print!("{}", outcome.stats);
    Ok(())
}

/// Parse-only statistics.
pub fn run_inspect(args: InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&LoggingConfig {
        level: args.log_level.clone(),
        ..Default::default()
    });
    let summary = inspect(&args.input, args.depth)?;
    print!("{summary}");
    Ok(())
}

/// Counts reported by `inspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectSummary {
    pub total_rules: usize,
    pub invalid_rules: usize,
    pub header_comments: usize,
    pub domains: usize,
    pub parents: usize,
    /// Queries needed if every parent resolves.
    pub min_queries: usize,
    pub kinds: Vec<(&'static str, usize)>,
}

impl std::fmt::Display for InspectSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "rules: {} total, {} invalid, {} header comments",
            self.total_rules, self.invalid_rules, self.header_comments
        )?;
        writeln!(
            f,
            "domains: {} referenced, {} parents, at least {} queries",
            self.domains, self.parents, self.min_queries
        )?;
        for (kind, count) in &self.kinds {
            writeln!(f, "  {kind}: {count}")?;
        }
        Ok(())
    }
}

pub fn inspect(input: &Path, depth: usize) -> Result<InspectSummary, PipelineError> {
    let index = RuleIndex::load(input).map_err(PipelineError::Input)?;
    let hierarchy = DomainHierarchy::build(index.domains(), depth);
    let plan = hierarchy.query_plan(index.domains(), false);
    Ok(InspectSummary {
        total_rules: index.total_rules(),
        invalid_rules: index.invalid_rules(),
        header_comments: index.header().len(),
        domains: index.domain_count(),
        parents: hierarchy.parent_count(),
        min_queries: plan.len(),
        kinds: index.kind_counts(),
    })
}

/// Initialize tracing subscriber with the given logging configuration.
///
/// Supports:
/// - `level`: Base log level (trace, debug, info, warn, error)
/// - `format`: Output format (json, pretty, compact). Default: pretty
/// - `output`: Output target (stdout, stderr). Default: stderr
/// - `filters`: Per-module log level overrides
pub fn init_tracing(config: &LoggingConfig) {
    let base_level = config.level.as_deref().unwrap_or("info");
    let mut filter_str = base_level.to_string();
    for (module, level) in &config.filters {
        filter_str.push(',');
        filter_str.push_str(module);
        filter_str.push('=');
        filter_str.push_str(level);
    }
    let filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new("info"));

    let format = config.format.as_deref().unwrap_or("pretty");
    let output = config.output.as_deref().unwrap_or("stderr");

    // try_init: a second call (tests, embedding) keeps the first subscriber.
    let _ = match (format, output) {
        ("json", "stdout") => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stdout))
            .try_init(),
        ("json", _) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        ("compact", "stdout") => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(io::stdout))
            .try_init(),
        ("compact", _) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(io::stderr))
            .try_init(),
        (_, "stdout") => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stdout))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr))
            .try_init(),
    };
}
