//! CLI for trend-digest.
//!
//! Summarizes today's GitHub Trending repositories with an LLM, writes a
//! markdown report and posts the top picks to the configured chat platforms.
//! The `article` subcommand writes a long-form article about the top trending
//! repository instead.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trend_digest::{
    ArticleGenerator, ArticleSummary, RunOptions, RunSummary, Runner, RunnerError, Settings,
    TrendingRange,
};

/// trend-digest - Summarize GitHub Trending with an LLM and publish the digest.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Settings file (defaults to ./trend-digest.toml when present).
    #[arg(long, env = "TREND_DIGEST_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Print the output instead of saving it and skip notifications.
    #[arg(long, env = "DRY_RUN", global = true)]
    dry_run: bool,

    /// Skip README enrichment.
    #[arg(long, global = true)]
    no_readme: bool,

    /// Number of repositories to process (1-25).
    #[arg(long, global = true)]
    max_repos: Option<usize>,

    /// Number of top picks (1-5).
    #[arg(long, global = true)]
    top_picks: Option<usize>,

    /// Trending language filter, e.g. "rust".
    #[arg(long, global = true)]
    language: Option<String>,

    /// Trending range: daily, weekly or monthly.
    #[arg(long, global = true)]
    since: Option<TrendingRange>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Build the daily digest (the default).
    Digest,
    /// Write a deep-dive article about the top trending repository.
    Article,
}

/// What a finished invocation produced.
enum Outcome {
    Digest(RunSummary),
    Article(ArticleSummary),
}

#[tokio::main]
async fn main() -> ExitCode {
    // A local .env is optional
    let _ = dotenvy::dotenv();

    // Initialize tracing
    init_tracing();

    // octocrab and reqwest both pull in rustls; pin the provider before either builds a client
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(Outcome::Digest(summary)) => {
            print_summary(&summary);

            // Every summary degraded means no tier answered at all
            if summary.all_degraded() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Ok(Outcome::Article(summary)) => {
            print_article_summary(&summary);
            ExitCode::from(0)
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with compact output, filtered by `RUST_LOG` (default "info").
fn init_tracing() {
    tracing_subscriber::registry()
        // Use compact formatting without module target paths
        .with(fmt::layer().compact().with_target(false))
        // Falls back to "info" level if RUST_LOG is not set or invalid
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<Outcome, RunnerError> {
    let command = args.command.unwrap_or(Command::Digest);

    // Environment and settings file first, then flags on top
    let mut settings = Settings::load(args.config.as_deref())?;
    apply_overrides(&mut settings, &args);
    let options = RunOptions {
        dry_run: args.dry_run,
    };

    match command {
        Command::Digest => {
            let runner = Runner::new(settings)?;
            runner.run(options).await.map(Outcome::Digest)
        }
        Command::Article => {
            // Only the chosen repository needs its README
            settings.fetch_readme = false;
            let generator = ArticleGenerator::from_settings(&settings.llm)?;
            let runner = Runner::new(settings)?;
            runner
                .run_article(&generator, options)
                .await
                .map(Outcome::Article)
        }
    }
}

/// Command-line flags win over environment and file settings.
fn apply_overrides(settings: &mut Settings, args: &Args) {
    if args.no_readme {
        settings.fetch_readme = false;
    }
    if let Some(max_repos) = args.max_repos {
        settings.max_repos = max_repos;
    }
    if let Some(top_picks) = args.top_picks {
        settings.top_pick_count = top_picks;
    }
    if let Some(language) = &args.language {
        settings.trending.language = Some(language.clone());
    }
    if let Some(since) = args.since {
        settings.trending.since = since;
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Source: {}", summary.source_tag);
    println!("  Repositories: {}", summary.repositories);
    println!("  Top picks: {}", summary.top_picks);
    println!("  Quick looks: {}", summary.quick_looks);
    println!("  Degraded summaries: {}", summary.degraded);

    if let Some(path) = &summary.report_path {
        println!("  Report: {}", path.display());
    }

    // Dry runs send nothing
    if !summary.dry_run {
        for delivery in &summary.deliveries {
            match &delivery.error {
                None => println!("  {}: delivered", delivery.platform),
                Some(e) => println!("  {}: failed ({e})", delivery.platform),
            }
        }
    }
}

/// Prints the article run summary.
fn print_article_summary(summary: &ArticleSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Source: {}", summary.source_tag);
    println!("  Repository: {}", summary.repository);
    println!("  Characters: {}", summary.chars);

    if let Some(path) = &summary.article_path {
        println!("  Article: {}", path.display());
    }
}
