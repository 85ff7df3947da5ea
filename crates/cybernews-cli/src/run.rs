//! `run` and `sources` command handlers.

use chrono::Utc;
use cybernews_core::window::window_start;
use cybernews_core::{
    load_sources, parse_since_to_hours, AppConfig, ArticleStore, MemoryArticleStore, SourceConfig,
    SourceKind,
};
use cybernews_db::PgArticleStore;
use cybernews_enrich::{enrich_window, Classifier, Digest, ExtractiveSummarizer};
use cybernews_fetch::{DomainRateLimiter, FetchClient, RobotsCache};
use cybernews_ingest::{ingest_sources, IngestContext};

use crate::report::{render_markdown, write_report};
use crate::RunArgs;

/// Counts printed at the end of a run.
#[derive(Debug)]
struct RunSummary {
    rss_inserted: usize,
    html_inserted: usize,
    failed_sources: usize,
    enriched: usize,
    report_path: std::path::PathBuf,
}

/// Ingest, enrich, and report against the configured store.
///
/// # Errors
///
/// Returns an error if the window or sources file is invalid, the store
/// cannot be reached, or the report cannot be written. Individual source and
/// article failures are logged and do not fail the run.
pub(crate) async fn run_pipeline(config: &AppConfig, args: &RunArgs) -> anyhow::Result<()> {
    let since_hours = parse_since_to_hours(&args.since)?;
    let sources = load_sources(&config.sources_path)?;
    tracing::info!(
        rss = sources.of_kind(SourceKind::Rss).count(),
        html = sources.of_kind(SourceKind::Html).count(),
        since_hours,
        in_memory = args.in_memory,
        "starting run"
    );

    let summary = if args.in_memory {
        let store = MemoryArticleStore::new();
        execute(config, args, &store, &sources.sources, since_hours).await?
    } else {
        let pool = cybernews_db::connect_from_config(config).await?;
        cybernews_db::run_migrations(&pool).await?;
        let store = PgArticleStore::new(pool);
        execute(config, args, &store, &sources.sources, since_hours).await?
    };

    println!(
        "inserted: rss {} | html {} | failed sources: {}",
        summary.rss_inserted, summary.html_inserted, summary.failed_sources
    );
    println!("enriched (window): {}", summary.enriched);
    println!("generated: {}", summary.report_path.display());
    Ok(())
}

async fn execute<S: ArticleStore>(
    config: &AppConfig,
    args: &RunArgs,
    store: &S,
    sources: &[SourceConfig],
    since_hours: u32,
) -> anyhow::Result<RunSummary> {
    let client = FetchClient::new(config.request_timeout_secs, &config.user_agent)?;
    let limiter = DomainRateLimiter::new(config.per_domain_rps);
    let robots = RobotsCache::new(client.clone());
    let ctx = IngestContext {
        client: &client,
        limiter: &limiter,
        robots: &robots,
        store,
    };

    let ingest = ingest_sources(&ctx, sources, config.max_concurrent_sources).await;

    let now = Utc::now();
    let since = window_start(now, since_hours);
    let enrich = enrich_window(
        store,
        &Classifier::default(),
        &ExtractiveSummarizer::new(config.summary_sentences),
        since,
        config.max_concurrent_sources,
    )
    .await?;

    let limit = usize::from(args.limit);
    let digest = Digest::build(store.query_window(since).await?, limit);
    let today = now.date_naive();
    let markdown = render_markdown(&digest, &args.since, limit, today)?;
    let report_path = write_report(&args.output, &markdown, today)?;
    tracing::info!(path = %report_path.display(), articles = digest.articles.len(), "report written");

    Ok(RunSummary {
        rss_inserted: ingest.inserted_for(SourceKind::Rss),
        html_inserted: ingest.inserted_for(SourceKind::Html),
        failed_sources: ingest.failed(),
        enriched: enrich.enriched,
        report_path,
    })
}

/// Print the configured sources, one per line.
///
/// # Errors
///
/// Returns an error if the sources file cannot be loaded.
pub(crate) fn list_sources(config: &AppConfig) -> anyhow::Result<()> {
    let file = load_sources(&config.sources_path)?;
    if file.sources.is_empty() {
        println!("no sources configured in {}", config.sources_path.display());
        return Ok(());
    }

    println!("| Name | Kind | URL | Selector |");
    println!("|------|------|-----|----------|");
    for source in &file.sources {
        let selector = match source.kind {
            SourceKind::Html => source.link_selector_or_default(),
            SourceKind::Rss => "-",
        };
        println!(
            "| {} | {} | {} | {} |",
            source.name, source.kind, source.url, selector
        );
    }
    Ok(())
}
