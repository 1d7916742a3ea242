use anyhow::{Context, Result};

use tcscrape::config::Config;
use tcscrape::crawler::{PageFetcher, ScrapeOutput, ScrapePipeline};
use tcscrape::error::ClassifiedError;
use tcscrape::parser::ArticleParser;
use tcscrape::report::print_report;
use tcscrape::storage::{ensure_output_writable, export_csv};

/// Run one scrape: fetch, parse, dedupe, export and report
///
/// Per-page failures end up in the report; only setup and export failures
/// are returned as errors.
pub async fn scrape(config: Config) -> Result<()> {
    match run(&config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(
                category = %e.category(),
                output = %config.output.path.display(),
                error = %e,
                "Scrape aborted"
            );
            Err(e).context("Scrape aborted")
        }
    }
}

async fn run(config: &Config) -> tcscrape::error::Result<()> {
    config.validate()?;

    let output_path = config.output.path.as_path();
    ensure_output_writable(output_path)?;

    tracing::info!(
        pages = config.scrape.max_pages,
        delay_min = config.fetcher.delay_min_secs,
        delay_max = config.fetcher.delay_max_secs,
        pool_size = config.fetcher.pool_size,
        output = %output_path.display(),
        "Starting TechCrunch scraper"
    );

    let fetcher = PageFetcher::from_config(config)?;
    let parser = ArticleParser::new(&config.site.base_url, config.site.source_name.clone())?;

    let pipeline = ScrapePipeline::new(fetcher, parser)
        .with_concurrency(config.fetcher.pool_size)
        .stop_on_empty_page(config.scrape.stop_on_empty_page);

    let ScrapeOutput { articles, stats } = pipeline.run(config.scrape.max_pages).await;

    if articles.is_empty() {
        tracing::warn!("No articles were scraped successfully");
    }

    let written = export_csv(&articles, output_path)?;
    tracing::info!(rows = written, path = %output_path.display(), "Exported articles");

    if config.output.report {
        print_report(&articles, &stats, config.output.top_authors);
    }

    Ok(())
}
