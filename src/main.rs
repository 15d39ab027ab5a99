use linkedin_scraper_lib::{logger, writer};
use linkedin_scraper_lib::{LinkedinScraper, ScraperConfig, SearchOptions};

use std::error::Error;
use log::{info, warn};

// One page of the batch run; the web UI asks for far fewer per click.
const BATCH_LIMIT: usize = 25;
const OUTPUT_CSV: &str = "jobs.csv";

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    logger::init();
    info!("Starting LinkedIn job search batch run...");

    // 1. Default search (same values the form starts with)
    let options = SearchOptions::default();
    let queries = [options.to_query(BATCH_LIMIT)];

    // 2. Scrape
    let scraper = LinkedinScraper::new(ScraperConfig::default());
    let mut records = Vec::new();
    scraper.run(&queries, |record| {
        info!("Found: {} | {}", record.title, record.company);
        records.push(record);
    })?;

    if records.is_empty() {
        warn!("No jobs found for '{}' in {}", options.job_title, options.location);
        return Ok(());
    }

    // 3. Export
    writer::append_to_csv(&records, OUTPUT_CSV)?;
    info!("Batch run completed. {} jobs saved to {}", records.len(), OUTPUT_CSV);
    Ok(())
}
