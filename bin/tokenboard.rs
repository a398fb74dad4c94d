use anyhow::Context;
use jemallocator::Jemalloc;
use log::info;
use simple_logger::SimpleLogger;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use tokenboard::{Blocklist, FeedClient, MarketPipeline, Report, Settings};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new().context("Failed to load config. Please ensure it is valid")?;

    SimpleLogger::new()
        .with_level(settings.log_level())
        .init()
        .context("Failed to initialize logger")?;

    let valuation = settings
        .valuation
        .to_config()
        .context("Invalid valuation settings")?;

    let blocklist = match &settings.blocklist_path {
        Some(path) => Blocklist::from_file(path).context("Failed to load blocklist")?,
        None => {
            info!("No blocklist configured");
            Blocklist::default()
        }
    };

    let client = FeedClient::new(settings.feeds.clone()).context("Failed to create feed client")?;

    // Unreachable feeds come back empty; only malformed payloads abort here
    let snapshot = client
        .fetch_snapshot()
        .await
        .context("Upstream feed returned data in an unexpected shape")?;

    let pipeline = MarketPipeline::new(valuation, blocklist, settings.report.top_n);
    let ranked = pipeline.run(snapshot);

    let report = Report::new(&ranked);
    print!("{}", report.render(settings.report.format)?);

    Ok(())
}
