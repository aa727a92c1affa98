use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use hostsieve::config::Config;
use hostsieve::init::setup_logging;
use hostsieve::pipeline::Pipeline;
use hostsieve::source::HttpSource;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Config
    let config_path = std::env::args().nth(1).unwrap_or("hostsieve.toml".to_string());
    let command = std::env::args().nth(2).unwrap_or("all".to_string());
    let config_exists = std::path::Path::new(&config_path).exists();
    let config = if config_exists {
        Config::load(&config_path)
            .await
            .with_context(|| format!("Failed to load config {}", config_path))?
    } else {
        Config::default()
    };

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting hostsieve ({})...", command);

    if !config_exists {
        info!("Config file not found, using defaults.");
    }
    if config.feeds.is_empty() {
        warn!("No feeds configured; only the allow-list will be rebuilt.");
    }

    // 3. Build the pipeline
    let source = HttpSource::new(&config.fetch)?;
    let pipeline = Pipeline::new(config, source);

    // 4. Run the requested steps
    match command.as_str() {
        "whitelist" => {
            pipeline
                .build_whitelist()
                .await
                .context("Allow-list build failed")?;
        }
        "filter" => {
            pipeline
                .filter_feeds()
                .await
                .context("Feed filtering failed")?;
        }
        "all" => {
            pipeline.run().await.context("Pipeline run failed")?;
        }
        other => bail!("unknown command '{}': expected whitelist, filter or all", other),
    }

    info!("Done.");
    Ok(())
}
