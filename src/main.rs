use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use weather_lookup::{
    AppConfig, FjallWeatherCache, HttpWeatherClient, WeatherService, logging, web,
};

#[derive(Debug, Parser)]
#[command(name = "weather-lookup", version, about = "Weather lookup HTTP API")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "WEATHER_LOOKUP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_path(cli.config)?;
    let _logging = logging::init(&config.logging)?;
    tracing::info!(
        "Starting weather-lookup {} (store: {})",
        weather_lookup::VERSION,
        config.store.path
    );

    let cache = FjallWeatherCache::open(&config.store.path)?;
    let upstream = HttpWeatherClient::new(&config.weather, &config.geocoding)
        .context("Failed to build upstream client")?;
    let service = Arc::new(WeatherService::new(Arc::new(cache), Arc::new(upstream)));

    web::run(service, &config.server).await
}
