mod nearest;
mod quote;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "postloc")]
#[command(about = "Postcode-localized pricing from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Localize one or more base prices for a shopper's location
    Quote {
        /// Base price text, as it appears on the page (repeatable)
        #[arg(long = "price", required = true)]
        prices: Vec<String>,
        /// Four-digit postcode, looked up through the proxy
        #[arg(long)]
        postcode: Option<String>,
        /// Device latitude, reverse-geocoded to a postcode
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,
        /// Device longitude
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
        /// Location cache file (defaults to `POSTLOC_CACHE_PATH`)
        #[arg(long)]
        cache: Option<PathBuf>,
        /// Ignore and do not update the location cache
        #[arg(long, conflicts_with = "cache")]
        no_cache: bool,
    },
    /// Show the nearest fulfillment point and surcharge for a position
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = postloc_core::load_localizer_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Quote {
            prices,
            postcode,
            lat,
            lon,
            cache,
            no_cache,
        }) => {
            let position = lat.zip(lon);
            let cache = if no_cache {
                None
            } else {
                Some(cache.unwrap_or_else(|| config.cache_path.clone()))
            };
            quote::run_quote(
                &config,
                quote::QuoteRequest {
                    prices,
                    postcode,
                    position,
                    cache,
                },
            )
            .await?;
        }
        Some(Commands::Nearest { lat, lon }) => nearest::run_nearest(lat, lon),
        None => println!("postloc: run with --help to list commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
