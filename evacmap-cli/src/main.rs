use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Evacuation shelter map CLI tool
#[derive(Parser)]
#[command(name = "evacmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the shelter catalog CSV (lat,lng columns)
    #[arg(short, long, env = "EVACMAP_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Static map rendering service API key
    #[arg(short, long, env = "EVACMAP_API_KEY", global = true)]
    api_key: Option<String>,

    /// Search radius in kilometers
    #[arg(
        short,
        long,
        env = "EVACMAP_RADIUS_KM",
        default_value = "0.5",
        global = true
    )]
    radius_km: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a shelter map for the current location
    Download {
        /// Latitude in decimal degrees (with --lng, skips geolocation)
        #[arg(long, requires = "lng")]
        lat: Option<f64>,

        /// Longitude in decimal degrees (with --lat, skips geolocation)
        #[arg(long, requires = "lat")]
        lng: Option<f64>,

        /// Geolocation service URL returning {"lat":..,"lng":..} JSON
        #[arg(long, env = "EVACMAP_LOCATION_URL", conflicts_with_all = ["lat", "lng"])]
        location_url: Option<String>,

        /// Map zoom level
        #[arg(long, default_value = "15")]
        zoom: u32,

        /// Map size in pixels, WxH
        #[arg(long, default_value = "500x500")]
        size: String,

        /// Output file
        #[arg(short, long, default_value = "map.jpg")]
        output: PathBuf,
    },

    /// List shelters within the radius of a coordinate
    Filter {
        /// Latitude in decimal degrees
        #[arg(long)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long)]
        lng: f64,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the static map URL without fetching it
    Url {
        /// Latitude in decimal degrees
        #[arg(long)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long)]
        lng: f64,

        /// Map zoom level
        #[arg(long, default_value = "15")]
        zoom: u32,

        /// Map size in pixels, WxH
        #[arg(long, default_value = "500x500")]
        size: String,
    },

    /// Display statistics about the shelter catalog
    Catalog,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            lat,
            lng,
            location_url,
            zoom,
            size,
            output,
        } => {
            commands::download::run(
                cli.catalog,
                cli.api_key,
                cli.radius_km,
                lat.zip(lng),
                location_url,
                zoom,
                size,
                output,
            )
            .await
        }
        Commands::Filter { lat, lng, json } => {
            commands::filter::run(cli.catalog, cli.radius_km, lat, lng, json)
        }
        Commands::Url {
            lat,
            lng,
            zoom,
            size,
        } => commands::url::run(cli.catalog, cli.api_key, cli.radius_km, lat, lng, zoom, size),
        Commands::Catalog => commands::catalog::run(cli.catalog),
    }
}
