use clap::{Parser, Subcommand};
use shared::MapStyle;

#[derive(Debug, Parser)]
#[command(about = "Weathermap CLI.")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve render payloads over HTTP
    Http {
        #[arg(env = "WEATHERMAP_SERVER_ADDRESS", default_value = "127.0.0.1:3000")]
        address: std::net::SocketAddr,
    },
    /// Fetch a region once and print its render payload as JSON
    Snapshot(SnapshotArgs),
    /// List known regions and their cities
    Regions,
}

#[derive(Debug, Parser)]
pub struct SnapshotArgs {
    #[arg(long, default_value = "japan")]
    pub region: String,
    /// Basemap override (light, dark, road, satellite)
    #[arg(long)]
    pub style: Option<MapStyle>,
    /// Local hour used for the day/night basemap, defaults to now
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: Option<u32>,
}
