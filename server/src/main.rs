use clap::Parser;
use cli::{Cli, Command};
use shared::SnapshotPipeline;
use std::sync::Arc;

use config::config;
use open_meteo::OpenMeteoSource;
use snapshots::SnapshotService;

mod cache;
mod cli;
mod config;
mod open_meteo;
mod regions;
mod server;
mod snapshots;
mod source;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Cli::parse();

    match args.cmd {
        Command::Http { address } => {
            let service = Arc::new(build_service()?);
            server::run(address, service).await;
        }
        Command::Snapshot(snapshot_args) => {
            let service = build_service()?;
            let snapshot = service
                .snapshot(&snapshot_args.region, snapshot_args.style, snapshot_args.hour)
                .await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Regions => {
            for region in regions::all() {
                let names: Vec<&str> = region.cities.iter().map(|c| c.name.as_str()).collect();
                println!("{}\t{}\t{}", region.key, region.name, names.join(", "));
            }
        }
    }

    Ok(())
}

fn build_service() -> anyhow::Result<SnapshotService> {
    let config = config();
    let source = OpenMeteoSource::new(
        &config.provider_url,
        &config.timezone,
        config.request_timeout(),
    )?;

    Ok(SnapshotService::new(
        Arc::new(source),
        config.cache_ttl(),
        SnapshotPipeline::default(),
        config.utc_offset()?,
    ))
}
