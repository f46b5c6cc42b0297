use std::net::SocketAddr;
use std::process::ExitCode;
use std::str::FromStr;

use bikeshare_status::catalog::StationStatusCatalog;
use bikeshare_status::config::AppConfig;
use bikeshare_status::domain::{Snapshot, StationDirectory};
use bikeshare_status::web::{self, AppState};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: bikeshare-status [report|feeds|serve]

  report  print a station availability report (default)
  feeds   list the feeds the system publishes
  serve   run the JSON API on BIND_ADDR";

/// How many stations the report shows in detail.
const SAMPLE_STATIONS: usize = 3;

/// How many stations the report ranks by bikes available.
const TOP_STATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Report,
    Feeds,
    Serve,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "report" => Ok(Command::Report),
            "feeds" => Ok(Command::Feeds),
            "serve" => Ok(Command::Serve),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let command = match (args.next(), args.next()) {
        (None, _) => Command::Report,
        (Some(arg), None) => match arg.parse() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}\n\n{USAGE}");
                return ExitCode::from(2);
            }
        },
        (Some(_), Some(extra)) => {
            eprintln!("unexpected argument: {extra}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let catalog = match StationStatusCatalog::from_config(config.gbfs.clone()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: failed to create GBFS client: {e}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Report => report(&catalog, config.report_min_bikes).await,
        Command::Feeds => feeds(&catalog).await,
        Command::Serve => serve(catalog, config.bind_addr).await,
    }
}

async fn report(catalog: &StationStatusCatalog, min_bikes: u32) -> ExitCode {
    let snapshot = match catalog.try_fetch_snapshot().await {
        Ok(snapshot) if !snapshot.is_empty() => snapshot,
        Ok(_) => {
            println!("The feed lists no stations.");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Could not fetch station data: {e}");
            return ExitCode::FAILURE;
        }
    };

    let directory = catalog.fetch_station_directory().await;
    print_report(&snapshot, &directory, min_bikes);
    ExitCode::SUCCESS
}

fn print_report(snapshot: &Snapshot, directory: &StationDirectory, min_bikes: u32) {
    let updated = snapshot
        .last_updated_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let summary = snapshot.summary();

    println!("Data updated: {updated}");
    println!("Total stations: {}", summary.station_count);
    println!();
    println!(
        "Operational stations: {} of {}",
        summary.operational_count, summary.station_count
    );
    println!(
        "Stations with at least {min_bikes} bikes: {}",
        snapshot.with_min_bikes(min_bikes).count()
    );
    println!(
        "Bikes available: {} total, {:.1} per station (min {}, max {})",
        summary.total_bikes,
        summary.mean_bikes.unwrap_or_default(),
        summary.min_bikes.unwrap_or_default(),
        summary.max_bikes.unwrap_or_default()
    );

    println!();
    println!("Sample stations:");
    for station in snapshot.stations.iter().take(SAMPLE_STATIONS) {
        println!();
        println!("{station}");
        if let Some(name) = directory.name_of(&station.station_id) {
            println!("  {name}");
        }
        for (vehicle_type, count) in station.bikes_by_type() {
            println!("  - {vehicle_type}: {count} available");
        }
    }

    println!();
    println!("Top {TOP_STATIONS} stations by bikes available:");
    for (rank, station) in snapshot.top_by_bikes(TOP_STATIONS).into_iter().enumerate() {
        let label = directory
            .name_of(&station.station_id)
            .unwrap_or(station.station_id.as_str());
        println!(
            "  {:>2}. {:<40} {:>3} bikes",
            rank + 1,
            label,
            station.bikes_available
        );
    }
}

async fn feeds(catalog: &StationStatusCatalog) -> ExitCode {
    let client = catalog.client();
    let feeds = match client.fetch_feeds().await {
        Ok(feeds) => feeds,
        Err(e) => {
            eprintln!("Could not fetch feed list: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rule = "-".repeat(50);
    println!("{}", "=".repeat(50));
    println!("GBFS feeds ({})", client.config().discovery_url());
    println!("{}", "=".repeat(50));
    println!("Available feeds: {}", feeds.len());
    println!("{rule}");
    for feed in &feeds {
        println!("Name: {}", feed.name);
        println!("URL: {}", feed.url);
        println!("{rule}");
    }

    ExitCode::SUCCESS
}

async fn serve(catalog: StationStatusCatalog, addr: SocketAddr) -> ExitCode {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Error: failed to bind {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        %addr,
        feed = %catalog.client().config().station_status_url(),
        "station status API listening"
    );
    println!("API Endpoints:");
    println!("  GET  /health");
    println!("  GET  /ip");
    println!("  GET  /api/stations");
    println!("  GET  /api/stations/operational");
    println!("  GET  /api/stations/available?min_bikes=N");
    println!("  GET  /api/stations/{{id}}");
    println!("  GET  /api/summary");
    println!("  GET  /api/feeds");

    match web::serve(listener, AppState::new(catalog)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: server failed: {e}");
            ExitCode::FAILURE
        }
    }
}
