use std::path::PathBuf;

use liqwatch_runner::{AlertMonitor, MonitorConfig};
use log::info;
use tokio::io::BufReader;

fn print_help() {
    eprintln!(
        r#"liqwatch - liquidation and large-trade alert monitor

Reads Binance USD-M futures frames (forceOrder, aggTrade), one JSON
object per line, and alerts on events crossing the configured notional
tiers.

USAGE:
    liqwatch [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --input <PATH>      Read frames from a file instead of stdin
    --workers <N>       Number of worker tasks (overrides config)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Pipe a live stream through
    websocat wss://fstream.binance.com/ws/!forceOrder@arr | liqwatch

    # Replay a capture with custom tiers
    liqwatch --config tiers.json --input capture.jsonl
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut input_path: Option<PathBuf> = None;
    let mut workers: Option<usize> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--input" | "-i" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --input requires a path argument");
                    std::process::exit(1);
                }
                input_path = Some(PathBuf::from(&args[i]));
            }
            "--workers" | "-w" => {
                i += 1;
                match args.get(i).and_then(|n| n.parse().ok()) {
                    Some(n) => workers = Some(n),
                    None => {
                        eprintln!("Error: --workers requires a positive number");
                        std::process::exit(1);
                    }
                }
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            MonitorConfig::from_file(&path)?
        }
        None => {
            info!("Using default configuration");
            MonitorConfig::default()
        }
    };
    if let Some(n) = workers {
        config.workers = n;
    }

    for tier in &config.engine.tiers {
        info!("Tier {}: >= {} USDT", tier.name, tier.min_notional);
    }

    let monitor = AlertMonitor::new(config)?;

    let summary = match input_path {
        Some(path) => {
            info!("Reading frames from {}", path.display());
            let file = tokio::fs::File::open(&path).await?;
            monitor.run(BufReader::new(file)).await?
        }
        None => {
            info!("Reading frames from stdin");
            monitor.run(BufReader::new(tokio::io::stdin())).await?
        }
    };

    println!("{}", summary);
    Ok(())
}
