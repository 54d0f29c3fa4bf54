#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI benchmarking a full Microsoft Graph mailbox traversal

use clap::Parser;
use graph_mail_bench::{BenchmarkConfig, BenchmarkReport};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graph-bench")]
#[command(
    about = "Time a depth-first walk of a Microsoft Graph mailbox"
)]
struct Args {
    /// Mailbox owner (overrides GRAPH_USER_ID)
    #[arg(long)]
    user: Option<String>,

    /// Folder id or well-known name to start from (overrides GRAPH_ROOT_FOLDER)
    #[arg(long)]
    folder: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let report = graph_mail_bench::run(&config, |visit| println!("{visit}")).await?;
    print_report(&report);

    Ok(())
}

/// Environment configuration with command-line overrides applied.
fn load_config(args: &Args) -> anyhow::Result<BenchmarkConfig> {
    dotenvy::dotenv().ok();

    let config = BenchmarkConfig::from_lookup(|key| match key {
        "GRAPH_USER_ID" if args.user.is_some() => args.user.clone(),
        "GRAPH_ROOT_FOLDER" if args.folder.is_some() => args.folder.clone(),
        _ => std::env::var(key).ok(),
    })?;
    Ok(config)
}

fn print_report(report: &BenchmarkReport) {
    info!(
        "{} folders, {} pages, {} messages, {} folders skipped",
        report.stats.folders,
        report.stats.pages,
        report.stats.messages,
        report.stats.skipped_folders
    );

    println!("memory usage {}", report.memory_in_use);
    println!("memory delta {}", report.memory_delta);
    println!("time: {:?}", report.elapsed);
    println!("done.");
}
