use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lightning_tracker_service::config::DEFAULT_GEOCODE_API_URL;
use lightning_tracker_service::export::export_results;
use lightning_tracker_service::geocode_fetcher::OneMapClient;
use lightning_tracker_service::services::{BatchRunner, GeocodeService};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "batch-geocode")]
#[command(about = "Geocode Singapore postal codes, addresses and building names to CSV", long_about = None)]
struct Cli {
    /// Queries to geocode (postal codes, addresses or building names)
    queries: Vec<String>,

    /// File with one query per line; blank lines are ignored
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pause between lookups in milliseconds
    #[arg(long, env = "BATCH_DELAY_MS", default_value = "500")]
    delay_ms: u64,

    /// OneMap search endpoint
    #[arg(long, env = "GEOCODE_API_URL", default_value = DEFAULT_GEOCODE_API_URL)]
    geocode_url: String,

    /// HTTP timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
    timeout_secs: u64,

    /// Output CSV path (default: singapore_geocoding_results_<timestamp>.csv)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn read_queries(cli: &Cli) -> Result<Vec<String>, std::io::Error> {
    let mut queries = cli.queries.clone();
    if let Some(path) = &cli.file {
        let contents = std::fs::read_to_string(path)?;
        queries.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }
    Ok(queries)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let queries = read_queries(&cli)?;
    if queries.is_empty() {
        return Err("no queries given; pass them as arguments or with --file".into());
    }

    let client = OneMapClient::new(cli.geocode_url.clone(), Duration::from_secs(cli.timeout_secs))?;
    let runner = BatchRunner::new(
        GeocodeService::new(client),
        Duration::from_millis(cli.delay_ms),
    );

    let pb = ProgressBar::new(queries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let report = runner
        .run_with_progress(&queries, |_, result| {
            let marker = if result.success { "ok" } else { "failed" };
            pb.set_message(format!("{} ({})", result.query, marker));
            pb.inc(1);
        })
        .await;

    pb.finish_with_message(format!(
        "{} successful, {} failed",
        report.successful, report.failed
    ));

    let path = export_results(&report.results, cli.output.as_deref())?;
    info!("Wrote {} rows to {}", report.total(), path.display());

    println!(
        "Successful: {}/{} ({:.1}%)",
        report.successful,
        report.total(),
        report.success_rate()
    );
    println!("Failed: {}/{}", report.failed, report.total());
    println!("Results exported to: {}", path.display());

    Ok(())
}
