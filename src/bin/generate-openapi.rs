use clap::Parser;
use lightning_tracker_service::api::write_openapi_spec;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "generate-openapi")]
#[command(about = "Write the service's OpenAPI document as JSON", long_about = None)]
struct Cli {
    /// Destination file
    #[arg(long, default_value = "openapi.json")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = write_openapi_spec(&cli.output)?;
    println!("Generated {} ({} paths)", cli.output.display(), paths);

    Ok(())
}
