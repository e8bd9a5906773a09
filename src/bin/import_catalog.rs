//! Imports the catalog spreadsheets (exported as CSV) into the database.

use clap::Parser;
use dotenvy::dotenv;
use furniture_catalog::{
    config::{database, import::load_config},
    errors::Result,
    import, logging,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "import_catalog")]
#[command(about = "Normalize the catalog spreadsheets and load them into the database")]
struct Args {
    /// Path to the import TOML configuration
    #[arg(short, long, default_value = "import.toml")]
    config: PathBuf,

    /// Write the normalized tables as CSV files into this directory
    #[arg(long, value_name = "DIR")]
    write_csv: Option<PathBuf>,

    /// Delete existing catalog rows before loading
    #[arg(long)]
    replace: bool,

    /// Normalize (and optionally write CSV) without touching the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_tracing("info");
    dotenv().ok();

    let config = load_config(&args.config)
        .inspect_err(|e| error!("Failed to load {}: {}", args.config.display(), e))?;
    let catalog = import::prepare(&config).inspect_err(|e| error!("Import failed: {}", e))?;

    if let Some(dir) = args.write_csv.as_ref().or(config.output_dir.as_ref()) {
        import::write_csv(&catalog, dir)
            .inspect_err(|e| error!("Failed to write CSV to {}: {}", dir.display(), e))?;
    }

    if args.dry_run {
        info!("Dry run, database left untouched");
        return Ok(());
    }

    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    let summary = import::load_catalog(&db, &catalog, args.replace)
        .await
        .inspect_err(|e| error!("Failed to load catalog: {}", e))?;
    info!("Done: {summary}");
    Ok(())
}
