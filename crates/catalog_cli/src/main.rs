//! CLI probe for `catalog_core`.
//!
//! # Responsibility
//! - Load configuration, start logging, open the catalog and compose the
//!   services once.
//! - Print a deterministic summary for quick local sanity checks.

use catalog_core::db::open_db;
use catalog_core::{init_logging, Catalog, CatalogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CatalogConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("catalog logging disabled: {err}");
        }
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("catalog error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CatalogConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("catalog_core ping={}", catalog_core::ping());
    println!("catalog_core version={}", catalog_core::core_version());

    let conn = open_db(&config.db_path)?;
    let catalog = Catalog::new(&conn)?;
    let summary = catalog.summary()?;
    println!("catalog db={}", config.db_path.display());
    println!(
        "catalog authors={} categories={} publishers={} books={}",
        summary.authors, summary.categories, summary.publishers, summary.books
    );
    Ok(())
}
