//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured catalog database and report row counts.
//! - Keep output deterministic for quick local sanity checks.

use booklib_core::{
    core_version, init_logging_from_config, open_configured, Catalog, CoreConfig, RequestContext,
};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("booklib: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    init_logging_from_config(&config).map_err(|err| err.to_string())?;

    let conn = open_configured(&config).map_err(|err| err.to_string())?;
    let catalog = Catalog::new(&conn);
    let ctx = RequestContext::new();

    let authors = catalog
        .authors
        .get_all_authors(&ctx, "")
        .map_err(|err| err.to_string())?;
    let categories = catalog
        .categories
        .get_all_categories(&ctx, "")
        .map_err(|err| err.to_string())?;
    let published = catalog
        .books
        .get_all_books(&ctx, "")
        .map_err(|err| err.to_string())?;

    info!(
        "event=cli_summary module=cli status=ok request_id={} authors={} categories={} published_books={}",
        ctx.request_id(),
        authors.len(),
        categories.len(),
        published.len()
    );

    println!("booklib_core version={}", core_version());
    println!("authors={}", authors.len());
    println!("categories={}", categories.len());
    println!("published_books={}", published.len());
    Ok(())
}
