//! # Back-Office Entry Point
//!
//! Bootstraps the retail back-office headlessly: logging, configuration,
//! database, then a summary of what was loaded.
//!
//! ## Environment
//! - `BACKOFFICE_DATABASE_PATH` - SQLite file (default: platform data dir)
//! - `BACKOFFICE_OFFLINE=1` - skip the database entirely
//! - `RUST_LOG` - log filter

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match backoffice_app::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("backoffice: {}", e);
            ExitCode::FAILURE
        }
    }
}
