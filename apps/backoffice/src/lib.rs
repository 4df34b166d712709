//! # backoffice-app: Retail Back-Office Orchestration
//!
//! The caller of the retail core: it gates every mutation on the account's
//! permissions, runs the core operation in memory, then persists the result
//! and its activity events on a best-effort basis.
//!
//! ## Module Organization
//! ```text
//! backoffice_app/
//! ├── lib.rs          ◄─── You are here (logging, bootstrap, run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Optional database wrapper
//! │   ├── retail.rs   ◄─── Session + sales + clients + catalog
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Permission gate, activity writer
//! │   ├── sale.rs     ◄─── Sale form and sale commands
//! │   ├── client.rs   ◄─── Client form and client commands
//! │   └── catalog.rs  ◄─── Catalog snapshot
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let app = backoffice_app::bootstrap(ConfigState::from_env()).await?;
//!
//! commands::sale::set_entry_sku(&app.retail, "SKU123");
//! commands::sale::add_line(&app.retail)?;
//! commands::sale::register_sale(&actor, &app.db, &app.retail).await?;
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use backoffice_core::{ClientDirectory, InMemoryCatalog, SaleBook, Session};
use backoffice_db::{Database, DbConfig};
use error::ApiError;
use state::{ConfigState, DbState, Retail, RetailState};

/// Everything a running back-office holds.
#[derive(Debug, Clone)]
pub struct Backoffice {
    pub config: ConfigState,
    pub db: DbState,
    pub retail: RetailState,
}

impl Backoffice {
    /// Builds the app around an already opened (or absent) database,
    /// loading clients, sales and the catalog from it.
    pub async fn load(config: ConfigState, db: DbState) -> Result<Self, ApiError> {
        let retail = match db.inner() {
            Some(database) => load_retail(database).await?,
            None => Retail::default(),
        };

        Ok(Backoffice {
            config,
            db,
            retail: RetailState::from_retail(retail),
        })
    }
}

/// Opens the configured database and loads the retail workspace from it.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. offline configured?        yes ──► empty workspace, no database     │
/// │  2. resolve database path      explicit path or platform data dir       │
/// │  3. connect + migrate          failure ──► warn, continue offline       │
/// │  4. load clients, sales,       failure ──► DATABASE_ERROR               │
/// │     catalog                                                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn bootstrap(config: ConfigState) -> Result<Backoffice, ApiError> {
    let db = open_database(&config).await;
    Backoffice::load(config, db).await
}

/// Headless entry point: bootstraps and reports what was loaded.
pub async fn run() -> Result<(), ApiError> {
    init_tracing();

    let config = ConfigState::from_env();
    info!(store = %config.store_name, "Starting retail back-office");

    let app = bootstrap(config).await?;
    let (clients, summary) = app
        .retail
        .with_retail(|r| (r.clients.len(), r.sales.summary()));

    info!(
        online = app.db.is_online(),
        clients,
        sales = summary.count,
        revenue = %app.config.format_currency(summary.revenue),
        paid = summary.paid,
        delivered = summary.delivered,
        "Back-office ready"
    );

    if let Some(database) = app.db.inner() {
        database.close().await;
    }
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=backoffice_core=trace` - Trace the core managers only
/// - Default: INFO, with the back-office crates at DEBUG
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,backoffice_app=debug,backoffice_core=debug,sqlx=warn")
    });

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn open_database(config: &ConfigState) -> DbState {
    if config.offline {
        info!("Offline mode, running in memory");
        return DbState::offline();
    }

    let path = config.resolve_database_path();
    info!(?path, "Database path determined");

    match Database::new(DbConfig::new(path)).await {
        Ok(database) => {
            info!("Database connected and migrations applied");
            DbState::new(database)
        }
        Err(e) => {
            warn!(error = %e, "Database unavailable, running in memory");
            DbState::offline()
        }
    }
}

async fn load_retail(database: &Database) -> Result<Retail, ApiError> {
    let clients = database.clients().list().await?;
    let sales = database.sales().list().await?;
    let catalog = database.catalog().list().await?;

    info!(
        clients = clients.len(),
        sales = sales.len(),
        catalog = catalog.len(),
        "Retail data loaded"
    );

    Ok(Retail {
        session: Session::new(),
        sales: SaleBook::from_sales(sales),
        clients: ClientDirectory::from_clients(clients),
        catalog: InMemoryCatalog::new(catalog),
    })
}
