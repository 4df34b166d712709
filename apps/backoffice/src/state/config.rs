//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BACKOFFICE_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use backoffice_core::Money;

/// File name of the SQLite database inside the data directory.
pub const DATABASE_FILE: &str = "backoffice.db";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown in logs and reports)
    pub store_name: String,

    /// Explicit database file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Run purely in memory, without opening a database.
    pub offline: bool,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "Back-Office Dev Store".to_string(),
            database_path: None,
            offline: false,
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `BACKOFFICE_STORE_NAME`: Override store name
    /// - `BACKOFFICE_DATABASE_PATH`: Use this SQLite file
    /// - `BACKOFFICE_OFFLINE`: `1` or `true` skips the database entirely
    /// - `BACKOFFICE_CURRENCY_SYMBOL`: Override the currency symbol
    pub fn from_env() -> Self {
        let mut config = ConfigState::default();

        if let Ok(store_name) = std::env::var("BACKOFFICE_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(path) = std::env::var("BACKOFFICE_DATABASE_PATH") {
            if !path.trim().is_empty() {
                config.database_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(offline) = std::env::var("BACKOFFICE_OFFLINE") {
            config.offline = parse_flag(&offline);
        }

        if let Ok(symbol) = std::env::var("BACKOFFICE_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// The database file to open.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.backoffice.retail/backoffice.db`
    /// - **Windows**: `%APPDATA%\backoffice\retail\data\backoffice.db`
    /// - **Linux**: `~/.local/share/retail/backoffice.db`
    ///
    /// Falls back to `./backoffice.db` when no data directory can be found
    /// or created.
    pub fn resolve_database_path(&self) -> PathBuf {
        if let Some(path) = &self.database_path {
            return path.clone();
        }

        ProjectDirs::from("com", "backoffice", "retail")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .filter(|dir| std::fs::create_dir_all(dir).is_ok())
            .map(|dir| dir.join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }

    /// Formats an amount with the configured symbol and decimals.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();
        let sign = if cents < 0 { "-" } else { "" };

        if self.currency_decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.currency_symbol,
                whole,
                frac,
                width = self.currency_decimals as usize
            )
        } else {
            format!("{}{}{}", sign, self.currency_symbol, whole)
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true")
}
