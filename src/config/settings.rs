//! Environment-driven configuration for the ledger.
//!
//! Settings come from the process environment (a `.env` file is honored via
//! `dotenvy` but never required). There is no process-wide mutable state here:
//! the loaded config is plain data handed explicitly to whatever needs it.

use crate::errors::{Error, Result};
use std::time::Duration;

/// Default bound on waiting for a per-item write lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime settings for the ledger core.
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// SeaORM connection URL, e.g. `sqlite://data/stock_ledger.sqlite`
    pub database_url: String,
    /// How long a write may wait for its per-item lock before failing `Busy`
    pub lock_timeout: Duration,
}

impl LedgerConfig {
    /// Loads configuration from the environment.
    ///
    /// `DATABASE_URL` falls back to a local SQLite file;
    /// `LEDGER_LOCK_TIMEOUT_MS` falls back to [`DEFAULT_LOCK_TIMEOUT`].
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/stock_ledger.sqlite".to_string());

        let lock_timeout = match std::env::var("LEDGER_LOCK_TIMEOUT_MS") {
            Ok(raw) => {
                let millis: u64 = raw.parse().map_err(|_| Error::Config {
                    message: format!("LEDGER_LOCK_TIMEOUT_MS must be an integer, got '{raw}'"),
                })?;
                Duration::from_millis(millis)
            }
            Err(_) => DEFAULT_LOCK_TIMEOUT,
        };

        Ok(Self {
            database_url,
            lock_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lock_timeout_is_bounded() {
        assert!(DEFAULT_LOCK_TIMEOUT >= Duration::from_millis(100));
        assert!(DEFAULT_LOCK_TIMEOUT <= Duration::from_secs(30));
    }
}
