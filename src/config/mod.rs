/// Database connection and table creation
pub mod database;

/// Environment-driven ledger settings
pub mod settings;

pub use settings::LedgerConfig;

/// Initializes `tracing` with an `EnvFilter`, defaulting to `info`.
///
/// Safe to call more than once; later calls are no-ops. Intended for the
/// boundary binary or integration tests, never called implicitly by the core.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
