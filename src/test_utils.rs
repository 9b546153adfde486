//! Shared test utilities for the stock ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{item, ledger::LedgerEngine, principal::Principal},
    entities,
    errors::Result,
    requests::{InboundDraft, NewItem, OutboundDraft},
};
use sea_orm::DatabaseConnection;

/// Default non-admin principal stamped onto test writes.
pub const TEST_ACTOR: Principal = Principal::new(7, false);

/// Admin principal for tests that need a second, privileged actor.
pub const TEST_ADMIN: Principal = Principal::new(1, true);

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    // A SQLite in-memory database exists per connection, so the pool must not
    // grow beyond one or queries would land on empty databases.
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test catalog item with the given code and name.
pub async fn create_test_item(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
) -> Result<entities::item::Model> {
    item::create_item(
        db,
        NewItem {
            code: code.to_string(),
            name: name.to_string(),
        },
    )
    .await
}

/// Sets up a test database with one item ("TEC-001" / "Keyboard").
pub async fn setup_with_item() -> Result<(DatabaseConnection, entities::item::Model)> {
    let db = setup_test_db().await?;
    let item = create_test_item(&db, "TEC-001", "Keyboard").await?;
    Ok((db, item))
}

/// Sets up a test database, a ledger engine over it, and one item.
/// Returns (db, engine, item) for write-path test scenarios.
pub async fn setup_with_engine() -> Result<(
    DatabaseConnection,
    LedgerEngine,
    entities::item::Model,
)> {
    let (db, item) = setup_with_item().await?;
    let engine = LedgerEngine::new(db.clone());
    Ok((db, engine, item))
}

/// Records an inbound movement with default reference/date, as [`TEST_ACTOR`].
pub async fn record_test_inbound(
    engine: &LedgerEngine,
    item_id: i64,
    quantity: i64,
) -> Result<entities::inbound_movement::Model> {
    engine
        .record_inbound(
            InboundDraft {
                item_id,
                reference_document: "NFe-0001".to_string(),
                quantity,
                received_at: None,
                note: None,
            },
            &TEST_ACTOR,
        )
        .await
}

/// Records an outbound movement with default ticket/destination, as [`TEST_ACTOR`].
pub async fn record_test_outbound(
    engine: &LedgerEngine,
    item_id: i64,
    quantity: i64,
) -> Result<entities::outbound_movement::Model> {
    engine
        .record_outbound(
            OutboundDraft {
                item_id,
                quantity,
                requester_reference: "TICKET-0001".to_string(),
                destination: "Administration".to_string(),
            },
            &TEST_ACTOR,
        )
        .await
}
