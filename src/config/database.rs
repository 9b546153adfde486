//! Database configuration module for the stock ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to generate SQL from the entity models,
//! ensuring that the database schema matches the Rust struct definitions without
//! requiring manual SQL.

use crate::config::LedgerConfig;
use crate::entities::{AuditEntry, InboundMovement, Item, OutboundMovement};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database named by the supplied configuration.
pub async fn create_connection(config: &LedgerConfig) -> Result<DatabaseConnection> {
    Database::connect(&config.database_url)
        .await
        .map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation.
///
/// Creates tables for items, inbound movements, outbound movements, and audit
/// entries. Intended for first boot and for in-memory test databases.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let item_table = schema.create_table_from_entity(Item);
    let inbound_table = schema.create_table_from_entity(InboundMovement);
    let outbound_table = schema.create_table_from_entity(OutboundMovement);
    let audit_table = schema.create_table_from_entity(AuditEntry);

    db.execute(builder.build(&item_table)).await?;
    db.execute(builder.build(&inbound_table)).await?;
    db.execute(builder.build(&outbound_table)).await?;
    db.execute(builder.build(&audit_table)).await?;

    Ok(())
}
