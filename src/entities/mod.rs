//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod audit_entry;
pub mod inbound_movement;
pub mod item;
pub mod outbound_movement;

// Re-export specific types to avoid conflicts
pub use audit_entry::{Column as AuditEntryColumn, Entity as AuditEntry, Model as AuditEntryModel};
pub use inbound_movement::{
    Column as InboundMovementColumn, Entity as InboundMovement, Model as InboundMovementModel,
};
pub use item::{Column as ItemColumn, Entity as Item, Model as ItemModel};
pub use outbound_movement::{
    Column as OutboundMovementColumn, Entity as OutboundMovement, Model as OutboundMovementModel,
};
