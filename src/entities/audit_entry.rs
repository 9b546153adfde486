//! Audit entry entity - append-only history of committed quantity changes.
//!
//! One row per committed movement, correction, or reversal. Rows are never
//! updated or deleted; `item_name` is a snapshot so the trail stays readable
//! after an item is renamed or removed, which is also why there is no hard
//! foreign key back to the items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `"INBOUND"` or `"OUTBOUND"`
    pub movement_kind: String,
    /// Item the change applied to (soft reference, survives item deletion)
    pub item_id: i64,
    /// Item name at the time of the change
    pub item_name: String,
    /// Signed quantity change applied to the item
    pub quantity_delta: i64,
    /// When the change was committed
    pub occurred_at: DateTimeUtc,
    /// Principal id of the actor, None for system-initiated changes
    pub actor: Option<i64>,
    /// Free-text detail (invoice reference, destination, correction note)
    pub detail: String,
}

/// `AuditEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
