//! Item entity - one row per stock-keeping unit.
//!
//! `quantity_on_hand` is owned exclusively by the ledger engine: it is only ever
//! changed together with a movement insert/update/delete inside one transaction,
//! so it always equals the fold of the item's surviving movement history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier for the item, immutable after creation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-assigned SKU code (e.g. `"TEC-001"`), unique across the catalog
    #[sea_orm(unique)]
    pub code: String,
    /// Human-readable item name
    pub name: String,
    /// Current stock level; never negative, derived from the movement history
    pub quantity_on_hand: i64,
}

/// Defines relationships between Item and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One item has many inbound movements
    #[sea_orm(has_many = "super::inbound_movement::Entity")]
    InboundMovements,
    /// One item has many outbound movements
    #[sea_orm(has_many = "super::outbound_movement::Entity")]
    OutboundMovements,
}

impl Related<super::inbound_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InboundMovements.def()
    }
}

impl Related<super::outbound_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutboundMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
