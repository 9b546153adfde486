//! Inbound movement entity ("entrada") - a recorded receipt of stock.
//!
//! Each row references an invoice (`reference_document`, the NFe number in the
//! original paperwork) and increases the item's on-hand quantity by `quantity`
//! at creation time. Corrections and deletions re-derive the item quantity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inbound movement database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inbound_movements")]
pub struct Model {
    /// Unique identifier for the movement
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the item this movement belongs to
    pub item_id: i64,
    /// Invoice/NFe number backing the receipt, required free text
    pub reference_document: String,
    /// Received quantity, always positive
    pub quantity: i64,
    /// When the goods were received
    pub received_at: DateTimeUtc,
    /// Optional free-text remark about the delivery
    pub note: Option<String>,
    /// Principal id of the user who recorded the movement
    pub recorded_by: i64,
}

/// Defines relationships between `InboundMovement` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each inbound movement belongs to one item
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
