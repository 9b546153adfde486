//! Outbound movement entity ("saída") - a recorded issuance of stock.
//!
//! Created only when the item has enough on hand; the availability check and the
//! quantity decrement happen atomically with the insert, so a committed row always
//! corresponds to stock that actually existed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Outbound movement database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "outbound_movements")]
pub struct Model {
    /// Unique identifier for the movement
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the item this movement belongs to
    pub item_id: i64,
    /// Issued quantity, always positive
    pub quantity: i64,
    /// Ticket or asset tag identifying the request that justified the issuance
    pub requester_reference: String,
    /// Department/unit the stock was issued to
    pub destination: String,
    /// When the issuance was recorded
    pub issued_at: DateTimeUtc,
    /// Principal id of the user who recorded the movement
    pub recorded_by: i64,
}

/// Defines relationships between `OutboundMovement` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each outbound movement belongs to one item
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
