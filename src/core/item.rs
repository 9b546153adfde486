//! Item catalog business logic.
//!
//! Provides functions for creating, retrieving, updating, and deleting catalog
//! items. None of these operations touch `quantity_on_hand` - that column is
//! owned by the ledger engine, which calls [`adjust_quantity_guarded`] inside
//! its movement transactions.

use crate::{
    entities::{Item, item},
    errors::{Error, Result},
    requests::{ItemUpdate, NewItem},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};

/// Creates a new catalog item with zero stock on hand.
///
/// The SKU code and name are trimmed and must be non-empty; a duplicate code
/// fails with [`Error::DuplicateCode`].
pub async fn create_item(db: &DatabaseConnection, new_item: NewItem) -> Result<item::Model> {
    let code = new_item.code.trim().to_string();
    let name = new_item.name.trim().to_string();

    if code.is_empty() {
        return Err(Error::validation("item code cannot be empty"));
    }
    if name.is_empty() {
        return Err(Error::validation("item name cannot be empty"));
    }

    if get_item_by_code(db, &code).await?.is_some() {
        return Err(Error::DuplicateCode { code });
    }

    let item = item::ActiveModel {
        code: Set(code),
        name: Set(name),
        quantity_on_hand: Set(0),
        ..Default::default()
    };

    let result = item.insert(db).await?;
    Ok(result)
}

/// Finds an item by its unique ID.
pub async fn get_item(db: &DatabaseConnection, item_id: i64) -> Result<Option<item::Model>> {
    Item::find_by_id(item_id).one(db).await.map_err(Into::into)
}

/// Finds an item by its SKU code.
pub async fn get_item_by_code(db: &DatabaseConnection, code: &str) -> Result<Option<item::Model>> {
    Item::find()
        .filter(item::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the full catalog, in stable order by SKU code.
pub async fn list_items(db: &DatabaseConnection) -> Result<Vec<item::Model>> {
    Item::find()
        .order_by_asc(item::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates an item's code and/or name.
///
/// Fails with [`Error::ItemNotFound`] if the item is absent, and with
/// [`Error::DuplicateCode`] when renaming onto a code another item holds.
pub async fn update_item(
    db: &DatabaseConnection,
    item_id: i64,
    update: ItemUpdate,
) -> Result<item::Model> {
    let existing = Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let mut active: item::ActiveModel = existing.clone().into();

    if let Some(code) = update.code {
        let code = code.trim().to_string();
        if code.is_empty() {
            return Err(Error::validation("item code cannot be empty"));
        }
        if code != existing.code {
            if let Some(other) = get_item_by_code(db, &code).await? {
                if other.id != item_id {
                    return Err(Error::DuplicateCode { code });
                }
            }
            active.code = Set(code);
        }
    }

    if let Some(name) = update.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("item name cannot be empty"));
        }
        active.name = Set(name);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes an item, provided no movement references it.
///
/// The referential guard keeps the audit trail reconstructible: an item with
/// history must keep its movements (or have them removed first). Audit entries
/// alone do not block deletion - they carry their own name snapshot.
pub async fn delete_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let item = Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let inbound = crate::entities::InboundMovement::find()
        .filter(crate::entities::InboundMovementColumn::ItemId.eq(item_id))
        .count(db)
        .await?;
    let outbound = crate::entities::OutboundMovement::find()
        .filter(crate::entities::OutboundMovementColumn::ItemId.eq(item_id))
        .count(db)
        .await?;

    let movements = inbound + outbound;
    if movements > 0 {
        return Err(Error::ItemInUse {
            id: item_id,
            movements,
        });
    }

    item.delete(db).await?;
    Ok(())
}

/// Applies a signed quantity delta to an item, guarded against going negative.
///
/// A single conditional UPDATE keeps the check and the write in one statement:
/// `SET quantity_on_hand = quantity_on_hand + delta WHERE id = ? AND
/// quantity_on_hand >= -delta`. Zero rows affected means the guard failed (or
/// the item vanished), so the caller's surrounding transaction can abort with
/// nothing applied.
pub async fn adjust_quantity_guarded<C>(db: &C, item_id: i64, delta: i64) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let updated = Item::update_many()
        .col_expr(
            item::Column::QuantityOnHand,
            Expr::col(item::Column::QuantityOnHand).add(delta),
        )
        .filter(item::Column::Id.eq(item_id))
        .filter(item::Column::QuantityOnHand.gte(-delta))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        let current = Item::find_by_id(item_id)
            .one(db)
            .await?
            .ok_or(Error::ItemNotFound { id: item_id })?;
        return Err(Error::InsufficientStock {
            on_hand: current.quantity_on_hand,
            requested: -delta,
        });
    }

    Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })
}
