//! Ledger engine - the invariant-preserving movement write path.
//!
//! Every write follows the same shape: validate the draft, take the per-item
//! write lock (bounded wait), open one database transaction, load the item,
//! apply movement row + guarded quantity update + audit entry together, commit.
//! Any failure drops the transaction, so no partial state (a movement without
//! its quantity update, or either without its audit row) is ever observable.
//!
//! The engine protects one invariant above all: an item's `quantity_on_hand`
//! always equals the fold of its surviving movement history, and never goes
//! negative.

use crate::{
    core::{item::adjust_quantity_guarded, locks::ItemLocks, principal::Principal},
    entities::{
        InboundMovement, Item, OutboundMovement, audit_entry, inbound_movement, item,
        outbound_movement,
    },
    errors::{Error, Result},
    requests::{InboundDraft, MovementKind, MovementUpdate, OutboundDraft},
};
use sea_orm::entity::prelude::DateTimeUtc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Either kind of committed movement, as returned by correction calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Movement {
    /// A receipt of stock
    Inbound(inbound_movement::Model),
    /// An issuance of stock
    Outbound(outbound_movement::Model),
}

/// The single write path into the movement store.
///
/// Cheap to clone: clones share the connection pool and the lock registry, so
/// concurrent request handlers hold clones and still serialize per item.
#[derive(Clone, Debug)]
pub struct LedgerEngine {
    db: DatabaseConnection,
    locks: ItemLocks,
    lock_timeout: Duration,
}

impl LedgerEngine {
    /// Creates an engine over an open connection with the default lock timeout.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            locks: ItemLocks::new(),
            lock_timeout: crate::config::settings::DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Overrides the bound on waiting for a per-item write lock.
    #[must_use]
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// The underlying connection, for the lock-free read paths.
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Records a receipt of stock and increments the item's on-hand quantity.
    ///
    /// `received_at` defaults to the current instant when the draft leaves it
    /// unset. Emits one audit entry with `quantity_delta = +quantity`.
    pub async fn record_inbound(
        &self,
        draft: InboundDraft,
        actor: &Principal,
    ) -> Result<inbound_movement::Model> {
        draft.validate()?;

        let _guard = self.locks.acquire(draft.item_id, self.lock_timeout).await?;
        let txn = self.db.begin().await?;

        let item = Item::find_by_id(draft.item_id)
            .one(&txn)
            .await?
            .ok_or(Error::ItemNotFound { id: draft.item_id })?;

        let now = chrono::Utc::now();
        let movement = inbound_movement::ActiveModel {
            item_id: Set(draft.item_id),
            reference_document: Set(draft.reference_document.trim().to_string()),
            quantity: Set(draft.quantity),
            received_at: Set(draft.received_at.unwrap_or(now)),
            note: Set(draft.note),
            recorded_by: Set(actor.id),
            ..Default::default()
        };
        let movement = movement.insert(&txn).await?;

        adjust_quantity_guarded(&txn, item.id, draft.quantity).await?;

        append_audit(
            &txn,
            MovementKind::Inbound,
            &item,
            draft.quantity,
            Some(actor.id),
            format!("received against {}", movement.reference_document),
            now,
        )
        .await?;

        txn.commit().await?;
        debug!(
            item_id = item.id,
            quantity = draft.quantity,
            actor = actor.id,
            "inbound movement committed"
        );
        Ok(movement)
    }

    /// Records an issuance of stock, gated by availability.
    ///
    /// The availability check runs inside the per-item critical section, so two
    /// concurrent issuances can never both pass it against a stale quantity. A
    /// rejected request leaves no movement row, no audit row, and an unchanged
    /// quantity.
    pub async fn record_outbound(
        &self,
        draft: OutboundDraft,
        actor: &Principal,
    ) -> Result<outbound_movement::Model> {
        draft.validate()?;

        let _guard = self.locks.acquire(draft.item_id, self.lock_timeout).await?;
        let txn = self.db.begin().await?;

        let item = Item::find_by_id(draft.item_id)
            .one(&txn)
            .await?
            .ok_or(Error::ItemNotFound { id: draft.item_id })?;

        if item.quantity_on_hand < draft.quantity {
            return Err(Error::InsufficientStock {
                on_hand: item.quantity_on_hand,
                requested: draft.quantity,
            });
        }

        let now = chrono::Utc::now();
        let movement = outbound_movement::ActiveModel {
            item_id: Set(draft.item_id),
            quantity: Set(draft.quantity),
            requester_reference: Set(draft.requester_reference.trim().to_string()),
            destination: Set(draft.destination.trim().to_string()),
            issued_at: Set(now),
            recorded_by: Set(actor.id),
            ..Default::default()
        };
        let movement = movement.insert(&txn).await?;

        adjust_quantity_guarded(&txn, item.id, -draft.quantity).await?;

        append_audit(
            &txn,
            MovementKind::Outbound,
            &item,
            -draft.quantity,
            Some(actor.id),
            format!(
                "issued to {} ({})",
                movement.destination, movement.requester_reference
            ),
            now,
        )
        .await?;

        txn.commit().await?;
        debug!(
            item_id = item.id,
            quantity = draft.quantity,
            actor = actor.id,
            "outbound movement committed"
        );
        Ok(movement)
    }

    /// Corrects an existing movement, re-deriving the item's quantity.
    ///
    /// The old quantity effect is reversed and the new one applied as a single
    /// guarded delta inside one transaction under the item lock. A correction
    /// that would drive the quantity negative (shrinking a receipt below what
    /// was since issued, or growing an issuance beyond what is on hand) fails
    /// with [`Error::InsufficientStock`] and changes nothing. Every accepted
    /// correction appends its own audit entry carrying the net delta.
    pub async fn correct_movement(
        &self,
        kind: MovementKind,
        movement_id: i64,
        update: MovementUpdate,
        actor: &Principal,
    ) -> Result<Movement> {
        update.validate()?;

        // The movement's item_id is immutable, so it is safe to learn it before
        // taking the lock; existence is re-checked inside the transaction.
        let item_id = self.movement_item_id(kind, movement_id).await?;

        let _guard = self.locks.acquire(item_id, self.lock_timeout).await?;
        let txn = self.db.begin().await?;

        let corrected = match kind {
            MovementKind::Inbound => {
                let movement = InboundMovement::find_by_id(movement_id)
                    .one(&txn)
                    .await?
                    .ok_or(Error::MovementNotFound {
                        kind,
                        id: movement_id,
                    })?;
                let item = load_item(&txn, movement.item_id).await?;

                let new_quantity = update.quantity.unwrap_or(movement.quantity);
                let delta = new_quantity - movement.quantity;
                if delta != 0 {
                    adjust_quantity_guarded(&txn, item.id, delta).await?;
                }

                let mut active: inbound_movement::ActiveModel = movement.into();
                active.quantity = Set(new_quantity);
                if let Some(reference) = update.reference_document {
                    active.reference_document = Set(reference.trim().to_string());
                }
                if let Some(received_at) = update.received_at {
                    active.received_at = Set(received_at);
                }
                if update.note.is_some() {
                    active.note = Set(update.note);
                }
                let corrected = active.update(&txn).await?;

                append_audit(
                    &txn,
                    kind,
                    &item,
                    delta,
                    Some(actor.id),
                    format!("inbound movement {movement_id} corrected"),
                    chrono::Utc::now(),
                )
                .await?;
                Movement::Inbound(corrected)
            }
            MovementKind::Outbound => {
                let movement = OutboundMovement::find_by_id(movement_id)
                    .one(&txn)
                    .await?
                    .ok_or(Error::MovementNotFound {
                        kind,
                        id: movement_id,
                    })?;
                let item = load_item(&txn, movement.item_id).await?;

                let new_quantity = update.quantity.unwrap_or(movement.quantity);
                // An issuance subtracts, so the item delta is old minus new
                let delta = movement.quantity - new_quantity;
                if delta != 0 {
                    adjust_quantity_guarded(&txn, item.id, delta).await?;
                }

                let mut active: outbound_movement::ActiveModel = movement.into();
                active.quantity = Set(new_quantity);
                if let Some(reference) = update.requester_reference {
                    active.requester_reference = Set(reference.trim().to_string());
                }
                if let Some(destination) = update.destination {
                    active.destination = Set(destination.trim().to_string());
                }
                let corrected = active.update(&txn).await?;

                append_audit(
                    &txn,
                    kind,
                    &item,
                    delta,
                    Some(actor.id),
                    format!("outbound movement {movement_id} corrected"),
                    chrono::Utc::now(),
                )
                .await?;
                Movement::Outbound(corrected)
            }
        };

        txn.commit().await?;
        debug!(item_id, movement_id, actor = actor.id, "movement corrected");
        Ok(corrected)
    }

    /// Removes a movement, reversing its quantity effect.
    ///
    /// Deleting a receipt whose stock was since issued would drive the quantity
    /// negative and fails with [`Error::InsufficientStock`]; deleting an
    /// issuance restores its quantity. The reversal appends an audit entry; the
    /// movement's original audit trail is never touched.
    pub async fn delete_movement(
        &self,
        kind: MovementKind,
        movement_id: i64,
        actor: &Principal,
    ) -> Result<()> {
        let item_id = self.movement_item_id(kind, movement_id).await?;

        let _guard = self.locks.acquire(item_id, self.lock_timeout).await?;
        let txn = self.db.begin().await?;

        match kind {
            MovementKind::Inbound => {
                let movement = InboundMovement::find_by_id(movement_id)
                    .one(&txn)
                    .await?
                    .ok_or(Error::MovementNotFound {
                        kind,
                        id: movement_id,
                    })?;
                let item = load_item(&txn, movement.item_id).await?;
                let reversal = -movement.quantity;

                movement.delete(&txn).await?;
                adjust_quantity_guarded(&txn, item.id, reversal).await?;
                append_audit(
                    &txn,
                    kind,
                    &item,
                    reversal,
                    Some(actor.id),
                    format!("inbound movement {movement_id} removed"),
                    chrono::Utc::now(),
                )
                .await?;
            }
            MovementKind::Outbound => {
                let movement = OutboundMovement::find_by_id(movement_id)
                    .one(&txn)
                    .await?
                    .ok_or(Error::MovementNotFound {
                        kind,
                        id: movement_id,
                    })?;
                let item = load_item(&txn, movement.item_id).await?;
                let reversal = movement.quantity;

                movement.delete(&txn).await?;
                adjust_quantity_guarded(&txn, item.id, reversal).await?;
                append_audit(
                    &txn,
                    kind,
                    &item,
                    reversal,
                    Some(actor.id),
                    format!("outbound movement {movement_id} removed"),
                    chrono::Utc::now(),
                )
                .await?;
            }
        }

        txn.commit().await?;
        debug!(item_id, movement_id, actor = actor.id, "movement removed");
        Ok(())
    }

    async fn movement_item_id(&self, kind: MovementKind, movement_id: i64) -> Result<i64> {
        let item_id = match kind {
            MovementKind::Inbound => InboundMovement::find_by_id(movement_id)
                .one(&self.db)
                .await?
                .map(|m| m.item_id),
            MovementKind::Outbound => OutboundMovement::find_by_id(movement_id)
                .one(&self.db)
                .await?
                .map(|m| m.item_id),
        };
        item_id.ok_or(Error::MovementNotFound {
            kind,
            id: movement_id,
        })
    }
}

async fn load_item<C>(db: &C, item_id: i64) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })
}

async fn append_audit<C>(
    db: &C,
    kind: MovementKind,
    item: &item::Model,
    quantity_delta: i64,
    actor: Option<i64>,
    detail: String,
    occurred_at: DateTimeUtc,
) -> Result<audit_entry::Model>
where
    C: ConnectionTrait,
{
    let entry = audit_entry::ActiveModel {
        movement_kind: Set(kind.as_str().to_string()),
        item_id: Set(item.id),
        item_name: Set(item.name.clone()),
        quantity_delta: Set(quantity_delta),
        occurred_at: Set(occurred_at),
        actor: Set(actor),
        detail: Set(detail),
        ..Default::default()
    };
    entry.insert(db).await.map_err(Into::into)
}

/// Lists inbound movements, newest first, optionally scoped to one item.
pub async fn list_inbound(
    db: &DatabaseConnection,
    item_id: Option<i64>,
) -> Result<Vec<inbound_movement::Model>> {
    let mut query = InboundMovement::find();
    if let Some(item_id) = item_id {
        query = query.filter(inbound_movement::Column::ItemId.eq(item_id));
    }
    query
        .order_by_desc(inbound_movement::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists outbound movements, newest first, optionally scoped to one item.
pub async fn list_outbound(
    db: &DatabaseConnection,
    item_id: Option<i64>,
) -> Result<Vec<outbound_movement::Model>> {
    let mut query = OutboundMovement::find();
    if let Some(item_id) = item_id {
        query = query.filter(outbound_movement::Column::ItemId.eq(item_id));
    }
    query
        .order_by_desc(outbound_movement::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::AuditEntry;
    use crate::test_utils::{
        TEST_ACTOR, create_test_item, record_test_inbound, record_test_outbound,
        setup_with_engine,
    };

    async fn on_hand(engine: &LedgerEngine, item_id: i64) -> i64 {
        crate::core::item::get_item(engine.db(), item_id)
            .await
            .unwrap()
            .unwrap()
            .quantity_on_hand
    }

    #[tokio::test]
    async fn test_inbound_round_trip() -> Result<()> {
        let (db, engine, item) = setup_with_engine().await?;

        let movement = engine
            .record_inbound(
                InboundDraft {
                    item_id: item.id,
                    reference_document: "NFe-4711".to_string(),
                    quantity: 10,
                    received_at: None,
                    note: Some("first delivery".to_string()),
                },
                &TEST_ACTOR,
            )
            .await?;

        assert_eq!(movement.item_id, item.id);
        assert_eq!(movement.quantity, 10);
        assert_eq!(movement.reference_document, "NFe-4711");
        assert_eq!(movement.recorded_by, TEST_ACTOR.id);
        assert_eq!(on_hand(&engine, item.id).await, 10);

        let movements = list_inbound(&db, Some(item.id)).await?;
        assert_eq!(movements.len(), 1);

        let audit = AuditEntry::find()
            .order_by_asc(audit_entry::Column::Id)
            .all(&db)
            .await?;
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].movement_kind, "INBOUND");
        assert_eq!(audit[0].quantity_delta, 10);
        assert_eq!(audit[0].item_name, item.name);
        assert_eq!(audit[0].actor, Some(TEST_ACTOR.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_inbound_rejects_bad_drafts_before_storage() -> Result<()> {
        let (db, engine, item) = setup_with_engine().await?;

        let result = engine
            .record_inbound(
                InboundDraft {
                    item_id: item.id,
                    reference_document: "NFe-1".to_string(),
                    quantity: 0,
                    received_at: None,
                    note: None,
                },
                &TEST_ACTOR,
            )
            .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = engine
            .record_inbound(
                InboundDraft {
                    item_id: item.id,
                    reference_document: " ".to_string(),
                    quantity: 5,
                    received_at: None,
                    note: None,
                },
                &TEST_ACTOR,
            )
            .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        assert!(list_inbound(&db, None).await?.is_empty());
        assert!(AuditEntry::find()
            .order_by_asc(audit_entry::Column::Id)
            .all(&db)
            .await?.is_empty());
        assert_eq!(on_hand(&engine, item.id).await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_inbound_unknown_item() -> Result<()> {
        let (db, engine, _item) = setup_with_engine().await?;

        let result = engine
            .record_inbound(
                InboundDraft {
                    item_id: 999,
                    reference_document: "NFe-1".to_string(),
                    quantity: 5,
                    received_at: None,
                    note: None,
                },
                &TEST_ACTOR,
            )
            .await;
        assert!(matches!(result.unwrap_err(), Error::ItemNotFound { id: 999 }));
        assert!(list_inbound(&db, None).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_outbound_rejected_leaves_no_trace() -> Result<()> {
        let (db, engine, item) = setup_with_engine().await?;
        record_test_inbound(&engine, item.id, 5).await?;

        let result = engine
            .record_outbound(
                OutboundDraft {
                    item_id: item.id,
                    quantity: 7,
                    requester_reference: "TICKET-1".to_string(),
                    destination: "Education".to_string(),
                },
                &TEST_ACTOR,
            )
            .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock {
                on_hand: 5,
                requested: 7
            }
        ));

        assert_eq!(on_hand(&engine, item.id).await, 5);
        assert!(list_outbound(&db, None).await?.is_empty());
        // Only the inbound audit row exists, nothing for the rejected request
        assert_eq!(AuditEntry::find()
            .order_by_asc(audit_entry::Column::Id)
            .all(&db)
            .await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_outbound_then_delete_restores_stock() -> Result<()> {
        let (db, engine, item) = setup_with_engine().await?;
        record_test_inbound(&engine, item.id, 5).await?;

        let movement = record_test_outbound(&engine, item.id, 3).await?;
        assert_eq!(on_hand(&engine, item.id).await, 2);

        let audit = AuditEntry::find()
            .order_by_asc(audit_entry::Column::Id)
            .all(&db)
            .await?;
        assert_eq!(audit.last().unwrap().quantity_delta, -3);
        assert_eq!(audit.last().unwrap().movement_kind, "OUTBOUND");

        engine
            .delete_movement(MovementKind::Outbound, movement.id, &TEST_ACTOR)
            .await?;
        assert_eq!(on_hand(&engine, item.id).await, 5);
        assert!(list_outbound(&db, Some(item.id)).await?.is_empty());

        // The original entries survive; the reversal appends its own
        let audit = AuditEntry::find()
            .order_by_asc(audit_entry::Column::Id)
            .all(&db)
            .await?;
        assert_eq!(audit.len(), 3);
        assert_eq!(audit.last().unwrap().quantity_delta, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_inbound_blocked_by_issued_stock() -> Result<()> {
        let (_db, engine, item) = setup_with_engine().await?;
        let receipt = record_test_inbound(&engine, item.id, 5).await?;
        record_test_outbound(&engine, item.id, 4).await?;
        assert_eq!(on_hand(&engine, item.id).await, 1);

        let result = engine
            .delete_movement(MovementKind::Inbound, receipt.id, &TEST_ACTOR)
            .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock {
                on_hand: 1,
                requested: 5
            }
        ));

        // Nothing was applied: movement still present, quantity unchanged
        assert_eq!(on_hand(&engine, item.id).await, 1);
        assert_eq!(list_inbound(engine.db(), Some(item.id)).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_correct_inbound_re_derives_quantity() -> Result<()> {
        let (db, engine, item) = setup_with_engine().await?;
        let receipt = record_test_inbound(&engine, item.id, 10).await?;

        let corrected = engine
            .correct_movement(
                MovementKind::Inbound,
                receipt.id,
                MovementUpdate {
                    quantity: Some(4),
                    reference_document: Some("NFe-fixed".to_string()),
                    ..Default::default()
                },
                &TEST_ACTOR,
            )
            .await?;

        match corrected {
            Movement::Inbound(m) => {
                assert_eq!(m.quantity, 4);
                assert_eq!(m.reference_document, "NFe-fixed");
            }
            Movement::Outbound(_) => unreachable!("corrected an inbound movement"),
        }
        assert_eq!(on_hand(&engine, item.id).await, 4);

        let audit = AuditEntry::find()
            .order_by_asc(audit_entry::Column::Id)
            .all(&db)
            .await?;
        assert_eq!(audit.last().unwrap().quantity_delta, -6);

        Ok(())
    }

    #[tokio::test]
    async fn test_correct_inbound_below_issued_stock_fails() -> Result<()> {
        let (_db, engine, item) = setup_with_engine().await?;
        let receipt = record_test_inbound(&engine, item.id, 10).await?;
        record_test_outbound(&engine, item.id, 8).await?;
        assert_eq!(on_hand(&engine, item.id).await, 2);

        let result = engine
            .correct_movement(
                MovementKind::Inbound,
                receipt.id,
                MovementUpdate {
                    quantity: Some(5),
                    ..Default::default()
                },
                &TEST_ACTOR,
            )
            .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock { on_hand: 2, requested: 5 }
        ));

        assert_eq!(on_hand(&engine, item.id).await, 2);
        let receipts = list_inbound(engine.db(), Some(item.id)).await?;
        assert_eq!(receipts[0].quantity, 10);

        Ok(())
    }

    #[tokio::test]
    async fn test_correct_outbound_both_directions() -> Result<()> {
        let (_db, engine, item) = setup_with_engine().await?;
        record_test_inbound(&engine, item.id, 10).await?;
        let issue = record_test_outbound(&engine, item.id, 3).await?;
        assert_eq!(on_hand(&engine, item.id).await, 7);

        // Growing the issuance consumes more stock
        engine
            .correct_movement(
                MovementKind::Outbound,
                issue.id,
                MovementUpdate {
                    quantity: Some(5),
                    ..Default::default()
                },
                &TEST_ACTOR,
            )
            .await?;
        assert_eq!(on_hand(&engine, item.id).await, 5);

        // Growing beyond what is on hand is rejected
        let result = engine
            .correct_movement(
                MovementKind::Outbound,
                issue.id,
                MovementUpdate {
                    quantity: Some(20),
                    ..Default::default()
                },
                &TEST_ACTOR,
            )
            .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock { on_hand: 5, requested: 15 }
        ));
        assert_eq!(on_hand(&engine, item.id).await, 5);

        // Shrinking the issuance gives stock back
        engine
            .correct_movement(
                MovementKind::Outbound,
                issue.id,
                MovementUpdate {
                    quantity: Some(1),
                    ..Default::default()
                },
                &TEST_ACTOR,
            )
            .await?;
        assert_eq!(on_hand(&engine, item.id).await, 9);

        Ok(())
    }

    #[tokio::test]
    async fn test_correct_missing_movement() -> Result<()> {
        let (_db, engine, _item) = setup_with_engine().await?;

        let result = engine
            .correct_movement(
                MovementKind::Outbound,
                123,
                MovementUpdate::default(),
                &TEST_ACTOR,
            )
            .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::MovementNotFound {
                kind: MovementKind::Outbound,
                id: 123
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_quantity_equals_fold_of_surviving_movements() -> Result<()> {
        let (db, engine, item) = setup_with_engine().await?;

        record_test_inbound(&engine, item.id, 10).await?;
        let receipt = record_test_inbound(&engine, item.id, 7).await?;
        record_test_outbound(&engine, item.id, 4).await?;
        let issue = record_test_outbound(&engine, item.id, 2).await?;
        engine
            .correct_movement(
                MovementKind::Inbound,
                receipt.id,
                MovementUpdate {
                    quantity: Some(5),
                    ..Default::default()
                },
                &TEST_ACTOR,
            )
            .await?;
        engine
            .delete_movement(MovementKind::Outbound, issue.id, &TEST_ACTOR)
            .await?;

        let received: i64 = list_inbound(&db, Some(item.id))
            .await?
            .iter()
            .map(|m| m.quantity)
            .sum();
        let issued: i64 = list_outbound(&db, Some(item.id))
            .await?
            .iter()
            .map(|m| m.quantity)
            .sum();

        assert_eq!(on_hand(&engine, item.id).await, received - issued);
        assert_eq!(on_hand(&engine, item.id).await, 11);

        Ok(())
    }

    #[tokio::test]
    async fn test_movements_listed_newest_first_per_item() -> Result<()> {
        let (db, engine, item) = setup_with_engine().await?;
        let other = create_test_item(&db, "TEC-777", "Cable").await?;

        let first = record_test_inbound(&engine, item.id, 1).await?;
        let second = record_test_inbound(&engine, item.id, 2).await?;
        record_test_inbound(&engine, other.id, 3).await?;

        let movements = list_inbound(&db, Some(item.id)).await?;
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].id, second.id);
        assert_eq!(movements[1].id, first.id);

        let all = list_inbound(&db, None).await?;
        assert_eq!(all.len(), 3);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_outbound_never_oversells() -> Result<()> {
        let (db, engine, item) = setup_with_engine().await?;
        let on_hand_start = 3;
        let writers = 8;
        record_test_inbound(&engine, item.id, on_hand_start).await?;

        let mut handles = Vec::new();
        for n in 0..writers {
            let engine = engine.clone();
            let item_id = item.id;
            handles.push(tokio::spawn(async move {
                engine
                    .record_outbound(
                        OutboundDraft {
                            item_id,
                            quantity: 1,
                            requester_reference: format!("TICKET-{n}"),
                            destination: "Education".to_string(),
                        },
                        &TEST_ACTOR,
                    )
                    .await
            }));
        }

        let mut succeeded = 0;
        let mut insufficient = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(Error::InsufficientStock { .. }) => insufficient += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(succeeded, on_hand_start);
        assert_eq!(insufficient, writers - on_hand_start);
        assert_eq!(on_hand(&engine, item.id).await, 0);
        assert_eq!(
            list_outbound(&db, Some(item.id)).await?.len(),
            usize::try_from(on_hand_start).unwrap()
        );

        Ok(())
    }
}
