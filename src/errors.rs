//! Unified error taxonomy for the ledger core.
//!
//! Every variant is recoverable at the caller; the boundary layer maps each to a
//! transport-appropriate status. Validation errors are raised before any storage
//! mutation, and once a transaction has begun mutating, any failure aborts it whole.

use crate::requests::MovementKind;
use thiserror::Error;

/// All failure modes the ledger core can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad input shape or range, e.g. a non-positive quantity or an empty SKU code.
    #[error("validation failed: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// The referenced item does not exist.
    #[error("item {id} not found")]
    ItemNotFound {
        /// Item id that was looked up
        id: i64,
    },

    /// The referenced movement does not exist.
    #[error("{kind} movement {id} not found")]
    MovementNotFound {
        /// Which movement table was searched
        kind: MovementKind,
        /// Movement id that was looked up
        id: i64,
    },

    /// An item with the same SKU code already exists.
    #[error("item code '{code}' is already registered")]
    DuplicateCode {
        /// The conflicting SKU code
        code: String,
    },

    /// The item still has movements referencing it and cannot be deleted.
    #[error("item {id} is referenced by {movements} movement(s) and cannot be deleted")]
    ItemInUse {
        /// Item id that was targeted for deletion
        id: i64,
        /// Number of movements still referencing it
        movements: u64,
    },

    /// The requested outbound quantity exceeds what is on hand.
    #[error("insufficient stock: {on_hand} on hand, {requested} requested")]
    InsufficientStock {
        /// Quantity on hand at validation time
        on_hand: i64,
        /// Quantity the caller asked to remove
        requested: i64,
    },

    /// The per-item write lock could not be acquired within the configured bound.
    /// Safe to retry: no partial state exists.
    #[error("item {item_id} is busy, write lock not acquired in time")]
    Busy {
        /// Item whose lock timed out
        item_id: i64,
    },

    /// The principal is not allowed to perform an administrative operation.
    #[error("administrator privileges required")]
    Forbidden,

    /// Configuration error (bad environment, unusable settings).
    #[error("configuration error: {message}")]
    Config {
        /// What failed during configuration loading
        message: String,
    },

    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Convenience `Result` type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::Validation`] with a formatted message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
