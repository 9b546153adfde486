//! Strongly-typed request and filter contracts, one per boundary operation.
//!
//! The boundary layer (HTTP handler, CLI, test) deserializes its payload into one
//! of these structs and hands it to the core; all validation lives in the ledger
//! engine, not in whatever form produced the payload. Each draft knows how to
//! check its own shape, and the engine calls that check before touching storage.

use crate::errors::{Error, Result};
use sea_orm::entity::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};

/// Which movement table an operation addresses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// A receipt of stock ("entrada")
    Inbound,
    /// An issuance of stock ("saída")
    Outbound,
}

impl MovementKind {
    /// Stable string form stored in the `movement_kind` audit column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "INBOUND",
            Self::Outbound => "OUTBOUND",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for creating a catalog item.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewItem {
    /// Human-assigned SKU code, unique across the catalog
    pub code: String,
    /// Human-readable item name
    pub name: String,
}

/// Payload for updating a catalog item; `None` fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    /// New SKU code, if changing
    pub code: Option<String>,
    /// New item name, if changing
    pub name: Option<String>,
}

/// Payload for recording an inbound movement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InboundDraft {
    /// Item the receipt applies to
    pub item_id: i64,
    /// Invoice/NFe number backing the receipt
    pub reference_document: String,
    /// Received quantity, must be positive
    pub quantity: i64,
    /// When the goods were received; defaults to now when absent
    pub received_at: Option<DateTimeUtc>,
    /// Optional free-text remark about the delivery
    pub note: Option<String>,
}

impl InboundDraft {
    /// Checks shape and range before any storage is touched.
    pub fn validate(&self) -> Result<()> {
        if self.quantity <= 0 {
            return Err(Error::validation(format!(
                "inbound quantity must be positive, got {}",
                self.quantity
            )));
        }
        if self.reference_document.trim().is_empty() {
            return Err(Error::validation("reference document is required"));
        }
        Ok(())
    }
}

/// Payload for recording an outbound movement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutboundDraft {
    /// Item the issuance applies to
    pub item_id: i64,
    /// Issued quantity, must be positive
    pub quantity: i64,
    /// Ticket or asset tag identifying the request
    pub requester_reference: String,
    /// Department/unit the stock goes to
    pub destination: String,
}

impl OutboundDraft {
    /// Checks shape and range before any storage is touched.
    pub fn validate(&self) -> Result<()> {
        if self.quantity <= 0 {
            return Err(Error::validation(format!(
                "outbound quantity must be positive, got {}",
                self.quantity
            )));
        }
        if self.requester_reference.trim().is_empty() {
            return Err(Error::validation("requester reference is required"));
        }
        if self.destination.trim().is_empty() {
            return Err(Error::validation("destination is required"));
        }
        Ok(())
    }
}

/// Payload for correcting an existing movement; `None` fields keep their value.
///
/// Fields that do not apply to the movement's kind (e.g. `destination` on an
/// inbound correction) are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MovementUpdate {
    /// Corrected quantity, must be positive when present
    pub quantity: Option<i64>,
    /// Corrected invoice reference (inbound only)
    pub reference_document: Option<String>,
    /// Corrected received date (inbound only)
    pub received_at: Option<DateTimeUtc>,
    /// Corrected delivery remark (inbound only)
    pub note: Option<String>,
    /// Corrected ticket/asset tag (outbound only)
    pub requester_reference: Option<String>,
    /// Corrected destination department (outbound only)
    pub destination: Option<String>,
}

impl MovementUpdate {
    /// Checks shape and range before any storage is touched.
    pub fn validate(&self) -> Result<()> {
        if let Some(quantity) = self.quantity {
            if quantity <= 0 {
                return Err(Error::validation(format!(
                    "corrected quantity must be positive, got {quantity}"
                )));
            }
        }
        if let Some(reference) = &self.reference_document {
            if reference.trim().is_empty() {
                return Err(Error::validation("reference document cannot be blank"));
            }
        }
        Ok(())
    }
}

/// Filters for the audit log read path; every field is optional and combined with AND.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Restrict to one item
    pub item_id: Option<i64>,
    /// Restrict to one movement kind
    pub kind: Option<MovementKind>,
    /// Only entries at or after this instant
    pub occurred_from: Option<DateTimeUtc>,
    /// Only entries strictly before this instant
    pub occurred_until: Option<DateTimeUtc>,
    /// Restrict to one actor's changes
    pub actor: Option<i64>,
}
