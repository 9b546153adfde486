//! The authenticated identity attached to every write.
//!
//! The ledger does not authenticate anyone: the boundary layer verifies a bearer
//! credential and hands the resolved principal into each call. The core only
//! stamps it onto movements and audit entries; the one piece of authorization
//! glue here, [`Principal::require_admin`], exists for the boundary to gate
//! catalog and user-management mutations before calling in.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// A resolved caller identity, consumed from the access-control layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable user id, stamped onto `recorded_by`/`actor`
    pub id: i64,
    /// Whether the caller may perform administrative mutations
    pub is_admin: bool,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub const fn new(id: i64, is_admin: bool) -> Self {
        Self { id, is_admin }
    }

    /// Fails with [`Error::Forbidden`] unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(Error::Forbidden)
        }
    }
}
