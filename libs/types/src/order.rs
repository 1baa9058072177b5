//! Order record and lifecycle
//!
//! An order is a standing offer to exchange `amount_give` of `asset_give`
//! for `amount_get` of `asset_get`. It is either open, filled or cancelled;
//! both of the latter are terminal.

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::errors::OrderError;
use crate::ids::{AccountId, OrderId};
use crate::numeric::Amount;

/// Derived lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Awaiting a filler
    Open,
    /// Settled by a successful fill (terminal)
    Filled,
    /// Withdrawn by its creator (terminal)
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Open)
    }
}

/// Stored order.
///
/// `filled` and `cancelled` are never both set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub creator: AccountId,
    pub asset_get: Asset,
    pub amount_get: Amount,
    pub asset_give: Asset,
    pub amount_give: Amount,
    pub created_at: i64, // Unix seconds, block time
    pub filled: bool,
    pub cancelled: bool,
}

impl Order {
    /// Create a new open order
    pub fn new(
        id: OrderId,
        creator: AccountId,
        asset_get: Asset,
        amount_get: Amount,
        asset_give: Asset,
        amount_give: Amount,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            creator,
            asset_get,
            amount_get,
            asset_give,
            amount_give,
            created_at,
            filled: false,
            cancelled: false,
        }
    }

    pub fn status(&self) -> OrderStatus {
        if self.filled {
            OrderStatus::Filled
        } else if self.cancelled {
            OrderStatus::Cancelled
        } else {
            OrderStatus::Open
        }
    }

    /// Fails unless the order is still open.
    pub fn ensure_open(&self) -> Result<(), OrderError> {
        match self.status() {
            OrderStatus::Open => Ok(()),
            OrderStatus::Filled => Err(OrderError::AlreadyFilled {
                order_id: self.id.get(),
            }),
            OrderStatus::Cancelled => Err(OrderError::AlreadyCancelled {
                order_id: self.id.get(),
            }),
        }
    }

    /// Open -> Filled
    pub fn mark_filled(&mut self) -> Result<(), OrderError> {
        self.ensure_open()?;
        self.filled = true;
        Ok(())
    }

    /// Open -> Cancelled
    pub fn mark_cancelled(&mut self) -> Result<(), OrderError> {
        self.ensure_open()?;
        self.cancelled = true;
        Ok(())
    }
}
