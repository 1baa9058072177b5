//! Identifier types for exchange entities
//!
//! Users, the exchange custody account, the fee account and token contracts
//! all live in one address space (`AccountId`). Orders carry dense sequential
//! ids allocated by the order book.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Address of an account or contract.
///
/// Uses UUID v7 so freshly created accounts sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// The nil address. Never a valid transfer recipient or token contract.
    pub const ZERO: AccountId = AccountId(Uuid::nil());

    /// Create a fresh, unique address
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential order identifier.
///
/// The first order created on an exchange gets id 1. Id 0 is representable
/// (it is what an empty book reports as its count) but never names an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    pub const FIRST: OrderId = OrderId(1);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` if the counter is exhausted.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
