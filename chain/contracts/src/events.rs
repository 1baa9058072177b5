//! Exchange events and the append-only event log
//!
//! Events are immutable records of committed operations. Observers read them
//! in order; each carries a gapless sequence number.

use exchange_types::asset::Asset;
use exchange_types::ids::{AccountId, OrderId};
use exchange_types::numeric::Amount;
use exchange_types::order::Order;
use serde::{Deserialize, Serialize};

/// Funds credited to an account through a deposit entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub asset: Asset,
    pub account: AccountId,
    pub amount: Amount,
    /// Ledger balance after the deposit
    pub balance: Amount,
}

/// Funds debited and sent out of custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdraw {
    pub asset: Asset,
    pub account: AccountId,
    pub amount: Amount,
    /// Ledger balance after the withdrawal
    pub balance: Amount,
}

/// New open order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub id: OrderId,
    pub creator: AccountId,
    pub asset_get: Asset,
    pub amount_get: Amount,
    pub asset_give: Asset,
    pub amount_give: Amount,
    pub timestamp: i64,
}

impl OrderCreated {
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id,
            creator: order.creator,
            asset_get: order.asset_get,
            amount_get: order.amount_get,
            asset_give: order.asset_give,
            amount_give: order.amount_give,
            timestamp: order.created_at,
        }
    }
}

/// Order withdrawn by its creator. `timestamp` is the cancellation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub id: OrderId,
    pub creator: AccountId,
    pub asset_get: Asset,
    pub amount_get: Amount,
    pub asset_give: Asset,
    pub amount_give: Amount,
    pub timestamp: i64,
}

impl OrderCancelled {
    pub fn from_order(order: &Order, timestamp: i64) -> Self {
        Self {
            id: order.id,
            creator: order.creator,
            asset_get: order.asset_get,
            amount_get: order.amount_get,
            asset_give: order.asset_give,
            amount_give: order.amount_give,
            timestamp,
        }
    }
}

/// Order settled against a filler. `timestamp` is the fill time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: OrderId,
    pub creator: AccountId,
    pub asset_get: Asset,
    pub amount_get: Amount,
    pub asset_give: Asset,
    pub amount_give: Amount,
    pub filler: AccountId,
    pub timestamp: i64,
}

impl Trade {
    pub fn from_order(order: &Order, filler: AccountId, timestamp: i64) -> Self {
        Self {
            id: order.id,
            creator: order.creator,
            asset_get: order.asset_get,
            amount_get: order.amount_get,
            asset_give: order.asset_give,
            amount_give: order.amount_give,
            filler,
            timestamp,
        }
    }
}

/// Enum wrapper for all exchange events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "args")]
pub enum ExchangeEvent {
    Deposit(Deposit),
    Withdraw(Withdraw),
    #[serde(rename = "Order")]
    OrderCreated(OrderCreated),
    #[serde(rename = "Cancel")]
    OrderCancelled(OrderCancelled),
    Trade(Trade),
}

impl ExchangeEvent {
    /// Event name as published to observers
    pub fn name(&self) -> &'static str {
        match self {
            ExchangeEvent::Deposit(_) => "Deposit",
            ExchangeEvent::Withdraw(_) => "Withdraw",
            ExchangeEvent::OrderCreated(_) => "Order",
            ExchangeEvent::OrderCancelled(_) => "Cancel",
            ExchangeEvent::Trade(_) => "Trade",
        }
    }
}

/// An event with its position in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedEvent {
    pub sequence: u64,
    pub event: ExchangeEvent,
}

/// Append-only, ordered event log.
///
/// Sequence numbers start at 1 and have no gaps. Draining hands retained
/// events to a consumer but never resets the sequence.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<SequencedEvent>,
    last_sequence: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, returning its sequence number.
    pub fn append(&mut self, event: ExchangeEvent) -> u64 {
        self.last_sequence += 1;
        self.entries.push(SequencedEvent {
            sequence: self.last_sequence,
            event,
        });
        self.last_sequence
    }

    /// All retained events, oldest first.
    pub fn events(&self) -> &[SequencedEvent] {
        &self.entries
    }

    /// Retained events with a sequence strictly greater than `sequence`.
    pub fn events_since(&self, sequence: u64) -> &[SequencedEvent] {
        let start = self.entries.partition_point(|e| e.sequence <= sequence);
        &self.entries[start..]
    }

    /// Sequence number of the newest event, or 0 if none was ever appended.
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain all retained events (consume and clear).
    pub fn drain(&mut self) -> Vec<SequencedEvent> {
        std::mem::take(&mut self.entries)
    }
}
