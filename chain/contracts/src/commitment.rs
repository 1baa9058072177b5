//! State commitment
//!
//! A digest over ledger and order book
//!
//! Two exchanges holding the same balances and orders produce the same root,
//! regardless of the order in which map entries were inserted.

use exchange_types::asset::Asset;
use exchange_types::order::Order;
use sha2::{Digest, Sha256};

use crate::ledger::Ledger;
use crate::orderbook::OrderBook;

/// Compute the SHA-256 state root over all non-zero balances, in
/// `(asset, account)` order, followed by all orders in id order.
pub fn state_root(ledger: &Ledger, book: &OrderBook) -> [u8; 32] {
    let mut hasher = Sha256::new();

    let entries = ledger.entries();
    hasher.update((entries.len() as u64).to_le_bytes());
    for (asset, account, amount) in entries {
        hash_asset(&mut hasher, &asset);
        hasher.update(account.as_uuid().as_bytes());
        hasher.update(amount.units().to_le_bytes());
    }

    let orders = book.orders();
    hasher.update((orders.len() as u64).to_le_bytes());
    for order in orders {
        hash_order(&mut hasher, order);
    }

    hasher.finalize().into()
}

fn hash_asset(hasher: &mut Sha256, asset: &Asset) {
    match asset {
        Asset::Native => hasher.update([0u8]),
        Asset::Token(contract) => {
            hasher.update([1u8]);
            hasher.update(contract.as_uuid().as_bytes());
        }
    }
}

fn hash_order(hasher: &mut Sha256, order: &Order) {
    hasher.update(order.id.get().to_le_bytes());
    hasher.update(order.creator.as_uuid().as_bytes());
    hash_asset(hasher, &order.asset_get);
    hasher.update(order.amount_get.units().to_le_bytes());
    hash_asset(hasher, &order.asset_give);
    hasher.update(order.amount_give.units().to_le_bytes());
    hasher.update(order.created_at.to_le_bytes());
    hasher.update([u8::from(order.filled), u8::from(order.cancelled)]);
}
