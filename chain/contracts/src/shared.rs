//! Thread-safe handle to one exchange
//!
//! Mutations hold the write lock for their whole duration and queries take
//! the read lock, so readers never see a half-applied operation and two
//! fills of the same order cannot interleave.

use std::sync::Arc;

use exchange_types::asset::Asset;
use exchange_types::ids::{AccountId, OrderId};
use exchange_types::numeric::Amount;
use exchange_types::order::Order;
use parking_lot::RwLock;

use crate::chain::Chain;
use crate::config::ExchangeConfig;
use crate::errors::ExchangeError;
use crate::events::{Deposit, SequencedEvent, Trade, Withdraw};
use crate::exchange::Exchange;

/// Cloneable, `Send + Sync` exchange handle. Clones share the same state.
#[derive(Debug)]
pub struct SharedExchange<C: Chain> {
    inner: Arc<RwLock<Exchange<C>>>,
}

impl<C: Chain> Clone for SharedExchange<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Chain> From<Exchange<C>> for SharedExchange<C> {
    fn from(exchange: Exchange<C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(exchange)),
        }
    }
}

impl<C: Chain> SharedExchange<C> {
    pub fn new(config: ExchangeConfig, chain: C) -> Self {
        Exchange::new(config, chain).into()
    }

    /// Run `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Exchange<C>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` under the write lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut Exchange<C>) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Mutate the underlying chain (fund wallets, move the clock, approve).
    pub fn with_chain_mut<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(self.inner.write().chain_mut())
    }

    // ───────────────────────── Mutations ─────────────────────────

    pub fn deposit_native(
        &self,
        account: AccountId,
        amount: Amount,
    ) -> Result<Deposit, ExchangeError> {
        self.inner.write().deposit_native(account, amount)
    }

    pub fn deposit_token(
        &self,
        account: AccountId,
        token: Asset,
        amount: Amount,
    ) -> Result<Deposit, ExchangeError> {
        self.inner.write().deposit_token(account, token, amount)
    }

    pub fn withdraw_native(
        &self,
        account: AccountId,
        amount: Amount,
    ) -> Result<Withdraw, ExchangeError> {
        self.inner.write().withdraw_native(account, amount)
    }

    pub fn withdraw_token(
        &self,
        account: AccountId,
        token: Asset,
        amount: Amount,
    ) -> Result<Withdraw, ExchangeError> {
        self.inner.write().withdraw_token(account, token, amount)
    }

    pub fn make_order(
        &self,
        creator: AccountId,
        asset_get: Asset,
        amount_get: Amount,
        asset_give: Asset,
        amount_give: Amount,
    ) -> Result<OrderId, ExchangeError> {
        self.inner
            .write()
            .make_order(creator, asset_get, amount_get, asset_give, amount_give)
    }

    pub fn cancel_order(&self, caller: AccountId, id: OrderId) -> Result<(), ExchangeError> {
        self.inner.write().cancel_order(caller, id)
    }

    pub fn fill_order(&self, filler: AccountId, id: OrderId) -> Result<Trade, ExchangeError> {
        self.inner.write().fill_order(filler, id)
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn balance_of(&self, asset: &Asset, account: &AccountId) -> Amount {
        self.inner.read().balance_of(asset, account)
    }

    pub fn get_order(&self, id: OrderId) -> Option<Order> {
        self.inner.read().get_order(id).cloned()
    }

    pub fn order_count(&self) -> u64 {
        self.inner.read().order_count()
    }

    pub fn is_filled(&self, id: OrderId) -> bool {
        self.inner.read().is_filled(id)
    }

    pub fn is_cancelled(&self, id: OrderId) -> bool {
        self.inner.read().is_cancelled(id)
    }

    pub fn events(&self) -> Vec<SequencedEvent> {
        self.inner.read().events().to_vec()
    }

    pub fn events_since(&self, sequence: u64) -> Vec<SequencedEvent> {
        self.inner.read().events_since(sequence).to_vec()
    }

    pub fn state_root(&self) -> [u8; 32] {
        self.inner.read().state_root()
    }
}
