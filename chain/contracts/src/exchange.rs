//! Exchange
//!
//! The facade over ledger, order book, matching and events
//!
//! Every mutating operation takes `&mut self`, so within a thread the borrow
//! checker already enforces a single writer. Use [`crate::SharedExchange`] to
//! share one exchange between threads.
//!
//! Each operation either commits all of its effects and appends exactly one
//! event, or returns an error with nothing changed.

use exchange_types::asset::Asset;
use exchange_types::fee::FeePercent;
use exchange_types::ids::{AccountId, OrderId};
use exchange_types::numeric::Amount;
use exchange_types::order::Order;
use tracing::{info, warn};

use crate::chain::Chain;
use crate::commitment;
use crate::config::ExchangeConfig;
use crate::errors::ExchangeError;
use crate::events::{Deposit, EventLog, ExchangeEvent, SequencedEvent, Trade, Withdraw};
use crate::gateway::TokenGateway;
use crate::ledger::Ledger;
use crate::matching::{FillQuote, MatchingEngine};
use crate::orderbook::OrderBook;

/// A custodial two-asset exchange running on chain `C`.
#[derive(Debug)]
pub struct Exchange<C: Chain> {
    address: AccountId,
    config: ExchangeConfig,
    ledger: Ledger,
    book: OrderBook,
    engine: MatchingEngine,
    events: EventLog,
    chain: C,
}

impl<C: Chain> Exchange<C> {
    /// Deploy a new exchange at a fresh address.
    pub fn new(config: ExchangeConfig, chain: C) -> Self {
        Self::with_address(AccountId::new(), config, chain)
    }

    /// Deploy at a known custody address.
    pub fn with_address(address: AccountId, config: ExchangeConfig, chain: C) -> Self {
        info!(
            %address,
            fee_account = %config.fee_account(),
            fee_percent = %config.fee_percent(),
            "Exchange deployed"
        );
        Self {
            address,
            config,
            ledger: Ledger::new(),
            book: OrderBook::new(),
            engine: MatchingEngine::new(config.fee_account(), config.fee_percent()),
            events: EventLog::new(),
            chain,
        }
    }

    // ───────────────────────── Deployment ─────────────────────────

    /// Custody address: tokens and native currency held by the exchange sit here.
    pub fn address(&self) -> AccountId {
        self.address
    }

    pub fn fee_account(&self) -> AccountId {
        self.config.fee_account()
    }

    pub fn fee_percent(&self) -> FeePercent {
        self.config.fee_percent()
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut C {
        &mut self.chain
    }

    /// Native currency sent directly to the exchange, bypassing `deposit_native`.
    /// Always rejected, whatever the amount.
    pub fn receive_native(&self, caller: AccountId, amount: Amount) -> Result<(), ExchangeError> {
        warn!(%caller, %amount, "Direct payment rejected");
        Err(ExchangeError::DirectPaymentRejected)
    }

    // ───────────────────────── Deposits & Withdrawals ─────────────────────────

    pub fn deposit_native(
        &mut self,
        account: AccountId,
        amount: Amount,
    ) -> Result<Deposit, ExchangeError> {
        let deposit = self.gateway().deposit_native(account, amount)?;
        self.events.append(ExchangeEvent::Deposit(deposit.clone()));
        Ok(deposit)
    }

    /// Requires a prior `approve(exchange.address(), amount)` on the token.
    pub fn deposit_token(
        &mut self,
        account: AccountId,
        token: Asset,
        amount: Amount,
    ) -> Result<Deposit, ExchangeError> {
        let deposit = self.gateway().deposit_token(account, token, amount)?;
        self.events.append(ExchangeEvent::Deposit(deposit.clone()));
        Ok(deposit)
    }

    pub fn withdraw_native(
        &mut self,
        account: AccountId,
        amount: Amount,
    ) -> Result<Withdraw, ExchangeError> {
        let withdraw = self.gateway().withdraw_native(account, amount)?;
        self.events.append(ExchangeEvent::Withdraw(withdraw.clone()));
        Ok(withdraw)
    }

    pub fn withdraw_token(
        &mut self,
        account: AccountId,
        token: Asset,
        amount: Amount,
    ) -> Result<Withdraw, ExchangeError> {
        let withdraw = self.gateway().withdraw_token(account, token, amount)?;
        self.events.append(ExchangeEvent::Withdraw(withdraw.clone()));
        Ok(withdraw)
    }

    /// Custodial balance; zero for any pair never credited.
    pub fn balance_of(&self, asset: &Asset, account: &AccountId) -> Amount {
        self.ledger.balance_of(asset, account)
    }

    fn gateway(&mut self) -> TokenGateway<'_, C> {
        TokenGateway::new(&mut self.ledger, &mut self.chain, self.address)
    }

    // ───────────────────────── Orders ─────────────────────────

    /// Place an order. Funds are not checked until the order is filled.
    pub fn make_order(
        &mut self,
        creator: AccountId,
        asset_get: Asset,
        amount_get: Amount,
        asset_give: Asset,
        amount_give: Amount,
    ) -> Result<OrderId, ExchangeError> {
        let created = self.book.make_order(
            creator,
            asset_get,
            amount_get,
            asset_give,
            amount_give,
            self.chain.timestamp(),
        )?;
        let id = created.id;
        self.events.append(ExchangeEvent::OrderCreated(created));
        Ok(id)
    }

    pub fn cancel_order(&mut self, caller: AccountId, id: OrderId) -> Result<(), ExchangeError> {
        let cancelled = self
            .book
            .cancel_order(caller, id, self.chain.timestamp())
            .map_err(|e| {
                warn!(order_id = %id, %caller, error = %e, "Cancel rejected");
                e
            })?;
        self.events.append(ExchangeEvent::OrderCancelled(cancelled));
        Ok(())
    }

    /// Fill order `id` in full on behalf of `filler`, charging the fee to the filler.
    pub fn fill_order(&mut self, filler: AccountId, id: OrderId) -> Result<Trade, ExchangeError> {
        let timestamp = self.chain.timestamp();
        let trade = self
            .engine
            .fill_order(&mut self.ledger, &mut self.book, filler, id, timestamp)?;
        self.events.append(ExchangeEvent::Trade(trade.clone()));
        Ok(trade)
    }

    /// Fee and total `asset_get` the filler of `id` would need.
    pub fn quote(&self, id: OrderId) -> Result<FillQuote, ExchangeError> {
        self.engine.quote(self.book.get(id)?)
    }

    pub fn order_count(&self) -> u64 {
        self.book.order_count()
    }

    pub fn get_order(&self, id: OrderId) -> Option<&Order> {
        self.book.get_order(id)
    }

    pub fn is_filled(&self, id: OrderId) -> bool {
        self.book.is_filled(id)
    }

    pub fn is_cancelled(&self, id: OrderId) -> bool {
        self.book.is_cancelled(id)
    }

    // ───────────────────────── Events & State ─────────────────────────

    pub fn events(&self) -> &[SequencedEvent] {
        self.events.events()
    }

    pub fn events_since(&self, sequence: u64) -> &[SequencedEvent] {
        self.events.events_since(sequence)
    }

    pub fn last_sequence(&self) -> u64 {
        self.events.last_sequence()
    }

    pub fn drain_events(&mut self) -> Vec<SequencedEvent> {
        self.events.drain()
    }

    /// Total custodied amount of `asset` across all accounts.
    pub fn total_of(&self, asset: &Asset) -> Result<Amount, ExchangeError> {
        Ok(self.ledger.total_of(asset)?)
    }

    pub fn state_root(&self) -> [u8; 32] {
        commitment::state_root(&self.ledger, &self.book)
    }

    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}
