//! Matching engine
//!
//! Fee computation and fill settlement
//!
//! Filling an order settles four balance movements at once:
//!
//! ```text
//! filler  -(amount_get + fee)-> creator (amount_get), fee account (fee)   [asset_get]
//! creator -(amount_give)------> filler                                    [asset_give]
//! ```
//!
//! All movements are staged in one ledger batch; the order is marked filled
//! and the batch committed only after every movement validated.

use exchange_types::fee::FeePercent;
use exchange_types::ids::{AccountId, OrderId};
use exchange_types::numeric::Amount;
use exchange_types::order::Order;
use tracing::{info, warn};

use crate::errors::{ExchangeError, LedgerError};
use crate::events::Trade;
use crate::ledger::{Ledger, LedgerBatch};
use crate::orderbook::OrderBook;

/// Amounts a filler must cover to take an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillQuote {
    /// Paid to the fee account in `asset_get`
    pub fee: Amount,
    /// `amount_get + fee`, debited from the filler in `asset_get`
    pub required: Amount,
}

#[derive(Debug, Clone)]
pub struct MatchingEngine {
    fee_account: AccountId,
    fee_percent: FeePercent,
}

impl MatchingEngine {
    pub fn new(fee_account: AccountId, fee_percent: FeePercent) -> Self {
        Self {
            fee_account,
            fee_percent,
        }
    }

    pub fn fee_account(&self) -> AccountId {
        self.fee_account
    }

    pub fn fee_percent(&self) -> FeePercent {
        self.fee_percent
    }

    /// Fee and total the filler pays for `order`.
    pub fn quote(&self, order: &Order) -> Result<FillQuote, ExchangeError> {
        let fee = self.fee_percent.fee_for(order.amount_get);
        let required = order
            .amount_get
            .checked_add(fee)
            .ok_or(ExchangeError::ArithmeticOverflow)?;
        Ok(FillQuote { fee, required })
    }

    /// Settle order `id` against `filler`.
    ///
    /// On error neither the ledger nor the order book has changed.
    pub fn fill_order(
        &self,
        ledger: &mut Ledger,
        book: &mut OrderBook,
        filler: AccountId,
        id: OrderId,
        timestamp: i64,
    ) -> Result<Trade, ExchangeError> {
        let order = book.get(id)?;
        order.ensure_open()?;
        let quote = self.quote(order)?;

        let mut batch = ledger.batch();
        if let Err(err) = self.stage_settlement(&mut batch, order, filler, quote) {
            warn!(order_id = %id, %filler, error = %err, "Fill rejected");
            return Err(err.into());
        }
        let changes = batch.into_changeset();
        let trade = Trade::from_order(order, filler, timestamp);

        book.get_order_mut(id)?.mark_filled()?;
        ledger.commit(changes);

        info!(
            order_id = %id,
            creator = %trade.creator,
            %filler,
            fee = %quote.fee,
            "Order filled"
        );
        Ok(trade)
    }

    fn stage_settlement(
        &self,
        batch: &mut LedgerBatch<'_>,
        order: &Order,
        filler: AccountId,
        quote: FillQuote,
    ) -> Result<(), LedgerError> {
        batch.debit(order.asset_get, filler, quote.required)?;
        batch.credit(order.asset_get, order.creator, order.amount_get)?;
        batch.credit(order.asset_get, self.fee_account, quote.fee)?;
        batch.debit(order.asset_give, order.creator, order.amount_give)?;
        batch.credit(order.asset_give, filler, order.amount_give)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_types::asset::Asset;

    struct Fixture {
        ledger: Ledger,
        book: OrderBook,
        engine: MatchingEngine,
        creator: AccountId,
        filler: AccountId,
        fee_account: AccountId,
        token: Asset,
    }

    fn setup(fee_percent: u64) -> Fixture {
        let fee_account = AccountId::new();
        Fixture {
            ledger: Ledger::new(),
            book: OrderBook::new(),
            engine: MatchingEngine::new(fee_account, FeePercent::new(fee_percent).unwrap()),
            creator: AccountId::new(),
            filler: AccountId::new(),
            fee_account,
            token: Asset::Token(AccountId::new()),
        }
    }

    /// Creator wants `get` tokens for `give` native.
    fn order(f: &mut Fixture, get: Amount, give: Amount) -> OrderId {
        f.book
            .make_order(f.creator, f.token, get, Asset::Native, give, 100)
            .unwrap()
            .id
    }

    #[test]
    fn test_quote() {
        let mut f = setup(10);
        let id = order(&mut f, Amount::tokens(1), Amount::tokens(1));
        let quote = f.engine.quote(f.book.get_order(id).unwrap()).unwrap();
        assert_eq!(quote.fee, Amount::new(100_000_000_000_000_000));
        assert_eq!(quote.required, Amount::new(1_100_000_000_000_000_000));
    }

    #[test]
    fn test_fill_settles_four_ways() {
        let mut f = setup(10);
        f.ledger.credit(f.token, f.filler, Amount::tokens(2)).unwrap();
        f.ledger.credit(Asset::Native, f.creator, Amount::tokens(1)).unwrap();
        let id = order(&mut f, Amount::tokens(1), Amount::tokens(1));

        let trade = f
            .engine
            .fill_order(&mut f.ledger, &mut f.book, f.filler, id, 200)
            .unwrap();

        assert_eq!(trade.timestamp, 200);
        assert_eq!(trade.filler, f.filler);
        assert_eq!(f.ledger.balance_of(&f.token, &f.creator), Amount::tokens(1));
        assert_eq!(f.ledger.balance_of(&Asset::Native, &f.creator), Amount::ZERO);
        assert_eq!(f.ledger.balance_of(&Asset::Native, &f.filler), Amount::tokens(1));
        assert_eq!(
            f.ledger.balance_of(&f.token, &f.filler),
            Amount::new(900_000_000_000_000_000)
        );
        assert_eq!(
            f.ledger.balance_of(&f.token, &f.fee_account),
            Amount::new(100_000_000_000_000_000)
        );
        assert!(f.book.is_filled(id));
    }

    #[test]
    fn test_filler_short_by_fee() {
        let mut f = setup(10);
        // Covers amount_get but not the fee on top
        f.ledger.credit(f.token, f.filler, Amount::tokens(1)).unwrap();
        f.ledger.credit(Asset::Native, f.creator, Amount::tokens(1)).unwrap();
        let id = order(&mut f, Amount::tokens(1), Amount::tokens(1));

        let result = f.engine.fill_order(&mut f.ledger, &mut f.book, f.filler, id, 200);
        assert!(matches!(
            result,
            Err(ExchangeError::InsufficientBalance { account, .. }) if account == f.filler
        ));
        assert_eq!(f.ledger.balance_of(&f.token, &f.filler), Amount::tokens(1));
        assert!(!f.book.is_filled(id));
    }

    #[test]
    fn test_insolvent_creator_aborts_whole_fill() {
        let mut f = setup(10);
        f.ledger.credit(f.token, f.filler, Amount::tokens(2)).unwrap();
        let id = order(&mut f, Amount::tokens(1), Amount::tokens(1));

        let result = f.engine.fill_order(&mut f.ledger, &mut f.book, f.filler, id, 200);
        assert!(matches!(
            result,
            Err(ExchangeError::InsufficientBalance { account, .. }) if account == f.creator
        ));
        // The filler-side movements staged before the failure were discarded
        assert_eq!(f.ledger.balance_of(&f.token, &f.filler), Amount::tokens(2));
        assert_eq!(f.ledger.balance_of(&f.token, &f.creator), Amount::ZERO);
        assert_eq!(f.ledger.balance_of(&f.token, &f.fee_account), Amount::ZERO);
        assert!(!f.book.is_filled(id));
    }

    #[test]
    fn test_fill_at_most_once() {
        let mut f = setup(10);
        f.ledger.credit(f.token, f.filler, Amount::tokens(5)).unwrap();
        f.ledger.credit(Asset::Native, f.creator, Amount::tokens(5)).unwrap();
        let id = order(&mut f, Amount::tokens(1), Amount::tokens(1));

        f.engine
            .fill_order(&mut f.ledger, &mut f.book, f.filler, id, 200)
            .unwrap();
        let before = f.ledger.entries();
        let result = f.engine.fill_order(&mut f.ledger, &mut f.book, f.filler, id, 201);

        assert_eq!(result, Err(ExchangeError::OrderAlreadyFilled { order_id: 1 }));
        assert_eq!(f.ledger.entries(), before);
    }

    #[test]
    fn test_fill_cancelled_order() {
        let mut f = setup(10);
        let id = order(&mut f, Amount::tokens(1), Amount::tokens(1));
        f.book.cancel_order(f.creator, id, 150).unwrap();
        assert_eq!(
            f.engine.fill_order(&mut f.ledger, &mut f.book, f.filler, id, 200),
            Err(ExchangeError::OrderAlreadyCancelled { order_id: 1 })
        );
    }

    #[test]
    fn test_fill_unknown_order() {
        let mut f = setup(10);
        assert_eq!(
            f.engine
                .fill_order(&mut f.ledger, &mut f.book, f.filler, OrderId::new(1), 200),
            Err(ExchangeError::InvalidOrderId { order_id: 1 })
        );
    }

    #[test]
    fn test_zero_fee_for_small_amounts() {
        let mut f = setup(10);
        f.ledger.credit(f.token, f.filler, Amount::new(9)).unwrap();
        f.ledger.credit(Asset::Native, f.creator, Amount::new(1)).unwrap();
        let id = order(&mut f, Amount::new(9), Amount::new(1));

        f.engine
            .fill_order(&mut f.ledger, &mut f.book, f.filler, id, 200)
            .unwrap();
        assert_eq!(f.ledger.balance_of(&f.token, &f.fee_account), Amount::ZERO);
        assert_eq!(f.ledger.balance_of(&f.token, &f.creator), Amount::new(9));
    }

    #[test]
    fn test_self_fill_pays_fee_only() {
        let mut f = setup(10);
        f.filler = f.creator;
        f.ledger.credit(f.token, f.creator, Amount::new(110)).unwrap();
        f.ledger.credit(Asset::Native, f.creator, Amount::new(50)).unwrap();
        let id = order(&mut f, Amount::new(100), Amount::new(50));

        f.engine
            .fill_order(&mut f.ledger, &mut f.book, f.creator, id, 200)
            .unwrap();
        assert_eq!(f.ledger.balance_of(&f.token, &f.creator), Amount::new(100));
        assert_eq!(f.ledger.balance_of(&Asset::Native, &f.creator), Amount::new(50));
        assert_eq!(f.ledger.balance_of(&f.token, &f.fee_account), Amount::new(10));
    }
}
