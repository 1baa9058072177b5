//! Order book
//!
//! Order storage, id allocation and cancellation
//!
//! Orders are kept forever and addressed by dense ids starting at 1, so the
//! book is a plain vector indexed by `id - 1`. No funds are checked or moved
//! here; solvency is verified only when an order is filled.

use exchange_types::asset::Asset;
use exchange_types::ids::{AccountId, OrderId};
use exchange_types::numeric::Amount;
use exchange_types::order::Order;
use tracing::info;

use crate::errors::ExchangeError;
use crate::events::{OrderCancelled, OrderCreated};

#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders ever created; also the newest id.
    pub fn order_count(&self) -> u64 {
        self.orders.len() as u64
    }

    /// Order with `id`, if it exists.
    pub fn get_order(&self, id: OrderId) -> Option<&Order> {
        let index = id.get().checked_sub(1)?;
        self.orders.get(usize::try_from(index).ok()?)
    }

    /// `false` for ids that name no order.
    pub fn is_filled(&self, id: OrderId) -> bool {
        self.get_order(id).map_or(false, |o| o.filled)
    }

    /// `false` for ids that name no order.
    pub fn is_cancelled(&self, id: OrderId) -> bool {
        self.get_order(id).map_or(false, |o| o.cancelled)
    }

    /// All orders in id order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Store a new open order under the next id.
    pub fn make_order(
        &mut self,
        creator: AccountId,
        asset_get: Asset,
        amount_get: Amount,
        asset_give: Asset,
        amount_give: Amount,
        timestamp: i64,
    ) -> Result<OrderCreated, ExchangeError> {
        let asset_get = asset_get.checked().ok_or(ExchangeError::InvalidAsset)?;
        let asset_give = asset_give.checked().ok_or(ExchangeError::InvalidAsset)?;
        let id = OrderId::new(self.order_count())
            .next()
            .ok_or(ExchangeError::ArithmeticOverflow)?;
        let order = Order::new(
            id,
            creator,
            asset_get,
            amount_get,
            asset_give,
            amount_give,
            timestamp,
        );
        let event = OrderCreated::from_order(&order);
        self.orders.push(order);

        info!(order_id = %id, %creator, %asset_get, %amount_get, %asset_give, %amount_give, "Order created");
        Ok(event)
    }

    /// Cancel an open order. Only its creator may do so.
    pub fn cancel_order(
        &mut self,
        caller: AccountId,
        id: OrderId,
        timestamp: i64,
    ) -> Result<OrderCancelled, ExchangeError> {
        let order = self.get_order_mut(id)?;
        if order.creator != caller {
            return Err(ExchangeError::Unauthorized {
                caller,
                order_id: id.get(),
            });
        }
        order.mark_cancelled()?;

        info!(order_id = %id, %caller, "Order cancelled");
        Ok(OrderCancelled::from_order(order, timestamp))
    }

    /// Existing order or `InvalidOrderId`.
    pub fn get(&self, id: OrderId) -> Result<&Order, ExchangeError> {
        self.get_order(id)
            .ok_or(ExchangeError::InvalidOrderId { order_id: id.get() })
    }

    pub(crate) fn get_order_mut(&mut self, id: OrderId) -> Result<&mut Order, ExchangeError> {
        let invalid = ExchangeError::InvalidOrderId { order_id: id.get() };
        let index = id
            .get()
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| invalid.clone())?;
        self.orders.get_mut(index).ok_or(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_types::order::OrderStatus;

    fn make(book: &mut OrderBook, creator: AccountId) -> OrderCreated {
        book.make_order(
            creator,
            Asset::Token(AccountId::new()),
            Amount::tokens(1),
            Asset::Native,
            Amount::tokens(1),
            1_000,
        )
        .unwrap()
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut book = OrderBook::new();
        let ids: Vec<u64> = (0..3).map(|_| make(&mut book, AccountId::new()).id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(book.order_count(), 3);
    }

    #[test]
    fn test_stored_fields_match_inputs() {
        let mut book = OrderBook::new();
        let creator = AccountId::new();
        let token = Asset::Token(AccountId::new());
        let event = book
            .make_order(creator, token, Amount::new(7), Asset::Native, Amount::new(9), 42)
            .unwrap();

        let order = book.get_order(event.id).unwrap();
        assert_eq!(order.creator, creator);
        assert_eq!(order.asset_get, token);
        assert_eq!(order.amount_get, Amount::new(7));
        assert_eq!(order.asset_give, Asset::Native);
        assert_eq!(order.amount_give, Amount::new(9));
        assert_eq!(order.created_at, 42);
        assert_eq!(order.status(), OrderStatus::Open);
        assert_eq!(event.timestamp, 42);
    }

    #[test]
    fn test_zero_token_contract_rejected() {
        let mut book = OrderBook::new();
        let zero = Asset::Token(AccountId::ZERO);
        let creator = AccountId::new();
        assert_eq!(
            book.make_order(creator, zero, Amount::new(1), Asset::Native, Amount::new(1), 1),
            Err(ExchangeError::InvalidAsset)
        );
        assert_eq!(
            book.make_order(creator, Asset::Native, Amount::new(1), zero, Amount::new(1), 1),
            Err(ExchangeError::InvalidAsset)
        );
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn test_lookup_out_of_range() {
        let mut book = OrderBook::new();
        make(&mut book, AccountId::new());
        assert!(book.get_order(OrderId::new(0)).is_none());
        assert!(book.get_order(OrderId::new(2)).is_none());
        assert!(!book.is_filled(OrderId::new(9)));
        assert!(!book.is_cancelled(OrderId::new(9)));
        assert_eq!(
            book.get(OrderId::new(0)),
            Err(ExchangeError::InvalidOrderId { order_id: 0 })
        );
    }

    #[test]
    fn test_cancel_by_creator() {
        let mut book = OrderBook::new();
        let creator = AccountId::new();
        let id = make(&mut book, creator).id;
        let event = book.cancel_order(creator, id, 2_000).unwrap();

        assert_eq!(event.id, id);
        assert_eq!(event.timestamp, 2_000);
        assert!(book.is_cancelled(id));
        assert!(!book.is_filled(id));
    }

    #[test]
    fn test_cancel_by_other_rejected() {
        let mut book = OrderBook::new();
        let creator = AccountId::new();
        let intruder = AccountId::new();
        let id = make(&mut book, creator).id;

        assert_eq!(
            book.cancel_order(intruder, id, 2_000),
            Err(ExchangeError::Unauthorized {
                caller: intruder,
                order_id: 1
            })
        );
        assert!(!book.is_cancelled(id));
    }

    #[test]
    fn test_cancel_twice_rejected() {
        let mut book = OrderBook::new();
        let creator = AccountId::new();
        let id = make(&mut book, creator).id;
        book.cancel_order(creator, id, 2_000).unwrap();
        assert_eq!(
            book.cancel_order(creator, id, 2_001),
            Err(ExchangeError::OrderAlreadyCancelled { order_id: 1 })
        );
    }

    #[test]
    fn test_cancel_filled_rejected() {
        let mut book = OrderBook::new();
        let creator = AccountId::new();
        let id = make(&mut book, creator).id;
        book.get_order_mut(id).unwrap().mark_filled().unwrap();
        assert_eq!(
            book.cancel_order(creator, id, 2_000),
            Err(ExchangeError::OrderAlreadyFilled { order_id: 1 })
        );
    }

    #[test]
    fn test_cancel_unknown_id() {
        let mut book = OrderBook::new();
        assert_eq!(
            book.cancel_order(AccountId::new(), OrderId::new(1), 2_000),
            Err(ExchangeError::InvalidOrderId { order_id: 1 })
        );
    }
}
