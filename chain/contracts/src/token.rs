//! Fungible token interface consumed by the exchange
//!
//! The token contract is an external collaborator with its own bookkeeping;
//! the exchange only calls the operations below. `Erc20Token` is an
//! in-memory implementation used by `LocalChain` and the test-suites.

use exchange_types::ids::AccountId;
use exchange_types::numeric::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::TokenError;

/// Operations the exchange consumes from a token contract.
///
/// `caller` is the account invoking the contract (the transaction sender).
pub trait FungibleToken: Send + Sync {
    fn name(&self) -> &str;
    fn symbol(&self) -> &str;
    fn decimals(&self) -> u8;
    fn total_supply(&self) -> Amount;

    fn balance_of(&self, owner: &AccountId) -> Amount;
    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount;

    /// Move `amount` from `caller` to `to`.
    fn transfer(&mut self, caller: AccountId, to: AccountId, amount: Amount)
        -> Result<(), TokenError>;

    /// Let `spender` move up to `amount` of `caller`'s tokens.
    fn approve(
        &mut self,
        caller: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to`, spending `caller`'s allowance.
    fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError>;
}

/// Events emitted by the token contract itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    Transfer {
        from: AccountId,
        to: AccountId,
        value: Amount,
    },
    Approval {
        owner: AccountId,
        spender: AccountId,
        value: Amount,
    },
}

/// In-memory ERC-20 style token.
///
/// The whole supply is minted to the deployer at construction.
#[derive(Debug, Clone)]
pub struct Erc20Token {
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: Amount,
    balances: HashMap<AccountId, Amount>,
    allowances: HashMap<(AccountId, AccountId), Amount>,
    events: Vec<TokenEvent>,
}

impl Erc20Token {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        total_supply: Amount,
        deployer: AccountId,
    ) -> Self {
        let mut balances = HashMap::new();
        balances.insert(deployer, total_supply);
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            total_supply,
            balances,
            allowances: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// "DApp Token" (DAPP), 18 decimals, one million tokens.
    pub fn dapp(deployer: AccountId) -> Self {
        Self::new("DApp Token", "DAPP", 18, Amount::tokens(1_000_000), deployer)
    }

    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Validate then apply a balance move. Nothing changes on error.
    fn move_balance(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        let available = self.balance_of(&from);
        let from_balance = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                required: amount,
                available,
            })?;
        if from != to {
            let to_balance = self
                .balance_of(&to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            self.balances.insert(from, from_balance);
            self.balances.insert(to, to_balance);
        }
        self.events.push(TokenEvent::Transfer {
            from,
            to,
            value: amount,
        });
        Ok(())
    }
}

impl FungibleToken for Erc20Token {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn balance_of(&self, owner: &AccountId) -> Amount {
        self.balances.get(owner).copied().unwrap_or(Amount::ZERO)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn transfer(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.move_balance(caller, to, amount)
    }

    fn approve(
        &mut self,
        caller: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if spender.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        self.allowances.insert((caller, spender), amount);
        self.events.push(TokenEvent::Approval {
            owner: caller,
            spender,
            value: amount,
        });
        Ok(())
    }

    fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let allowed = self.allowance(&from, &caller);
        let remaining = allowed
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance {
                required: amount,
                available: allowed,
            })?;
        self.move_balance(from, to, amount)?;
        self.allowances.insert((from, caller), remaining);
        Ok(())
    }
}
