//! Execution environment
//!
//! The exchange runs on a chain it does not implement: the chain supplies
//! block time, moves native currency between wallets, and hosts the token
//! contracts. `LocalChain` is an in-memory stand-in.

use chrono::Utc;
use exchange_types::ids::AccountId;
use exchange_types::numeric::Amount;
use std::collections::{HashMap, HashSet};
use tracing::info;

use crate::errors::TokenError;
use crate::token::{Erc20Token, FungibleToken};

/// Services the exchange consumes from its execution environment.
pub trait Chain: Send + Sync {
    type Token: FungibleToken;

    /// Current block time in Unix seconds. Never decreases.
    fn timestamp(&self) -> i64;

    /// Native currency held in `account`'s wallet (outside the exchange).
    fn native_balance(&self, account: &AccountId) -> Amount;

    /// Move native currency between wallets.
    fn transfer_native(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError>;

    /// Token contract deployed at `contract`.
    fn token(&self, contract: &AccountId) -> Option<&Self::Token>;

    fn token_mut(&mut self, contract: &AccountId) -> Option<&mut Self::Token>;
}

/// In-memory chain: native wallets, deployed tokens and a manual clock.
#[derive(Debug)]
pub struct LocalChain {
    timestamp: i64,
    native: HashMap<AccountId, Amount>,
    tokens: HashMap<AccountId, Erc20Token>,
    /// Accounts whose wallets refuse incoming native transfers
    rejecting: HashSet<AccountId>,
}

impl LocalChain {
    /// New chain with the clock at the current wall time.
    pub fn new() -> Self {
        Self::at(Utc::now().timestamp())
    }

    /// New chain with the clock at `timestamp`.
    pub fn at(timestamp: i64) -> Self {
        Self {
            timestamp,
            native: HashMap::new(),
            tokens: HashMap::new(),
            rejecting: HashSet::new(),
        }
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&mut self, seconds: i64) {
        self.timestamp = self.timestamp.saturating_add(seconds.max(0));
    }

    /// Set the clock. Earlier times are ignored.
    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = self.timestamp.max(timestamp);
    }

    /// Mint native currency into a wallet (genesis allocation).
    pub fn fund_native(&mut self, account: AccountId, amount: Amount) -> Result<(), TokenError> {
        let balance = self.native_balance(&account);
        let balance = balance.checked_add(amount).ok_or(TokenError::Overflow)?;
        self.native.insert(account, balance);
        Ok(())
    }

    /// Make `account`'s wallet refuse (or accept again) native transfers.
    pub fn set_rejects_native(&mut self, account: AccountId, rejects: bool) {
        if rejects {
            self.rejecting.insert(account);
        } else {
            self.rejecting.remove(&account);
        }
    }

    /// Deploy a token contract and return its address.
    pub fn deploy_token(&mut self, token: Erc20Token) -> AccountId {
        let contract = AccountId::new();
        info!(%contract, symbol = token.symbol(), "Deployed token contract");
        self.tokens.insert(contract, token);
        contract
    }
}

impl Default for LocalChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain for LocalChain {
    type Token = Erc20Token;

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn native_balance(&self, account: &AccountId) -> Amount {
        self.native.get(account).copied().unwrap_or(Amount::ZERO)
    }

    fn transfer_native(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        if self.rejecting.contains(&to) {
            return Err(TokenError::Rejected { account: to });
        }
        let available = self.native_balance(&from);
        let from_balance = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                required: amount,
                available,
            })?;
        if from != to {
            let to_balance = self
                .native_balance(&to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            self.native.insert(from, from_balance);
            self.native.insert(to, to_balance);
        }
        Ok(())
    }

    fn token(&self, contract: &AccountId) -> Option<&Erc20Token> {
        self.tokens.get(contract)
    }

    fn token_mut(&mut self, contract: &AccountId) -> Option<&mut Erc20Token> {
        self.tokens.get_mut(contract)
    }
}
