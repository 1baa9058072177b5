//! Ledger
//!
//! Custodial balances keyed by (asset, account)
//!
//! The ledger is the single source of truth for funds held by the exchange.
//! Writes go through `credit` / `debit`, either directly or staged in a
//! [`LedgerBatch`]. A batch is an overlay over the committed balances: it
//! validates every step against the balances it has already staged, and
//! nothing reaches the ledger until the caller commits the resulting
//! [`Changeset`]. Dropping a batch discards it.

use exchange_types::asset::Asset;
use exchange_types::ids::AccountId;
use exchange_types::numeric::Amount;
use std::collections::HashMap;
use tracing::debug;

use crate::errors::LedgerError;

type Key = (Asset, AccountId);

/// Committed balances. Zero balances are not stored.
#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<Key, Amount>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance for `(asset, account)`; 0 for keys never credited.
    pub fn balance_of(&self, asset: &Asset, account: &AccountId) -> Amount {
        self.balances
            .get(&(*asset, *account))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Add `amount` and commit immediately. Returns the new balance.
    pub fn credit(
        &mut self,
        asset: Asset,
        account: AccountId,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        let mut batch = self.batch();
        let balance = batch.credit(asset, account, amount)?;
        let changes = batch.into_changeset();
        self.commit(changes);
        Ok(balance)
    }

    /// Subtract `amount` and commit immediately. Returns the new balance.
    pub fn debit(
        &mut self,
        asset: Asset,
        account: AccountId,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        let mut batch = self.batch();
        let balance = batch.debit(asset, account, amount)?;
        let changes = batch.into_changeset();
        self.commit(changes);
        Ok(balance)
    }

    /// Start staging changes against the current balances.
    pub fn batch(&self) -> LedgerBatch<'_> {
        LedgerBatch {
            base: self,
            staged: HashMap::new(),
        }
    }

    /// Apply a changeset produced by a batch over this ledger.
    pub fn commit(&mut self, changes: Changeset) {
        for ((asset, account), balance) in changes.entries {
            if balance.is_zero() {
                self.balances.remove(&(asset, account));
            } else {
                self.balances.insert((asset, account), balance);
            }
        }
    }

    /// Sum of all custodial claims on `asset`.
    pub fn total_of(&self, asset: &Asset) -> Result<Amount, LedgerError> {
        self.balances
            .iter()
            .filter(|((a, _), _)| a == asset)
            .try_fold(Amount::ZERO, |acc, (_, amount)| {
                acc.checked_add(*amount).ok_or(LedgerError::Overflow)
            })
    }

    /// Non-zero entries sorted by (asset, account).
    pub fn entries(&self) -> Vec<(Asset, AccountId, Amount)> {
        let mut entries: Vec<_> = self
            .balances
            .iter()
            .map(|((asset, account), amount)| (*asset, *account, *amount))
            .collect();
        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        entries
    }
}

/// Staged balance changes over a committed [`Ledger`].
#[derive(Debug)]
pub struct LedgerBatch<'a> {
    base: &'a Ledger,
    staged: HashMap<Key, Amount>,
}

impl<'a> LedgerBatch<'a> {
    /// Balance as seen through the staged changes.
    pub fn balance_of(&self, asset: &Asset, account: &AccountId) -> Amount {
        self.staged
            .get(&(*asset, *account))
            .copied()
            .unwrap_or_else(|| self.base.balance_of(asset, account))
    }

    pub fn credit(
        &mut self,
        asset: Asset,
        account: AccountId,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        let current = self.balance_of(&asset, &account);
        let balance = current.checked_add(amount).ok_or(LedgerError::Overflow)?;
        debug!(%asset, %account, %amount, %balance, "Staged credit");
        self.staged.insert((asset, account), balance);
        Ok(balance)
    }

    pub fn debit(
        &mut self,
        asset: Asset,
        account: AccountId,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        let current = self.balance_of(&asset, &account);
        let balance = current
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                asset,
                account,
                required: amount,
                available: current,
            })?;
        debug!(%asset, %account, %amount, %balance, "Staged debit");
        self.staged.insert((asset, account), balance);
        Ok(balance)
    }

    /// Finish staging. The changeset holds final balances, not deltas.
    pub fn into_changeset(self) -> Changeset {
        Changeset {
            entries: self.staged.into_iter().collect(),
        }
    }
}

/// Final balances for every key touched by a batch.
#[derive(Debug, Default)]
pub struct Changeset {
    entries: Vec<(Key, Amount)>,
}

impl Changeset {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
