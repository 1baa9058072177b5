//! Token gateway
//!
//! Deposits and withdrawals across the custody boundary
//!
//! Every transfer is two-phase: the ledger change is staged first (which
//! validates balance and overflow), the external transfer runs second, and
//! the staged change is committed only after the external call succeeds. On
//! any failure the staged batch is dropped, so the ledger is untouched.

use exchange_types::asset::Asset;
use exchange_types::ids::AccountId;
use exchange_types::numeric::Amount;
use tracing::{info, warn};

use crate::chain::Chain;
use crate::errors::{ExchangeError, TokenError};
use crate::events::{Deposit, Withdraw};
use crate::ledger::Ledger;
use crate::token::FungibleToken;

/// Moves value between the ledger and the chain on behalf of `custody`,
/// the exchange's own address.
pub struct TokenGateway<'a, C: Chain> {
    ledger: &'a mut Ledger,
    chain: &'a mut C,
    custody: AccountId,
}

impl<'a, C: Chain> TokenGateway<'a, C> {
    pub fn new(ledger: &'a mut Ledger, chain: &'a mut C, custody: AccountId) -> Self {
        Self {
            ledger,
            chain,
            custody,
        }
    }

    /// Pull native currency from `account`'s wallet and credit it.
    pub fn deposit_native(
        &mut self,
        account: AccountId,
        amount: Amount,
    ) -> Result<Deposit, ExchangeError> {
        let mut batch = self.ledger.batch();
        let balance = batch.credit(Asset::Native, account, amount)?;
        let changes = batch.into_changeset();

        self.chain
            .transfer_native(account, self.custody, amount)
            .map_err(|e| external_failure(Asset::Native, account, e))?;

        self.ledger.commit(changes);
        info!(%account, %amount, %balance, "Native deposit");
        Ok(Deposit {
            asset: Asset::Native,
            account,
            amount,
            balance,
        })
    }

    /// Pull tokens via the allowance `account` granted the exchange, then credit them.
    pub fn deposit_token(
        &mut self,
        account: AccountId,
        token: Asset,
        amount: Amount,
    ) -> Result<Deposit, ExchangeError> {
        let contract = token_contract(token)?;

        let mut batch = self.ledger.batch();
        let balance = batch.credit(token, account, amount)?;
        let changes = batch.into_changeset();

        let custody = self.custody;
        self.token_mut(contract)?
            .transfer_from(custody, account, custody, amount)
            .map_err(|e| external_failure(token, account, e))?;

        self.ledger.commit(changes);
        info!(%account, asset = %token, %amount, %balance, "Token deposit");
        Ok(Deposit {
            asset: token,
            account,
            amount,
            balance,
        })
    }

    /// Debit native currency and send it to `account`'s wallet.
    pub fn withdraw_native(
        &mut self,
        account: AccountId,
        amount: Amount,
    ) -> Result<Withdraw, ExchangeError> {
        let mut batch = self.ledger.batch();
        let balance = batch.debit(Asset::Native, account, amount)?;
        let changes = batch.into_changeset();

        self.chain
            .transfer_native(self.custody, account, amount)
            .map_err(|e| external_failure(Asset::Native, account, e))?;

        self.ledger.commit(changes);
        info!(%account, %amount, %balance, "Native withdrawal");
        Ok(Withdraw {
            asset: Asset::Native,
            account,
            amount,
            balance,
        })
    }

    /// Debit tokens and transfer them out of custody to `account`.
    pub fn withdraw_token(
        &mut self,
        account: AccountId,
        token: Asset,
        amount: Amount,
    ) -> Result<Withdraw, ExchangeError> {
        let contract = token_contract(token)?;

        let mut batch = self.ledger.batch();
        let balance = batch.debit(token, account, amount)?;
        let changes = batch.into_changeset();

        let custody = self.custody;
        self.token_mut(contract)?
            .transfer(custody, account, amount)
            .map_err(|e| external_failure(token, account, e))?;

        self.ledger.commit(changes);
        info!(%account, asset = %token, %amount, %balance, "Token withdrawal");
        Ok(Withdraw {
            asset: token,
            account,
            amount,
            balance,
        })
    }

    fn token_mut(&mut self, contract: AccountId) -> Result<&mut C::Token, ExchangeError> {
        self.chain
            .token_mut(&contract)
            .ok_or(ExchangeError::ExternalTransferFailure(
                TokenError::UnknownToken { contract },
            ))
    }
}

/// Contract address of a token asset. Native currency and the zero
/// address are not tokens.
fn token_contract(token: Asset) -> Result<AccountId, ExchangeError> {
    if token.is_native() {
        return Err(ExchangeError::InvalidAsset);
    }
    token
        .checked()
        .and_then(|asset| asset.contract())
        .ok_or(ExchangeError::InvalidAsset)
}

fn external_failure(asset: Asset, account: AccountId, err: TokenError) -> ExchangeError {
    warn!(%asset, %account, error = %err, "External transfer failed");
    ExchangeError::ExternalTransferFailure(err)
}
