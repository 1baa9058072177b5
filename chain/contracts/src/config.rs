//! Exchange configuration
//!
//! Fixed at construction; nothing in the exchange can change it afterwards.

use exchange_types::fee::FeePercent;
use exchange_types::ids::AccountId;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Fee account and fee percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExchangeConfig")]
pub struct ExchangeConfig {
    fee_account: AccountId,
    fee_percent: FeePercent,
}

#[derive(Deserialize)]
struct RawExchangeConfig {
    fee_account: AccountId,
    fee_percent: FeePercent,
}

impl TryFrom<RawExchangeConfig> for ExchangeConfig {
    type Error = ConfigError;

    fn try_from(raw: RawExchangeConfig) -> Result<Self, Self::Error> {
        Self::with_fee(raw.fee_account, raw.fee_percent)
    }
}

impl ExchangeConfig {
    /// Validate and build. `fee_percent` must be within `0..=100`.
    pub fn new(fee_account: AccountId, fee_percent: u64) -> Result<Self, ConfigError> {
        Self::with_fee(fee_account, FeePercent::new(fee_percent)?)
    }

    pub fn with_fee(fee_account: AccountId, fee_percent: FeePercent) -> Result<Self, ConfigError> {
        if fee_account.is_zero() {
            return Err(ConfigError::InvalidFeeAccount);
        }
        Ok(Self {
            fee_account,
            fee_percent,
        })
    }

    /// Parse from JSON: `{"fee_account": "<uuid>", "fee_percent": 10}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn fee_account(&self) -> AccountId {
        self.fee_account
    }

    pub fn fee_percent(&self) -> FeePercent {
        self.fee_percent
    }
}
