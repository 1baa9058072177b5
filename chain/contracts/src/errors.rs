//! Contract-specific error types
//!
//! Every error aborts the enclosing operation; nothing is retried and no
//! partial state survives.

use exchange_types::asset::Asset;
use exchange_types::errors::{AmountError, FeeError, OrderError};
use exchange_types::ids::AccountId;
use exchange_types::numeric::Amount;
use thiserror::Error;

/// Errors raised by the external token contract or native transfer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient token balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("Insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance { required: Amount, available: Amount },

    #[error("Invalid recipient: zero address")]
    InvalidRecipient,

    #[error("Recipient {account} rejected the transfer")]
    Rejected { account: AccountId },

    #[error("No token contract deployed at {contract}")]
    UnknownToken { contract: AccountId },

    #[error("Arithmetic overflow in token balance")]
    Overflow,
}

/// Ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance of {asset} for {account}: required {required}, available {available}")]
    InsufficientBalance {
        asset: Asset,
        account: AccountId,
        required: Amount,
        available: Amount,
    },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid fee: {0}")]
    Fee(#[from] FeeError),

    #[error("Fee account cannot be the zero address")]
    InvalidFeeAccount,

    #[error("Malformed configuration: {0}")]
    Parse(String),
}

/// Exchange operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Invalid asset: native currency is not a token")]
    InvalidAsset,

    #[error("Insufficient balance of {asset} for {account}: required {required}, available {available}")]
    InsufficientBalance {
        asset: Asset,
        account: AccountId,
        required: Amount,
        available: Amount,
    },

    #[error("Unauthorized: {caller} did not create order {order_id}")]
    Unauthorized { caller: AccountId, order_id: u64 },

    #[error("Invalid order id: {order_id}")]
    InvalidOrderId { order_id: u64 },

    #[error("Order {order_id} is already filled")]
    OrderAlreadyFilled { order_id: u64 },

    #[error("Order {order_id} is already cancelled")]
    OrderAlreadyCancelled { order_id: u64 },

    #[error("External transfer failed: {0}")]
    ExternalTransferFailure(TokenError),

    #[error("Direct payments are rejected; use the deposit entry point")]
    DirectPaymentRejected,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl From<LedgerError> for ExchangeError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance {
                asset,
                account,
                required,
                available,
            } => ExchangeError::InsufficientBalance {
                asset,
                account,
                required,
                available,
            },
            LedgerError::Overflow => ExchangeError::ArithmeticOverflow,
        }
    }
}

impl From<OrderError> for ExchangeError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::AlreadyFilled { order_id } => ExchangeError::OrderAlreadyFilled { order_id },
            OrderError::AlreadyCancelled { order_id } => {
                ExchangeError::OrderAlreadyCancelled { order_id }
            }
        }
    }
}

impl From<AmountError> for ExchangeError {
    fn from(_: AmountError) -> Self {
        ExchangeError::ArithmeticOverflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_display() {
        let err = LedgerError::InsufficientBalance {
            asset: Asset::Native,
            account: AccountId::ZERO,
            required: Amount::new(1000),
            available: Amount::new(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("NATIVE"));
        assert!(msg.contains("1000"));
    }

    #[test]
    fn test_exchange_error_from_ledger() {
        let err: ExchangeError = LedgerError::Overflow.into();
        assert_eq!(err, ExchangeError::ArithmeticOverflow);
    }

    #[test]
    fn test_exchange_error_from_order() {
        let err: ExchangeError = OrderError::AlreadyFilled { order_id: 4 }.into();
        assert_eq!(err, ExchangeError::OrderAlreadyFilled { order_id: 4 });
    }

    #[test]
    fn test_external_transfer_failure_display() {
        let err = ExchangeError::ExternalTransferFailure(TokenError::InsufficientAllowance {
            required: Amount::new(10),
            available: Amount::ZERO,
        });
        assert!(err.to_string().contains("allowance"));
    }

    #[test]
    fn test_config_error_from_fee() {
        let err: ConfigError = FeeError::PercentOutOfRange(120).into();
        assert!(matches!(err, ConfigError::Fee(_)));
    }
}
