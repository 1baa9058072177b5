//! Error types for value-level operations
//!
//! Exchange-level failures live in the contracts crate; these cover the
//! arithmetic and lifecycle rules enforced by the types themselves.

use thiserror::Error;

/// Amount conversion and arithmetic errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Arithmetic overflow in amount calculation")]
    Overflow,

    #[error("Amount cannot be negative: {value}")]
    Negative { value: String },

    #[error("Amount has more than {max_decimals} decimal places: {value}")]
    TooPrecise { value: String, max_decimals: u32 },

    #[error("Amount out of representable range: {value}")]
    OutOfRange { value: String },
}

/// Fee configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeeError {
    #[error("Fee percent must be within 0..=100, got {0}")]
    PercentOutOfRange(u64),
}

/// Order state transition errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Order {order_id} is already filled")]
    AlreadyFilled { order_id: u64 },

    #[error("Order {order_id} is already cancelled")]
    AlreadyCancelled { order_id: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_error_display() {
        let err = AmountError::TooPrecise {
            value: "0.0000000000000000001".to_string(),
            max_decimals: 18,
        };
        assert!(err.to_string().contains("18"));
    }

    #[test]
    fn test_order_error_display() {
        let err = OrderError::AlreadyCancelled { order_id: 3 };
        assert_eq!(err.to_string(), "Order 3 is already cancelled");
    }
}
