//! Types library for the native/token exchange
//!
//! Value types shared by the ledger, order book and matching engine. Every
//! amount is an unsigned count of the smallest indivisible unit; there is no
//! floating point anywhere in the settlement path.
//!
//! # Modules
//! - `ids`: Identifiers (AccountId, OrderId)
//! - `numeric`: Unsigned fixed-point amounts
//! - `asset`: Native currency vs. token contract tagging
//! - `order`: Order record and lifecycle
//! - `fee`: Proportional fee calculation
//! - `errors`: Error taxonomy for value-level failures

pub mod ids;
pub mod numeric;
pub mod asset;
pub mod order;
pub mod fee;
pub mod errors;

pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::asset::*;
    pub use crate::errors::*;
    pub use crate::fee::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
}
