//! Exchange core: custody ledger, order book and trade settlement
//!
//! This crate implements the contract layer of a two-asset exchange (native
//! currency plus fungible tokens): per-account custodial balances, limit
//! orders, and atomic fills with a proportional fee.
//!
//! # Modules
//! - `errors`: Exchange, ledger, token and configuration errors
//! - `events`: Deposit / Withdraw / Order / Cancel / Trade events and the event log
//! - `ledger`: (asset, account) balances with staged, all-or-nothing batches
//! - `token`: Consumed fungible-token interface and an in-memory ERC-20
//! - `chain`: Execution environment (clock, native transfers, token lookup)
//! - `gateway`: Deposits and withdrawals across the custody boundary
//! - `orderbook`: Order storage, id allocation and cancellation
//! - `matching`: Fee computation and four-way fill settlement
//! - `commitment`: State root over ledger and order book
//! - `config`: Immutable exchange configuration
//! - `exchange`: The facade tying the components together
//! - `shared`: Thread-safe single-writer handle
//!
//! # Version
//! v0.1.0

pub mod errors;
pub mod events;
pub mod ledger;
pub mod token;
pub mod chain;
pub mod gateway;
pub mod orderbook;
pub mod matching;
pub mod commitment;
pub mod config;
pub mod exchange;
pub mod shared;

pub use config::ExchangeConfig;
pub use errors::{ConfigError, ExchangeError, LedgerError, TokenError};
pub use exchange::Exchange;
pub use shared::SharedExchange;

/// Contract ABI version, frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
