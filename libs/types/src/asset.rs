//! Asset tagging
//!
//! The ledger is keyed first by asset. Native currency and token contracts
//! are distinct variants rather than sharing one address space with a
//! reserved "zero address" marker.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::AccountId;

/// Native currency or a specific fungible-token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "contract", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Asset {
    /// The chain's native currency
    Native,
    /// A token held in custody, identified by its contract address
    Token(AccountId),
}

impl Asset {
    /// Tag a token contract. Returns `None` for the zero address, which
    /// cannot name a deployed contract.
    pub fn token(contract: AccountId) -> Option<Self> {
        if contract.is_zero() {
            None
        } else {
            Some(Asset::Token(contract))
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// `self`, unless it is a token tagged with the zero address.
    pub fn checked(self) -> Option<Self> {
        match self {
            Asset::Native => Some(Asset::Native),
            Asset::Token(contract) => Asset::token(contract),
        }
    }

    /// Contract address for token assets
    pub fn contract(&self) -> Option<AccountId> {
        match self {
            Asset::Native => None,
            Asset::Token(contract) => Some(*contract),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "NATIVE"),
            Asset::Token(contract) => write!(f, "TOKEN:{}", contract),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rejects_zero_address() {
        assert_eq!(Asset::token(AccountId::ZERO), None);
    }

    #[test]
    fn test_checked_rejects_zero_contract() {
        assert_eq!(Asset::Native.checked(), Some(Asset::Native));
        assert_eq!(Asset::Token(AccountId::ZERO).checked(), None);
        let token = Asset::Token(AccountId::new());
        assert_eq!(token.checked(), Some(token));
    }

    #[test]
    fn test_native_and_token_are_distinct() {
        let contract = AccountId::new();
        let token = Asset::token(contract).unwrap();
        assert_ne!(token, Asset::Native);
        assert!(!token.is_native());
        assert_eq!(token.contract(), Some(contract));
        assert_eq!(Asset::Native.contract(), None);
    }

    #[test]
    fn test_asset_serialization() {
        let json = serde_json::to_string(&Asset::Native).unwrap();
        assert_eq!(json, r#"{"kind":"NATIVE"}"#);

        let token = Asset::Token(AccountId::new());
        let json = serde_json::to_string(&token).unwrap();
        let deserialized: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(token, deserialized);
    }
}
