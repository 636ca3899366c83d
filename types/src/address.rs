//! Wallet address type.

use crate::QolError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A wallet address, the only actor identity the core relies on.
///
/// The address is the string form of the connected wallet's public key. The
/// core treats it as opaque: it must be non-empty, contain no whitespace, and
/// fit in [`WalletAddress::MAX_LEN`] bytes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Upper bound on the encoded address length.
    pub const MAX_LEN: usize = 64;

    /// Create a new wallet address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed address. Use
    /// [`WalletAddress::parse`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        match Self::parse(raw) {
            Ok(addr) => addr,
            Err(e) => panic!("{e}"),
        }
    }

    /// Parse and validate a wallet address.
    pub fn parse(raw: impl Into<String>) -> Result<Self, QolError> {
        let s = raw.into();
        if s.is_empty() || s.len() > Self::MAX_LEN || s.chars().any(char::is_whitespace) {
            return Err(QolError::InvalidAddress(s));
        }
        Ok(Self(s))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log lines and CLI output (`G2T9S4…9HpZ`).
    pub fn short(&self) -> String {
        if self.0.len() <= 12 || !self.0.is_ascii() {
            return self.0.clone();
        }
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = QolError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<WalletAddress> for String {
    fn from(addr: WalletAddress) -> Self {
        addr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(WalletAddress::parse("").is_err());
        assert!(WalletAddress::parse("abc def").is_err());
        assert!(WalletAddress::parse("x".repeat(65)).is_err());
    }

    #[test]
    fn accepts_base58_key() {
        let addr = WalletAddress::parse("7nksWK6rfJHxQE4TxfUCNjqgaBNXKtLvpAqjHjLW9HpZ").unwrap();
        assert_eq!(addr.short(), "7nksWK…9HpZ");
    }

    #[test]
    fn short_keeps_small_addresses() {
        assert_eq!(WalletAddress::new("user-123").short(), "user-123");
    }

    #[test]
    fn deserialize_validates() {
        let ok: WalletAddress = serde_json::from_str("\"user-456\"").unwrap();
        assert_eq!(ok.as_str(), "user-456");
        assert!(serde_json::from_str::<WalletAddress>("\"\"").is_err());
    }
}
