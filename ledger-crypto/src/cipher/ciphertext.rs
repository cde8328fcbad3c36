use crate::codec;
use crate::errors::LedgerCryptoError;

use num_bigint::BigUint;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A Paillier ciphertext, an element of Z*_{n²} for some public key.
///
/// The value itself carries no reference to its key; functions taking a key check that it
/// is in range before doing any exponentiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ciphertext(#[serde(with = "codec::decimal")] BigUint);

impl Ciphertext {
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn into_inner(self) -> BigUint {
        self.0
    }

    /// Parses a ciphertext written as a decimal string.
    ///
    /// # Example
    ///
    /// ```
    /// # use ledger_crypto::Ciphertext;
    /// assert!(Ciphertext::from_decimal_str("918273645").is_ok());
    /// assert!(Ciphertext::from_decimal_str("91827x645").is_err());
    /// ```
    pub fn from_decimal_str(input: &str) -> Result<Self, LedgerCryptoError> {
        codec::parse_decimal(input)
            .map(Self)
            .map_err(|e| LedgerCryptoError::MalformedCiphertext(e.to_string()))
    }
}

impl FromStr for Ciphertext {
    type Err = LedgerCryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BigUint> for Ciphertext {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}
