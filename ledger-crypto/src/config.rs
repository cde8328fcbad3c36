use crate::errors::LedgerCryptoError;

use serde::{Deserialize, Serialize};

/// Tunables shared by key generation, encryption and reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Smallest modulus size accepted by [`crate::KeyPair::generate`].
    pub min_key_bits: u64,
    /// Miller–Rabin witnesses used when checking primes.
    pub miller_rabin_rounds: usize,
    /// Draws allowed when sampling encryption randomness coprime to n.
    pub max_coprime_retries: usize,
    /// Allowed gap between declared and recovered totals, in minor units.
    pub tolerance_cents: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_key_bits: 32,
            miller_rabin_rounds: 16,
            max_coprime_retries: 1000,
            tolerance_cents: 1,
        }
    }
}

impl LedgerConfig {
    /// Parses a JSON config. Missing fields fall back to [`LedgerConfig::default`].
    ///
    /// # Example
    ///
    /// ```
    /// # use ledger_crypto::LedgerConfig;
    /// let config = LedgerConfig::from_json(r#"{ "tolerance_cents": 0 }"#).unwrap();
    /// assert_eq!(config.tolerance_cents, 0);
    /// assert_eq!(config.max_coprime_retries, 1000);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, LedgerCryptoError> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LedgerCryptoError> {
        if self.min_key_bits < 8 {
            return Err(LedgerCryptoError::InvalidParameters(format!(
                "min_key_bits must be >= 8, got {}",
                self.min_key_bits
            )));
        }
        if self.miller_rabin_rounds == 0 {
            return Err(LedgerCryptoError::InvalidParameters(
                "miller_rabin_rounds must be > 0".to_string(),
            ));
        }
        if self.max_coprime_retries == 0 {
            return Err(LedgerCryptoError::InvalidParameters(
                "max_coprime_retries must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
