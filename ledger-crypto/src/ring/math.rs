//! Modular arithmetic over arbitrary-precision integers.

use crate::errors::LedgerCryptoError;

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Represents the ring Z_k for an arbitrary-precision modulus `k`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ModRing {
    modulus: BigUint,
}

impl ModRing {
    /// Create a new ring with the given modulus.
    ///
    /// The modulus must be greater than 1.
    ///
    /// # Example
    ///
    /// ```
    /// # use ledger_crypto::ring::ModRing;
    /// # use num_bigint::BigUint;
    /// assert!(ModRing::try_with(BigUint::from(13u32)).is_ok());
    /// assert!(ModRing::try_with(BigUint::from(1u32)).is_err());
    /// ```
    pub fn try_with(modulus: BigUint) -> Result<Self, LedgerCryptoError> {
        if modulus <= BigUint::one() {
            return Err(LedgerCryptoError::InvalidModulus(format!(
                "Modulus must be greater than 1, got {}",
                modulus
            )));
        }

        Ok(ModRing { modulus })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Reduces a value into `[0, modulus - 1]`.
    pub fn normalize(&self, value: &BigUint) -> BigUint {
        value % &self.modulus
    }

    /// Returns true if `value` is already a canonical representative.
    pub fn contains(&self, value: &BigUint) -> bool {
        value < &self.modulus
    }

    /// Computes `(a * b) mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use ledger_crypto::ring::ModRing;
    /// # use num_bigint::BigUint;
    /// let ring = ModRing::try_with(BigUint::from(10u32)).unwrap();
    /// assert_eq!(ring.mul(&7u32.into(), &5u32.into()), BigUint::from(5u32));
    /// ```
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    /// Computes `base^exponent mod modulus`.
    pub fn pow(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        if exponent.is_zero() {
            return BigUint::one();
        }

        base.modpow(exponent, &self.modulus)
    }

    /// Computes the multiplicative inverse `a^-1 mod modulus`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerCryptoError::NonInvertible` if `gcd(a, modulus) != 1`.
    pub fn inv(&self, a: &BigUint) -> Result<BigUint, LedgerCryptoError> {
        a.modinv(&self.modulus).ok_or_else(|| {
            LedgerCryptoError::NonInvertible(format!(
                "{} has no inverse mod {}",
                self.normalize(a),
                self.modulus
            ))
        })
    }
}
