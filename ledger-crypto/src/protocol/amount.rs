//! Conversion between decimal currency amounts and integer minor units.

use crate::errors::LedgerCryptoError;

use num_bigint::BigUint;

/// Converts a decimal amount into minor units with `round(amount * 100)`.
///
/// # Errors
///
/// `InvalidAmount` for negative, non-finite or unrepresentably large amounts.
///
/// # Example
///
/// ```
/// # use ledger_crypto::protocol::amount::to_minor_units;
/// assert_eq!(to_minor_units(100.0).unwrap(), 10_000);
/// assert_eq!(to_minor_units(19.999).unwrap(), 2_000);
/// assert!(to_minor_units(-1.0).is_err());
/// assert!(to_minor_units(f64::NAN).is_err());
/// ```
pub fn to_minor_units(amount: f64) -> Result<u64, LedgerCryptoError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(LedgerCryptoError::InvalidAmount(format!(
            "Amount must be a finite, non-negative number, got {}",
            amount
        )));
    }

    let cents = (amount * 100.0).round();
    if cents >= u64::MAX as f64 {
        return Err(LedgerCryptoError::InvalidAmount(format!(
            "Amount {} does not fit in 64-bit minor units",
            amount
        )));
    }

    Ok(cents as u64)
}

/// Renders minor units as a decimal string with two fractional digits.
///
/// # Example
///
/// ```
/// # use ledger_crypto::protocol::amount::format_minor_units;
/// # use num_bigint::BigUint;
/// assert_eq!(format_minor_units(&BigUint::from(400_005u32)), "4000.05");
/// assert_eq!(format_minor_units(&BigUint::from(7u32)), "0.07");
/// ```
pub fn format_minor_units(cents: &BigUint) -> String {
    let hundred = BigUint::from(100u32);
    format!("{}.{:02}", cents / &hundred, cents % &hundred)
}

/// Distance between `a` and `b` on the cycle Z_n.
pub fn modular_distance(a: &BigUint, b: &BigUint, n: &BigUint) -> BigUint {
    let a = a % n;
    let b = b % n;
    let direct = if a >= b { &a - &b } else { &b - &a };
    let wrapped = n - &direct;

    direct.min(wrapped)
}
