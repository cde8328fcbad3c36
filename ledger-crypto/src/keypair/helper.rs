use crate::errors::LedgerCryptoError;

use num_bigint::BigUint;
use num_traits::Zero;

/// Paillier's `L(x) = (x - 1) / n`.
///
/// The division must be exact; anything else means `x` did not come from the subgroup
/// `{ y : y ≡ 1 mod n }` and is reported as a decryption failure.
///
/// # Example
///
/// ```
/// # use ledger_crypto::keypair::helper::l_function;
/// # use num_bigint::BigUint;
/// let n = BigUint::from(6u32);
/// assert_eq!(l_function(&13u32.into(), &n).unwrap(), BigUint::from(2u32));
/// assert!(l_function(&14u32.into(), &n).is_err());
/// ```
pub fn l_function(x: &BigUint, n: &BigUint) -> Result<BigUint, LedgerCryptoError> {
    if x.is_zero() || n.is_zero() {
        return Err(LedgerCryptoError::Decryption(
            "L(x) is undefined for x = 0 or n = 0".to_string(),
        ));
    }

    let shifted = x - 1u32;
    if !(&shifted % n).is_zero() {
        return Err(LedgerCryptoError::Decryption(format!(
            "{} - 1 is not divisible by {}",
            x, n
        )));
    }

    Ok(shifted / n)
}
