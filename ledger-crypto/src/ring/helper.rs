use crate::errors::LedgerCryptoError;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use rand::CryptoRng;

/// Draws a uniformly random integer in `[0, bound)` from a cryptographically secure source.
///
/// Rejection sampling over `bound.bits()` random bits, so each draw succeeds with
/// probability above 1/2.
pub fn sample_below(
    bound: &BigUint,
    rng: &mut impl CryptoRng,
) -> Result<BigUint, LedgerCryptoError> {
    if bound.is_zero() {
        return Err(LedgerCryptoError::InvalidParameters(
            "Sampling bound must be positive".to_string(),
        ));
    }

    let bits = bound.bits();
    let byte_len = bits.div_ceil(8) as usize;
    let excess_bits = byte_len as u64 * 8 - bits;
    let mut buf = vec![0u8; byte_len];

    loop {
        rng.fill_bytes(&mut buf);
        let candidate = BigUint::from_bytes_be(&buf) >> excess_bits;
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Draws `r` uniformly from `[1, n-1]` with `gcd(r, n) = 1`.
///
/// Gives up with [`LedgerCryptoError::RandomnessExhausted`] after `max_retries` draws.
pub fn sample_coprime(
    n: &BigUint,
    max_retries: usize,
    rng: &mut impl CryptoRng,
) -> Result<BigUint, LedgerCryptoError> {
    for _ in 0..max_retries {
        let r = sample_below(n, rng)?;
        if r.is_zero() {
            continue;
        }
        if r.gcd(n).is_one() {
            return Ok(r);
        }
    }

    Err(LedgerCryptoError::RandomnessExhausted(max_retries))
}
