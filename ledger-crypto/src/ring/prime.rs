//! Prime number generation and testing.

use crate::errors::LedgerCryptoError;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use rand::CryptoRng;

/// Small primes for trial division and as Miller–Rabin witnesses.
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97,
];

/// Upper bound on candidates drawn per requested prime bit.
const CANDIDATES_PER_BIT: usize = 64;

/// Checks if `n` is probably prime using the Miller–Rabin test.
///
/// `rounds` witnesses are taken from the small primes table, capped at its length.
pub fn is_probable_prime(n: &BigUint, rounds: usize) -> bool {
    if n < &BigUint::from(2u32) {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n - 1 = 2^s * d with d odd
    let one = BigUint::one();
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for &a in SMALL_PRIMES.iter().take(rounds.max(1)) {
        let mut x = BigUint::from(a).modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Generates a random probable prime with exactly `bits` bits.
///
/// # Errors
///
/// Returns `LedgerCryptoError::InvalidParameters` for fewer than 3 bits and
/// `LedgerCryptoError::RandomnessExhausted` if no prime turns up within the candidate budget.
pub fn generate_prime(
    bits: u64,
    rounds: usize,
    rng: &mut impl CryptoRng,
) -> Result<BigUint, LedgerCryptoError> {
    if bits < 3 {
        return Err(LedgerCryptoError::InvalidParameters(format!(
            "Prime size must be at least 3 bits, got {}",
            bits
        )));
    }

    let byte_len = bits.div_ceil(8) as usize;
    let excess_bits = byte_len as u64 * 8 - bits;
    let mut buf = vec![0u8; byte_len];
    let budget = CANDIDATES_PER_BIT * bits as usize;

    for _ in 0..budget {
        rng.fill_bytes(&mut buf);
        let mut candidate = BigUint::from_bytes_be(&buf) >> excess_bits;
        candidate.set_bit(bits - 1, true);
        if candidate.is_even() {
            candidate += 1u32;
        }

        if candidate.bits() == bits && is_probable_prime(&candidate, rounds) {
            return Ok(candidate);
        }
    }

    Err(LedgerCryptoError::RandomnessExhausted(budget))
}
