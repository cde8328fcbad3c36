//! # Cipher Module
//!
//! Stateless Paillier algorithms: encryption, decryption and homomorphic addition.
//!
//! Encryption is randomized, so two encryptions of the same plaintext are compared through
//! their decryptions, never by ciphertext equality.

pub mod ciphertext;

pub use ciphertext::Ciphertext;

use crate::config::LedgerConfig;
use crate::errors::LedgerCryptoError;
use crate::keypair::helper::l_function;
use crate::keypair::{PrivateKey, PublicKey};
use crate::ring::{ModRing, sample_coprime};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use rand::CryptoRng;

/// Encrypts `plaintext` under `public_key` using the default retry bound.
///
/// # Example
///
/// ```
/// # use ledger_crypto::{KeyPair, cipher};
/// # use num_bigint::BigUint;
/// let key_pair = KeyPair::from_primes(&1009u32.into(), &1013u32.into()).unwrap();
/// let mut rng = rand::rng();
///
/// let c = cipher::encrypt(&key_pair.public_key, &BigUint::from(1500u32), &mut rng).unwrap();
/// let m = cipher::decrypt(&key_pair.private_key, &c).unwrap();
/// assert_eq!(m, BigUint::from(1500u32));
/// ```
pub fn encrypt(
    public_key: &PublicKey,
    plaintext: &BigUint,
    rng: &mut impl CryptoRng,
) -> Result<Ciphertext, LedgerCryptoError> {
    encrypt_with_config(public_key, plaintext, &LedgerConfig::default(), rng)
}

/// Encrypts `plaintext`, drawing `r ∈ [1, n-1]` coprime to `n` at most
/// `config.max_coprime_retries` times.
///
/// # Errors
///
/// * `PlaintextOutOfRange` unless `0 <= plaintext < n`.
/// * `RandomnessExhausted` if no unit was drawn within the retry bound.
pub fn encrypt_with_config(
    public_key: &PublicKey,
    plaintext: &BigUint,
    config: &LedgerConfig,
    rng: &mut impl CryptoRng,
) -> Result<Ciphertext, LedgerCryptoError> {
    check_plaintext(public_key, plaintext)?;
    let r = sample_coprime(public_key.n(), config.max_coprime_retries, rng)?;
    encrypt_with_randomness(public_key, plaintext, &r)
}

/// Deterministic encryption `c = g^m · r^n mod n²` with caller-supplied randomness.
///
/// `r` must be a unit modulo `n`. Reusing `r` across plaintexts leaks their difference, so
/// this is meant for reproducible tests and for callers with their own randomness source.
pub fn encrypt_with_randomness(
    public_key: &PublicKey,
    plaintext: &BigUint,
    randomness: &BigUint,
) -> Result<Ciphertext, LedgerCryptoError> {
    check_plaintext(public_key, plaintext)?;
    if randomness.is_zero() || !randomness.gcd(public_key.n()).is_one() {
        return Err(LedgerCryptoError::InvalidParameters(
            "Encryption randomness must be a unit modulo n".to_string(),
        ));
    }

    let space = public_key.ciphertext_space();
    let g_m = space.pow(public_key.g(), plaintext);
    let r_n = space.pow(randomness, public_key.n());

    Ok(Ciphertext::new(space.mul(&g_m, &r_n)))
}

/// Decrypts `m = L(c^λ mod n²) · μ mod n`.
///
/// Any well-formed ciphertext decrypts to some value in `[0, n)`; a ciphertext produced
/// under a different key cannot be detected here and yields an unrelated value.
///
/// # Errors
///
/// * `MalformedCiphertext` if `c` is outside `[1, n²)` or shares a factor with `n`.
/// * `Decryption` if `c^λ mod n²` is not congruent to 1 mod `n`.
pub fn decrypt(
    private_key: &PrivateKey,
    ciphertext: &Ciphertext,
) -> Result<BigUint, LedgerCryptoError> {
    validate_ciphertext(private_key.ciphertext_space(), private_key.n(), ciphertext)?;

    let u = private_key
        .ciphertext_space()
        .pow(ciphertext.value(), private_key.lambda());
    let l_value = l_function(&u, private_key.n())?;

    Ok(private_key.plaintext_space().mul(&l_value, private_key.mu()))
}

/// Homomorphic addition: `E(a) · E(b) mod n² = E(a + b mod n)`.
///
/// # Errors
///
/// `MalformedCiphertext` if either input is not a valid ciphertext for `public_key`.
pub fn homomorphic_add(
    public_key: &PublicKey,
    lhs: &Ciphertext,
    rhs: &Ciphertext,
) -> Result<Ciphertext, LedgerCryptoError> {
    validate(public_key, lhs)?;
    validate(public_key, rhs)?;

    Ok(Ciphertext::new(
        public_key.ciphertext_space().mul(lhs.value(), rhs.value()),
    ))
}

/// Checks that `ciphertext` lies in `[1, n²)` and is a unit modulo `n`.
pub fn validate(public_key: &PublicKey, ciphertext: &Ciphertext) -> Result<(), LedgerCryptoError> {
    validate_ciphertext(public_key.ciphertext_space(), public_key.n(), ciphertext)
}

fn validate_ciphertext(
    space: &ModRing,
    n: &BigUint,
    ciphertext: &Ciphertext,
) -> Result<(), LedgerCryptoError> {
    let c = ciphertext.value();
    if c.is_zero() || !space.contains(c) {
        return Err(LedgerCryptoError::MalformedCiphertext(format!(
            "{} is outside [1, {})",
            c,
            space.modulus()
        )));
    }
    if !c.gcd(n).is_one() {
        return Err(LedgerCryptoError::MalformedCiphertext(format!(
            "{} is not a unit modulo n",
            c
        )));
    }

    Ok(())
}

fn check_plaintext(public_key: &PublicKey, plaintext: &BigUint) -> Result<(), LedgerCryptoError> {
    if !public_key.plaintext_space().contains(plaintext) {
        return Err(LedgerCryptoError::PlaintextOutOfRange {
            plaintext: plaintext.to_string(),
            modulus: public_key.n().to_string(),
        });
    }

    Ok(())
}
