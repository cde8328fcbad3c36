use crate::codec;
use crate::config::LedgerConfig;
use crate::errors::LedgerCryptoError;
use crate::keypair::helper::l_function;
use crate::ring::{ModRing, generate_prime, is_probable_prime};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

use rand::CryptoRng;

use serde::{Deserialize, Serialize};

use std::fmt;

use tracing::debug;

/// Attempts at drawing two distinct primes that yield an invertible `μ`.
const KEYGEN_ATTEMPTS: usize = 32;

/// Paillier public key `(n, g = n + 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodedPublicKey", into = "EncodedPublicKey")]
pub struct PublicKey {
    /// Z_n, the plaintext space.
    plaintext_space: ModRing,
    /// Z_{n²}, where ciphertexts live.
    ciphertext_space: ModRing,
    g: BigUint,
}

/// Paillier private key `(n, λ, μ)`.
///
/// Not `Serialize`; it never leaves the owning party.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    plaintext_space: ModRing,
    ciphertext_space: ModRing,
    lambda: BigUint,
    mu: BigUint,
}

/// The result of key generation.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

#[derive(Serialize, Deserialize)]
struct EncodedPublicKey {
    #[serde(with = "codec::decimal")]
    n: BigUint,
    #[serde(with = "codec::decimal")]
    g: BigUint,
}

impl PublicKey {
    /// Rebuilds a public key from its modulus, with `g = n + 1`.
    pub fn try_with(n: BigUint) -> Result<Self, LedgerCryptoError> {
        let g = &n + 1u32;
        let ciphertext_space = ModRing::try_with(&n * &n)?;
        let plaintext_space = ModRing::try_with(n)?;

        Ok(Self {
            plaintext_space,
            ciphertext_space,
            g,
        })
    }

    pub fn n(&self) -> &BigUint {
        self.plaintext_space.modulus()
    }

    pub fn n_squared(&self) -> &BigUint {
        self.ciphertext_space.modulus()
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    pub fn plaintext_space(&self) -> &ModRing {
        &self.plaintext_space
    }

    pub fn ciphertext_space(&self) -> &ModRing {
        &self.ciphertext_space
    }
}

impl TryFrom<EncodedPublicKey> for PublicKey {
    type Error = LedgerCryptoError;

    fn try_from(encoded: EncodedPublicKey) -> Result<Self, Self::Error> {
        let key = PublicKey::try_with(encoded.n)?;
        if key.g != encoded.g {
            return Err(LedgerCryptoError::InvalidModulus(format!(
                "g must equal n + 1 = {}, got {}",
                key.g, encoded.g
            )));
        }

        Ok(key)
    }
}

impl From<PublicKey> for EncodedPublicKey {
    fn from(key: PublicKey) -> Self {
        Self {
            n: key.plaintext_space.modulus().clone(),
            g: key.g,
        }
    }
}

impl PrivateKey {
    pub fn n(&self) -> &BigUint {
        self.plaintext_space.modulus()
    }

    pub fn n_squared(&self) -> &BigUint {
        self.ciphertext_space.modulus()
    }

    pub(crate) fn lambda(&self) -> &BigUint {
        &self.lambda
    }

    pub(crate) fn mu(&self) -> &BigUint {
        &self.mu
    }

    pub fn plaintext_space(&self) -> &ModRing {
        &self.plaintext_space
    }

    pub fn ciphertext_space(&self) -> &ModRing {
        &self.ciphertext_space
    }

    /// Derives the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            plaintext_space: self.plaintext_space.clone(),
            ciphertext_space: self.ciphertext_space.clone(),
            g: self.n() + 1u32,
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("n", self.n())
            .field("lambda", &"<redacted>")
            .field("mu", &"<redacted>")
            .finish()
    }
}

impl KeyPair {
    /// Builds a key pair from two distinct primes using the default config.
    ///
    /// # Example
    ///
    /// ```
    /// # use ledger_crypto::KeyPair;
    /// # use num_bigint::BigUint;
    /// let key_pair = KeyPair::from_primes(&1009u32.into(), &1013u32.into()).unwrap();
    /// assert_eq!(key_pair.public_key.n(), &BigUint::from(1_022_117u32));
    /// assert!(KeyPair::from_primes(&1009u32.into(), &1009u32.into()).is_err());
    /// ```
    pub fn from_primes(p: &BigUint, q: &BigUint) -> Result<Self, LedgerCryptoError> {
        Self::from_primes_with(p, q, &LedgerConfig::default())
    }

    /// Builds a key pair from two distinct primes.
    ///
    /// # Errors
    ///
    /// * `InvalidModulus` if `p == q` or either fails the primality test.
    /// * `NonInvertible` if `L(g^λ mod n²)` has no inverse mod `n`.
    pub fn from_primes_with(
        p: &BigUint,
        q: &BigUint,
        config: &LedgerConfig,
    ) -> Result<Self, LedgerCryptoError> {
        if p == q {
            return Err(LedgerCryptoError::InvalidModulus(format!(
                "p and q must be distinct, both are {}",
                p
            )));
        }
        for prime in [p, q] {
            if !is_probable_prime(prime, config.miller_rabin_rounds) {
                return Err(LedgerCryptoError::InvalidModulus(format!(
                    "{} is not prime",
                    prime
                )));
            }
        }

        let public_key = PublicKey::try_with(p * q)?;
        let one = BigUint::one();

        // λ = (p-1)(q-1) / gcd(p-1, q-1)
        let lambda = (p - &one).lcm(&(q - &one));

        // μ = L(g^λ mod n²)^-1 mod n
        let g_lambda = public_key.ciphertext_space.pow(&public_key.g, &lambda);
        let l_value = l_function(&g_lambda, public_key.n())?;
        let mu = public_key.plaintext_space.inv(&l_value)?;

        debug!(modulus_bits = public_key.n().bits(), "derived Paillier key pair");

        let private_key = PrivateKey {
            plaintext_space: public_key.plaintext_space.clone(),
            ciphertext_space: public_key.ciphertext_space.clone(),
            lambda,
            mu,
        };

        Ok(Self {
            public_key,
            private_key,
        })
    }

    /// Samples two distinct primes of `bits / 2` bits each and builds a key pair.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` if `bits` is below `config.min_key_bits`.
    pub fn generate(
        bits: u64,
        config: &LedgerConfig,
        rng: &mut impl CryptoRng,
    ) -> Result<Self, LedgerCryptoError> {
        if bits < config.min_key_bits {
            return Err(LedgerCryptoError::InvalidParameters(format!(
                "Key size must be at least {} bits, got {}",
                config.min_key_bits, bits
            )));
        }

        let p_bits = bits / 2;
        let q_bits = bits - p_bits;

        for _ in 0..KEYGEN_ATTEMPTS {
            let p = generate_prime(p_bits, config.miller_rabin_rounds, rng)?;
            let q = generate_prime(q_bits, config.miller_rabin_rounds, rng)?;
            if p == q {
                continue;
            }

            match Self::from_primes_with(&p, &q, config) {
                Ok(key_pair) => return Ok(key_pair),
                Err(LedgerCryptoError::NonInvertible(reason)) => {
                    debug!(%reason, "discarding prime pair");
                }
                Err(e) => return Err(e),
            }
        }

        Err(LedgerCryptoError::RandomnessExhausted(KEYGEN_ATTEMPTS))
    }
}
