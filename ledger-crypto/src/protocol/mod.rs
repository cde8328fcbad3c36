//! # Protocol Module
//!
//! Dual encryption: every transfer amount is encrypted once under the sender's key and
//! once under the recipient's key, so each counterparty (and nobody else) can later prove
//! it.
//!
//! The two moduli generally differ. Each side recovers `amount_cents mod n_party`, which is
//! the true amount only while the amount stays below that party's modulus.

pub mod amount;
pub mod verify;

pub use verify::{Role, VerificationResult};

use crate::cipher::{self, Ciphertext};
use crate::config::LedgerConfig;
use crate::errors::LedgerCryptoError;
use crate::keypair::PublicKey;
use crate::registry::PartyRegistry;

use amount::to_minor_units;

use chrono::{DateTime, Utc};

use num_bigint::BigUint;

use rand::CryptoRng;

use rayon::prelude::*;

use serde::{Deserialize, Serialize};

use tracing::{debug, warn};

/// One amount encrypted under two independent public keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualEncryptedAmount {
    sender_id: String,
    recipient_id: String,
    sender_ciphertext: Ciphertext,
    recipient_ciphertext: Ciphertext,
    timestamp: DateTime<Utc>,
}

impl DualEncryptedAmount {
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    pub fn recipient_id(&self) -> &str {
        &self.recipient_id
    }

    pub fn sender_ciphertext(&self) -> &Ciphertext {
        &self.sender_ciphertext
    }

    pub fn recipient_ciphertext(&self) -> &Ciphertext {
        &self.recipient_ciphertext
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn role_of(&self, party_id: &str) -> Role {
        if party_id == self.sender_id {
            Role::Sender
        } else if party_id == self.recipient_id {
            Role::Recipient
        } else {
            Role::ThirdParty
        }
    }
}

/// A dual-encrypted amount under a ledger-wide transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedTransaction {
    pub id: String,
    pub amount: DualEncryptedAmount,
}

impl RecordedTransaction {
    pub fn new(id: impl Into<String>, amount: DualEncryptedAmount) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }
}

/// A cleartext transfer to be dual-encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub sender_id: String,
    pub recipient_id: String,
    pub amount: f64,
}

impl TransferRequest {
    pub fn new(sender_id: impl Into<String>, recipient_id: impl Into<String>, amount: f64) -> Self {
        Self {
            sender_id: sender_id.into(),
            recipient_id: recipient_id.into(),
            amount,
        }
    }
}

/// Dual encryption and claimant verification against a [`PartyRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct DualEncryptionProtocol<'a> {
    registry: &'a PartyRegistry,
    config: LedgerConfig,
}

impl<'a> DualEncryptionProtocol<'a> {
    pub fn new(registry: &'a PartyRegistry) -> Self {
        Self::with_config(registry, LedgerConfig::default())
    }

    pub fn with_config(registry: &'a PartyRegistry, config: LedgerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'a PartyRegistry {
        self.registry
    }

    /// Dual-encrypts `amount` using the thread-local CSPRNG.
    ///
    /// # Errors
    ///
    /// * `UnknownParty` if either party is not registered.
    /// * `InvalidAmount` for negative or non-finite amounts.
    pub fn dual_encrypt(
        &self,
        amount: f64,
        sender_id: &str,
        recipient_id: &str,
    ) -> Result<DualEncryptedAmount, LedgerCryptoError> {
        self.dual_encrypt_with_rng(amount, sender_id, recipient_id, &mut rand::rng())
    }

    /// Dual-encrypts `amount` with independent randomness for each side.
    pub fn dual_encrypt_with_rng(
        &self,
        amount: f64,
        sender_id: &str,
        recipient_id: &str,
        rng: &mut impl CryptoRng,
    ) -> Result<DualEncryptedAmount, LedgerCryptoError> {
        let sender_key = self.registry.public_key_of(sender_id)?;
        let recipient_key = self.registry.public_key_of(recipient_id)?;
        let cents = BigUint::from(to_minor_units(amount)?);

        let sender_ciphertext = self.encrypt_reduced(sender_key, &cents, rng)?;
        let recipient_ciphertext = self.encrypt_reduced(recipient_key, &cents, rng)?;

        debug!(sender = sender_id, recipient = recipient_id, "dual-encrypted transfer");

        Ok(DualEncryptedAmount {
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            sender_ciphertext,
            recipient_ciphertext,
            timestamp: Utc::now(),
        })
    }

    /// Dual-encrypts and tags the result with a transaction id.
    pub fn record(
        &self,
        id: impl Into<String>,
        amount: f64,
        sender_id: &str,
        recipient_id: &str,
    ) -> Result<RecordedTransaction, LedgerCryptoError> {
        let encrypted = self.dual_encrypt(amount, sender_id, recipient_id)?;
        Ok(RecordedTransaction::new(id, encrypted))
    }

    /// Encrypts independent transfers in parallel. Output order matches `requests`.
    ///
    /// Fails with the first error encountered if any transfer cannot be encrypted.
    pub fn dual_encrypt_batch(
        &self,
        requests: &[TransferRequest],
    ) -> Result<Vec<DualEncryptedAmount>, LedgerCryptoError> {
        requests
            .par_iter()
            .map(|request| {
                self.dual_encrypt(request.amount, &request.sender_id, &request.recipient_id)
            })
            .collect()
    }

    /// Checks whether `claimant_id` can decrypt `encrypted` to `claimed_amount`.
    ///
    /// A claimant that is neither sender nor recipient gets
    /// `{ role: ThirdParty, can_decrypt: false, verified: false }` without touching any key.
    /// Otherwise only the claimant's own private key is used.
    ///
    /// # Errors
    ///
    /// * `UnknownParty` if the claimant is a counterparty but not registered.
    /// * `InvalidAmount` if `claimed_amount` is negative or non-finite.
    /// * `MalformedCiphertext` if the stored ciphertext is not valid for the claimant's key.
    pub fn verify(
        &self,
        encrypted: &DualEncryptedAmount,
        claimant_id: &str,
        claimed_amount: f64,
    ) -> Result<VerificationResult, LedgerCryptoError> {
        let role = encrypted.role_of(claimant_id);
        let ciphertext = match role {
            Role::Sender => &encrypted.sender_ciphertext,
            Role::Recipient => &encrypted.recipient_ciphertext,
            Role::ThirdParty => return Ok(VerificationResult::third_party(claimant_id)),
        };

        let private_key = self.registry.private_key_of(claimant_id)?;
        let claimed = BigUint::from(to_minor_units(claimed_amount)?);
        let expected = private_key.plaintext_space().normalize(&claimed);
        let decrypted = cipher::decrypt(private_key, ciphertext)?;
        let verified = decrypted == expected;

        if !verified {
            warn!(claimant = claimant_id, ?role, "claimed amount does not match ciphertext");
        }

        Ok(VerificationResult {
            claimant: claimant_id.to_string(),
            role,
            can_decrypt: true,
            verified,
            decrypted_cents: Some(decrypted),
            expected_cents: Some(expected),
        })
    }

    fn encrypt_reduced(
        &self,
        public_key: &PublicKey,
        cents: &BigUint,
        rng: &mut impl CryptoRng,
    ) -> Result<Ciphertext, LedgerCryptoError> {
        let reduced = public_key.plaintext_space().normalize(cents);
        cipher::encrypt_with_config(public_key, &reduced, &self.config, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPair;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn registry() -> Result<PartyRegistry, LedgerCryptoError> {
        let mut registry = PartyRegistry::new();
        for (id, p, q) in [
            ("acme", 1009u32, 1013u32),
            ("globex", 1019, 1021),
            ("initech", 1031, 1033),
        ] {
            registry.register_key_pair(id, KeyPair::from_primes(&p.into(), &q.into())?)?;
        }
        Ok(registry)
    }

    #[test]
    fn test_both_counterparties_recover_amount() -> Result<(), LedgerCryptoError> {
        let registry = registry()?;
        let protocol = DualEncryptionProtocol::new(&registry);
        let mut rng = StdRng::seed_from_u64(9);

        let encrypted = protocol.dual_encrypt_with_rng(100.0, "acme", "globex", &mut rng)?;
        assert_eq!(encrypted.sender_id(), "acme");
        assert_eq!(encrypted.recipient_id(), "globex");

        let by_sender =
            cipher::decrypt(registry.private_key_of("acme")?, encrypted.sender_ciphertext())?;
        let by_recipient =
            cipher::decrypt(registry.private_key_of("globex")?, encrypted.recipient_ciphertext())?;
        assert_eq!(by_sender, BigUint::from(10_000u32));
        assert_eq!(by_recipient, BigUint::from(10_000u32));
        Ok(())
    }

    #[test]
    fn test_role_isolation() -> Result<(), LedgerCryptoError> {
        let registry = registry()?;
        let protocol = DualEncryptionProtocol::new(&registry);
        let encrypted = protocol.dual_encrypt(42.5, "acme", "globex")?;

        let sender = protocol.verify(&encrypted, "acme", 42.5)?;
        assert_eq!(sender.role, Role::Sender);
        assert!(sender.can_decrypt && sender.verified);

        let recipient = protocol.verify(&encrypted, "globex", 42.5)?;
        assert_eq!(recipient.role, Role::Recipient);
        assert!(recipient.can_decrypt && recipient.verified);

        let outsider = protocol.verify(&encrypted, "initech", 42.5)?;
        assert_eq!(outsider.role, Role::ThirdParty);
        assert!(!outsider.can_decrypt && !outsider.verified);
        assert_eq!(outsider.decrypted_cents, None);

        // Unregistered outsiders are still just third parties.
        let stranger = protocol.verify(&encrypted, "umbrella", 42.5)?;
        assert_eq!(stranger.role, Role::ThirdParty);
        Ok(())
    }

    #[test]
    fn test_wrong_claim_is_reported_not_raised() -> Result<(), LedgerCryptoError> {
        let registry = registry()?;
        let protocol = DualEncryptionProtocol::new(&registry);
        let encrypted = protocol.dual_encrypt(100.0, "acme", "globex")?;

        let result = protocol.verify(&encrypted, "globex", 99.0)?;
        assert!(result.can_decrypt);
        assert!(!result.verified);
        assert_eq!(result.decrypted_cents, Some(BigUint::from(10_000u32)));
        assert!(matches!(
            result.ensure_verified(),
            Err(LedgerCryptoError::DecryptionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_amount_wraps_modulo_each_party() -> Result<(), LedgerCryptoError> {
        let registry = registry()?;
        let protocol = DualEncryptionProtocol::new(&registry);

        // 20_000.00 = 2_000_000 cents, above both toy moduli.
        let encrypted = protocol.dual_encrypt(20_000.0, "acme", "globex")?;
        let acme_n = registry.public_key_of("acme")?.n().clone();
        let globex_n = registry.public_key_of("globex")?.n().clone();

        let by_sender =
            cipher::decrypt(registry.private_key_of("acme")?, encrypted.sender_ciphertext())?;
        let by_recipient =
            cipher::decrypt(registry.private_key_of("globex")?, encrypted.recipient_ciphertext())?;
        assert_eq!(by_sender, BigUint::from(2_000_000u32) % acme_n);
        assert_eq!(by_recipient, BigUint::from(2_000_000u32) % globex_n);
        assert_ne!(by_sender, by_recipient);

        assert!(protocol.verify(&encrypted, "acme", 20_000.0)?.verified);
        assert!(protocol.verify(&encrypted, "globex", 20_000.0)?.verified);
        Ok(())
    }

    #[test]
    fn test_unknown_parties_and_bad_amounts() -> Result<(), LedgerCryptoError> {
        let registry = registry()?;
        let protocol = DualEncryptionProtocol::new(&registry);

        assert!(matches!(
            protocol.dual_encrypt(1.0, "acme", "umbrella"),
            Err(LedgerCryptoError::UnknownParty(id)) if id == "umbrella"
        ));
        assert!(matches!(
            protocol.dual_encrypt(-1.0, "acme", "globex"),
            Err(LedgerCryptoError::InvalidAmount(_))
        ));
        Ok(())
    }

    #[test]
    fn test_batch_preserves_order() -> Result<(), LedgerCryptoError> {
        let registry = registry()?;
        let protocol = DualEncryptionProtocol::new(&registry);
        let requests: Vec<TransferRequest> = (1..=16)
            .map(|i| TransferRequest::new("acme", "initech", i as f64))
            .collect();

        let encrypted = protocol.dual_encrypt_batch(&requests)?;
        assert_eq!(encrypted.len(), requests.len());
        for (request, amount) in requests.iter().zip(&encrypted) {
            assert!(protocol.verify(amount, "initech", request.amount)?.verified);
        }

        let mut bad = requests.clone();
        bad.push(TransferRequest::new("acme", "umbrella", 1.0));
        assert!(protocol.dual_encrypt_batch(&bad).is_err());
        Ok(())
    }

    #[test]
    fn test_serialized_ciphertexts_are_decimal_strings() -> Result<(), LedgerCryptoError> {
        let registry = registry()?;
        let protocol = DualEncryptionProtocol::new(&registry);
        let recorded = protocol.record("tx-1", 12.34, "acme", "globex")?;

        let json = serde_json::to_value(&recorded)?;
        assert_eq!(json["id"], "tx-1");
        assert!(json["amount"]["sender_ciphertext"].is_string());
        assert!(json["amount"]["recipient_ciphertext"].is_string());
        assert!(json["amount"]["timestamp"].is_string());

        let decoded: RecordedTransaction = serde_json::from_value(json)?;
        assert_eq!(decoded, recorded);
        Ok(())
    }
}
