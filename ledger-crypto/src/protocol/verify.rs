use crate::codec;
use crate::errors::LedgerCryptoError;

use num_bigint::BigUint;

use serde::{Deserialize, Serialize};

/// How a claimant relates to a dual-encrypted amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Sender,
    Recipient,
    ThirdParty,
}

/// Outcome of checking a claimed amount against a dual-encrypted transaction.
///
/// A failed check is an ordinary value (`verified == false`), not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub claimant: String,
    pub role: Role,
    pub can_decrypt: bool,
    pub verified: bool,
    /// What the claimant's key recovered, `amount mod n_claimant`.
    #[serde(with = "codec::decimal_opt")]
    pub decrypted_cents: Option<BigUint>,
    /// The claim reduced the same way.
    #[serde(with = "codec::decimal_opt")]
    pub expected_cents: Option<BigUint>,
}

impl VerificationResult {
    pub(crate) fn third_party(claimant: &str) -> Self {
        Self {
            claimant: claimant.to_string(),
            role: Role::ThirdParty,
            can_decrypt: false,
            verified: false,
            decrypted_cents: None,
            expected_cents: None,
        }
    }

    /// Turns a failed verification into `DecryptionMismatch` for callers that want `?`.
    pub fn ensure_verified(self) -> Result<Self, LedgerCryptoError> {
        if self.verified {
            return Ok(self);
        }

        let render = |value: &Option<BigUint>| {
            value
                .as_ref()
                .map_or_else(|| "nothing".to_string(), BigUint::to_string)
        };

        Err(LedgerCryptoError::DecryptionMismatch {
            party: self.claimant.clone(),
            expected: render(&self.expected_cents),
            decrypted: render(&self.decrypted_cents),
        })
    }
}
