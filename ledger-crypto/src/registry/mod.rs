//! # Registry Module
//!
//! [`PartyRegistry`] owns every party's key material for a fiscal period. It is populated
//! once and then shared by reference; components borrow keys from it instead of keeping
//! copies.

use crate::errors::LedgerCryptoError;
use crate::keypair::{KeyPair, PrivateKey, PublicKey};

use std::collections::HashMap;

use tracing::debug;

/// A registered participant.
#[derive(Debug)]
pub struct Party {
    id: String,
    public_key: PublicKey,
    private_key: PrivateKey,
}

impl Party {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

/// Maps party identifiers to their key pairs.
#[derive(Debug, Default)]
pub struct PartyRegistry {
    parties: HashMap<String, Party>,
}

impl PartyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a party.
    ///
    /// # Errors
    ///
    /// * `DuplicateId` if `id` is already registered.
    /// * `InvalidParameters` if `id` is empty.
    /// * `InvalidModulus` if the two keys belong to different moduli.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        public_key: PublicKey,
        private_key: PrivateKey,
    ) -> Result<(), LedgerCryptoError> {
        let id = id.into();
        if id.is_empty() {
            return Err(LedgerCryptoError::InvalidParameters(
                "Party id must not be empty".to_string(),
            ));
        }
        if self.parties.contains_key(&id) {
            return Err(LedgerCryptoError::DuplicateId(id));
        }
        if public_key.n() != private_key.n() {
            return Err(LedgerCryptoError::InvalidModulus(format!(
                "Keys registered for `{}` use different moduli",
                id
            )));
        }

        debug!(party = %id, modulus_bits = public_key.n().bits(), "registered party");

        self.parties.insert(
            id.clone(),
            Party {
                id,
                public_key,
                private_key,
            },
        );

        Ok(())
    }

    pub fn register_key_pair(
        &mut self,
        id: impl Into<String>,
        key_pair: KeyPair,
    ) -> Result<(), LedgerCryptoError> {
        self.register(id, key_pair.public_key, key_pair.private_key)
    }

    pub fn party(&self, id: &str) -> Result<&Party, LedgerCryptoError> {
        self.parties
            .get(id)
            .ok_or_else(|| LedgerCryptoError::UnknownParty(id.to_string()))
    }

    pub fn public_key_of(&self, id: &str) -> Result<&PublicKey, LedgerCryptoError> {
        self.party(id).map(|party| &party.public_key)
    }

    /// Looks up the private key of `id`.
    ///
    /// Must only be called on behalf of the party `id` itself.
    pub fn private_key_of(&self, id: &str) -> Result<&PrivateKey, LedgerCryptoError> {
        self.party(id).map(|party| &party.private_key)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.parties.contains_key(id)
    }

    /// Registered ids in lexicographic order.
    pub fn party_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.parties.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}
