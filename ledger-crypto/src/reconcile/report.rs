use crate::codec;
use crate::errors::LedgerCryptoError;

use num_bigint::BigUint;

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

/// A party's own year-end declaration, in decimal currency.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeclaredTotal {
    pub sent: f64,
    pub received: f64,
}

impl DeclaredTotal {
    pub fn new(sent: f64, received: f64) -> Self {
        Self { sent, received }
    }
}

/// Declarations keyed by party id.
pub type DeclaredTotals = BTreeMap<String, DeclaredTotal>;

/// Reconciliation outcome for one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyReconciliation {
    pub party_id: String,
    pub verified: bool,
    pub declared_sent_cents: Option<u64>,
    pub declared_received_cents: Option<u64>,
    /// `None` when the party sent nothing.
    #[serde(with = "codec::decimal_opt")]
    pub recovered_sent_cents: Option<BigUint>,
    /// `None` when the party received nothing.
    #[serde(with = "codec::decimal_opt")]
    pub recovered_received_cents: Option<BigUint>,
    pub sent_transactions: usize,
    pub received_transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// One entry per party, ordered by id.
    pub parties: Vec<PartyReconciliation>,
    pub network_balanced: bool,
    pub declared_sent_total_cents: u64,
    pub declared_received_total_cents: u64,
    /// Transaction ids seen more than once, each listed once, sorted.
    pub duplicate_transactions: Vec<String>,
    /// Transaction ids whose ciphertexts failed validation, sorted. Left out of all totals.
    pub malformed_transactions: Vec<String>,
}

impl ReconciliationReport {
    pub fn party(&self, party_id: &str) -> Option<&PartyReconciliation> {
        self.parties.iter().find(|p| p.party_id == party_id)
    }

    pub fn all_parties_verified(&self) -> bool {
        self.parties.iter().all(|p| p.verified)
    }

    pub fn unverified_parties(&self) -> Vec<&str> {
        self.parties
            .iter()
            .filter(|p| !p.verified)
            .map(|p| p.party_id.as_str())
            .collect()
    }

    /// Every party verified, the network balanced, no duplicate ids and no malformed
    /// transactions.
    pub fn is_clean(&self) -> bool {
        self.all_parties_verified()
            && self.network_balanced
            && self.duplicate_transactions.is_empty()
            && self.malformed_transactions.is_empty()
    }

    pub fn to_json(&self) -> Result<String, LedgerCryptoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
