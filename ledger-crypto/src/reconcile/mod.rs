//! # Reconcile Module
//!
//! Year-end checks over a set of dual-encrypted transactions:
//!
//! 1. per party and direction, multiply the party's ciphertexts together and decrypt the
//!    product with the party's own key;
//! 2. compare the recovered totals with what the party declared;
//! 3. check that everything declared as sent was declared as received somewhere;
//! 4. flag transaction ids that appear more than once, and transactions whose ciphertexts
//!    are not valid under the counterparties' keys.

pub mod accumulator;
pub mod report;

pub use accumulator::{Direction, HomomorphicAccumulator};
pub use report::{DeclaredTotal, DeclaredTotals, PartyReconciliation, ReconciliationReport};

use crate::cipher::{self, Ciphertext};
use crate::config::LedgerConfig;
use crate::errors::LedgerCryptoError;
use crate::protocol::RecordedTransaction;
use crate::protocol::amount::{modular_distance, to_minor_units};
use crate::registry::PartyRegistry;

use itertools::Itertools;

use num_bigint::BigUint;

use rayon::prelude::*;

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

/// Recomputes and checks per-party totals against a [`PartyRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct ReconciliationEngine<'a> {
    registry: &'a PartyRegistry,
    config: LedgerConfig,
}

impl<'a> ReconciliationEngine<'a> {
    pub fn new(registry: &'a PartyRegistry) -> Self {
        Self::with_config(registry, LedgerConfig::default())
    }

    pub fn with_config(registry: &'a PartyRegistry, config: LedgerConfig) -> Self {
        Self { registry, config }
    }

    /// Homomorphically sums every ciphertext `party_id` holds in `direction`.
    ///
    /// Ciphertexts are combined as per-thread partial products that are multiplied together
    /// at the end; the order does not matter because multiplication mod n² commutes.
    ///
    /// # Errors
    ///
    /// * `UnknownParty` if the party has activity but is not registered.
    /// * `MalformedCiphertext` if any contributing ciphertext is invalid for the party's key.
    pub fn accumulate(
        &self,
        transactions: &[RecordedTransaction],
        party_id: &str,
        direction: Direction,
    ) -> Result<HomomorphicAccumulator, LedgerCryptoError> {
        self.accumulate_over(transactions.iter(), party_id, direction)
    }

    fn accumulate_over<'t>(
        &self,
        transactions: impl Iterator<Item = &'t RecordedTransaction>,
        party_id: &str,
        direction: Direction,
    ) -> Result<HomomorphicAccumulator, LedgerCryptoError> {
        let terms: Vec<&Ciphertext> = transactions
            .filter_map(|tx| match direction {
                Direction::Sent if tx.amount.sender_id() == party_id => {
                    Some(tx.amount.sender_ciphertext())
                }
                Direction::Received if tx.amount.recipient_id() == party_id => {
                    Some(tx.amount.recipient_ciphertext())
                }
                _ => None,
            })
            .collect();

        if terms.is_empty() {
            return Ok(HomomorphicAccumulator::NoActivity);
        }

        let public_key = self.registry.public_key_of(party_id)?;
        let ciphertext = match terms
            .par_iter()
            .map(|term| Ok::<_, LedgerCryptoError>((*term).clone()))
            .try_reduce_with(|lhs, rhs| cipher::homomorphic_add(public_key, &lhs, &rhs))
        {
            Some(product) => product?,
            None => return Ok(HomomorphicAccumulator::NoActivity),
        };

        let private_key = self.registry.private_key_of(party_id)?;
        let recovered_cents = cipher::decrypt(private_key, &ciphertext)?;

        debug!(party = party_id, ?direction, terms = terms.len(), "accumulated ciphertexts");

        Ok(HomomorphicAccumulator::Accumulated {
            ciphertext,
            term_count: terms.len(),
            recovered_cents,
        })
    }

    /// Runs the year-end reconciliation.
    ///
    /// Parties are the union of everyone who declared and everyone who appears in a
    /// transaction. A party is verified iff both declared totals match the recovered ones
    /// within `tolerance_cents`; a party with no declaration is never verified. Duplicate
    /// ids are reported and their transactions are still accumulated.
    ///
    /// A transaction whose ciphertexts are not valid under the sender's and recipient's keys
    /// is listed in `malformed_transactions` and left out of every total.
    ///
    /// Mismatches end up in the report. Errors are reserved for unknown parties and
    /// unparseable declarations.
    pub fn reconcile(
        &self,
        transactions: &[RecordedTransaction],
        declared: &DeclaredTotals,
    ) -> Result<ReconciliationReport, LedgerCryptoError> {
        let duplicate_transactions: Vec<String> = transactions
            .iter()
            .map(|tx| tx.id.as_str())
            .duplicates()
            .sorted()
            .map(str::to_string)
            .collect();
        if !duplicate_transactions.is_empty() {
            warn!(ids = ?duplicate_transactions, "duplicate transaction ids");
        }

        let mut well_formed = Vec::with_capacity(transactions.len());
        let mut malformed = Vec::new();
        for tx in transactions {
            if self.is_well_formed(tx)? {
                well_formed.push(tx);
            } else {
                malformed.push(tx.id.as_str());
            }
        }
        let malformed_transactions: Vec<String> = malformed
            .into_iter()
            .sorted()
            .dedup()
            .map(str::to_string)
            .collect();
        if !malformed_transactions.is_empty() {
            warn!(ids = ?malformed_transactions, "transactions with malformed ciphertexts");
        }

        let party_ids: BTreeSet<&str> = declared
            .keys()
            .map(String::as_str)
            .chain(
                transactions
                    .iter()
                    .flat_map(|tx| [tx.amount.sender_id(), tx.amount.recipient_id()]),
            )
            .collect();

        let mut parties = Vec::with_capacity(party_ids.len());
        for party_id in party_ids {
            parties.push(self.reconcile_party(&well_formed, party_id, declared)?);
        }

        let mut declared_sent_total_cents = 0u64;
        let mut declared_received_total_cents = 0u64;
        for total in declared.values() {
            declared_sent_total_cents = checked_total(declared_sent_total_cents, total.sent)?;
            declared_received_total_cents =
                checked_total(declared_received_total_cents, total.received)?;
        }
        let network_balanced = declared_sent_total_cents.abs_diff(declared_received_total_cents)
            <= self.config.tolerance_cents;
        if !network_balanced {
            warn!(
                sent = declared_sent_total_cents,
                received = declared_received_total_cents,
                "declared network totals do not balance"
            );
        }

        let report = ReconciliationReport {
            parties,
            network_balanced,
            declared_sent_total_cents,
            declared_received_total_cents,
            duplicate_transactions,
            malformed_transactions,
        };

        info!(
            parties = report.parties.len(),
            transactions = transactions.len(),
            unverified = report.unverified_parties().len(),
            network_balanced = report.network_balanced,
            duplicates = report.duplicate_transactions.len(),
            malformed = report.malformed_transactions.len(),
            "reconciliation finished"
        );

        Ok(report)
    }

    /// Both ciphertexts of `tx` are valid under the respective counterparty's key.
    fn is_well_formed(&self, tx: &RecordedTransaction) -> Result<bool, LedgerCryptoError> {
        let sender_key = self.registry.public_key_of(tx.amount.sender_id())?;
        let recipient_key = self.registry.public_key_of(tx.amount.recipient_id())?;

        Ok(cipher::validate(sender_key, tx.amount.sender_ciphertext()).is_ok()
            && cipher::validate(recipient_key, tx.amount.recipient_ciphertext()).is_ok())
    }

    fn reconcile_party(
        &self,
        transactions: &[&RecordedTransaction],
        party_id: &str,
        declared: &DeclaredTotals,
    ) -> Result<PartyReconciliation, LedgerCryptoError> {
        let n = self.registry.public_key_of(party_id)?.n();
        let sent = self.accumulate_over(transactions.iter().copied(), party_id, Direction::Sent)?;
        let received =
            self.accumulate_over(transactions.iter().copied(), party_id, Direction::Received)?;

        let declaration = declared.get(party_id);
        let declared_sent_cents = declaration.map(|d| to_minor_units(d.sent)).transpose()?;
        let declared_received_cents =
            declaration.map(|d| to_minor_units(d.received)).transpose()?;

        let verified = match (declared_sent_cents, declared_received_cents) {
            (Some(declared_sent), Some(declared_received)) => {
                self.matches(declared_sent, &sent, n) && self.matches(declared_received, &received, n)
            }
            _ => false,
        };

        if !verified {
            warn!(party = party_id, declared = declaration.is_some(), "party failed reconciliation");
        }

        Ok(PartyReconciliation {
            party_id: party_id.to_string(),
            verified,
            declared_sent_cents,
            declared_received_cents,
            recovered_sent_cents: sent.recovered_cents().cloned(),
            recovered_received_cents: received.recovered_cents().cloned(),
            sent_transactions: sent.term_count(),
            received_transactions: received.term_count(),
        })
    }

    /// Compares a declaration with an accumulator.
    ///
    /// Recovered totals live in Z_n and are compared on the cycle. No activity never wrapped,
    /// so it only matches a plain declaration of zero.
    fn matches(&self, declared_cents: u64, accumulator: &HomomorphicAccumulator, n: &BigUint) -> bool {
        match accumulator {
            HomomorphicAccumulator::NoActivity => declared_cents <= self.config.tolerance_cents,
            HomomorphicAccumulator::Accumulated {
                recovered_cents, ..
            } => {
                let distance = modular_distance(&BigUint::from(declared_cents), recovered_cents, n);
                distance <= BigUint::from(self.config.tolerance_cents)
            }
        }
    }
}

fn checked_total(total: u64, amount: f64) -> Result<u64, LedgerCryptoError> {
    total.checked_add(to_minor_units(amount)?).ok_or_else(|| {
        LedgerCryptoError::InvalidAmount("Declared totals overflow 64-bit minor units".to_string())
    })
}
