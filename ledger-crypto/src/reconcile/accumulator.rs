use crate::cipher::Ciphertext;

use num_bigint::BigUint;

use serde::{Deserialize, Serialize};

/// Which side of a transfer a party is accumulated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Sent,
    Received,
}

/// Homomorphic running total for one (party, direction) pair.
///
/// There is no encryption of zero to start a product from, so a party with no matching
/// transactions gets [`HomomorphicAccumulator::NoActivity`] instead of a ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomomorphicAccumulator {
    NoActivity,
    Accumulated {
        ciphertext: Ciphertext,
        term_count: usize,
        /// The decrypted total, in minor units modulo the party's n.
        recovered_cents: BigUint,
    },
}

impl HomomorphicAccumulator {
    pub fn recovered_cents(&self) -> Option<&BigUint> {
        match self {
            Self::NoActivity => None,
            Self::Accumulated {
                recovered_cents, ..
            } => Some(recovered_cents),
        }
    }

    pub fn term_count(&self) -> usize {
        match self {
            Self::NoActivity => 0,
            Self::Accumulated { term_count, .. } => *term_count,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Accumulated { .. })
    }
}
