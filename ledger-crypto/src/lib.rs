pub mod cipher;
pub mod codec;
pub mod config;
pub mod errors;
pub mod keypair;
pub mod protocol;
pub mod reconcile;
pub mod registry;
pub mod ring;

pub use cipher::Ciphertext;
pub use config::LedgerConfig;
pub use errors::LedgerCryptoError;
pub use keypair::{KeyPair, PrivateKey, PublicKey};
pub use protocol::{
    DualEncryptedAmount, DualEncryptionProtocol, RecordedTransaction, Role, TransferRequest,
    VerificationResult,
};
pub use reconcile::{
    DeclaredTotal, DeclaredTotals, Direction, HomomorphicAccumulator, PartyReconciliation,
    ReconciliationEngine, ReconciliationReport,
};
pub use registry::{Party, PartyRegistry};
