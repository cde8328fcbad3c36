#[derive(thiserror::Error, Debug)]
pub enum LedgerCryptoError {
    /// Key generation was given equal primes, a non-prime, or a modulus that is too small.
    #[error("InvalidModulus: {0}")]
    InvalidModulus(String),
    /// `L(g^λ mod n²)` shares a factor with `n`, so `μ` cannot be computed.
    #[error("NonInvertible: {0}")]
    NonInvertible(String),

    #[error("Party `{0}` is already registered")]
    DuplicateId(String),
    #[error("Party `{0}` is not registered")]
    UnknownParty(String),

    /// The bounded coprime sampling loop gave up.
    #[error("No unit modulo n found after {0} random draws")]
    RandomnessExhausted(usize),

    #[error("MalformedCiphertext: {0}")]
    MalformedCiphertext(String),
    #[error("Decryption: {0}")]
    Decryption(String),
    #[error("Plaintext {plaintext} is outside [0, {modulus})")]
    PlaintextOutOfRange { plaintext: String, modulus: String },

    /// A decrypted amount did not match the amount a party claimed.
    #[error("Party `{party}` decrypted {decrypted} cents but claimed {expected} cents")]
    DecryptionMismatch {
        party: String,
        expected: String,
        decrypted: String,
    },

    #[error("InvalidAmount: {0}")]
    InvalidAmount(String),
    #[error("InvalidParameters: {0}")]
    InvalidParameters(String),

    #[error("Data serialization: {0}")]
    SerializationError(#[from] serde_json::Error),
}
