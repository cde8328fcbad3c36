//! # Keypair Module
//!
//! Paillier key material. [`PublicKey`] is freely shareable and serializable;
//! [`PrivateKey`] never implements `Serialize` and redacts its secrets in `Debug`.

pub mod helper;
pub mod keys;

pub use keys::{KeyPair, PrivateKey, PublicKey};
