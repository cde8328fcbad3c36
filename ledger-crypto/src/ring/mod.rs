//! # Ring Module
//!
//! Big-integer arithmetic used by the cryptosystem: the [`ModRing`] wrapper for Z_n and
//! Z_{n²}, CSPRNG sampling helpers and Miller–Rabin prime generation.

pub mod helper;
pub mod math;
pub mod prime;

pub use helper::{sample_below, sample_coprime};
pub use math::ModRing;
pub use prime::{generate_prime, is_probable_prime};
