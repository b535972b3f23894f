//! Shared utilities for the Hamlet host:
//!
//! - [`password`]: argon2id digest derivation and verification
//! - [`token`]: session token minting

pub mod password;
pub mod token;
