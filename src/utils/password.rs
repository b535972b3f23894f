//! Password digest derivation and verification.
//!
//! Digest and salt are stored base64 (no padding) in the user table.
//! Verification recomputes the digest from the presented password and the
//! stored salt and compares in constant time; it never says which side of
//! the comparison was wrong.

use anyhow::anyhow;
use argon2::{Algorithm, Argon2, Params, Version};
use data_encoding::BASE64_NOPAD;
use hamlet_core::AppError;
use password_hash::Output;
use rand::RngCore;
use rand::rngs::OsRng;

// Argon2id parameters.
const T_COST: u32 = 1;
const M_COST_KIB: u32 = 64 * 1024;
const P_COST: u32 = 4;
const KEY_LEN: usize = 32;
const SALT_LEN: usize = 16;

/// A derived digest and the salt it was derived with, encoded for storage.
#[derive(Debug, Clone)]
pub struct PasswordRecord {
    pub digest: String,
    pub salt: String,
}

fn kdf() -> Result<Argon2<'static>, AppError> {
    let params = Params::new(M_COST_KIB, T_COST, P_COST, Some(KEY_LEN))
        .map_err(|err| AppError::configuration(anyhow!("argon2 parameters: {err}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Derives a storable digest from a password and a fresh random salt.
pub fn hash_password(password: &str) -> Result<PasswordRecord, AppError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut digest = [0u8; KEY_LEN];
    kdf()?
        .hash_password_into(password.as_bytes(), &salt, &mut digest)
        .map_err(|err| AppError::configuration(anyhow!("derive digest: {err}")))?;

    Ok(PasswordRecord {
        digest: BASE64_NOPAD.encode(&digest),
        salt: BASE64_NOPAD.encode(&salt),
    })
}

/// Checks a presented password against a stored digest and salt.
///
/// An undecodable stored field is a data defect and comes back as an
/// error, not as a mismatch.
pub fn verify_password(
    password: &str,
    stored_digest: &str,
    stored_salt: &str,
) -> Result<bool, AppError> {
    let digest = BASE64_NOPAD
        .decode(stored_digest.as_bytes())
        .map_err(|err| AppError::storage(anyhow!("stored digest undecodable: {err}")))?;
    let salt = BASE64_NOPAD
        .decode(stored_salt.as_bytes())
        .map_err(|err| AppError::storage(anyhow!("stored salt undecodable: {err}")))?;

    let mut candidate = [0u8; KEY_LEN];
    kdf()?
        .hash_password_into(password.as_bytes(), &salt, &mut candidate)
        .map_err(|err| AppError::configuration(anyhow!("derive digest: {err}")))?;

    // Output equality is constant-time.
    let stored = Output::new(&digest)
        .map_err(|err| AppError::storage(anyhow!("stored digest malformed: {err}")))?;
    let computed = Output::new(&candidate)
        .map_err(|err| AppError::configuration(anyhow!("derived digest malformed: {err}")))?;
    Ok(computed == stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let record = hash_password("correct horse battery staple").unwrap();
        assert!(
            verify_password("correct horse battery staple", &record.digest, &record.salt).unwrap()
        );
        assert!(!verify_password("wrong password", &record.digest, &record.salt).unwrap());
    }

    #[test]
    fn salts_make_digests_unique() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn record_is_unpadded_base64() {
        let record = hash_password("pw").unwrap();
        assert!(!record.digest.contains('='));
        assert!(!record.salt.contains('='));
        assert_eq!(BASE64_NOPAD.decode(record.digest.as_bytes()).unwrap().len(), 32);
        assert_eq!(BASE64_NOPAD.decode(record.salt.as_bytes()).unwrap().len(), 16);
    }

    #[test]
    fn undecodable_stored_fields_are_errors_not_mismatches() {
        let record = hash_password("pw").unwrap();
        assert!(verify_password("pw", "not base64!!", &record.salt).is_err());
        assert!(verify_password("pw", &record.digest, "not base64!!").is_err());
    }
}
