//! Session token minting.

use data_encoding::BASE64URL_NOPAD;
use rand::RngCore;
use rand::rngs::OsRng;

const TOKEN_LEN: usize = 16;

/// Mints a random session token, URL-safe base64 without padding.
pub fn mint() -> String {
    let mut bytes = [0u8; TOKEN_LEN];
    OsRng.fill_bytes(&mut bytes);
    BASE64URL_NOPAD.encode(&bytes)
}
