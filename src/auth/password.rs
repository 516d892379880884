//! Salted password derivation via PBKDF2-HMAC-SHA256.
//!
//! Deterministic by design: verification is re-derivation and comparison,
//! so no plaintext and no separate verify primitive are ever stored.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

pub const DEFAULT_ITERATIONS: u32 = 10_000;
pub const DEFAULT_KEY_LENGTH: usize = 64;
pub const SALT_BYTES: usize = 16;

/// Derive a hex-encoded key from a password and salt.
pub fn derive_hex(password: &[u8], salt: &[u8], iterations: u32, key_length: usize) -> String {
    let mut derived = vec![0u8; key_length];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut derived);
    hex::encode(derived)
}

/// Generate a fresh random salt, hex-encoded for storage. The hex string
/// itself (not the raw bytes) is what feeds the derivation, matching the
/// stored `UserRecord.salt` field byte for byte.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    hex::encode(salt)
}
