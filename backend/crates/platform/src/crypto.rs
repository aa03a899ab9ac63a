//! Cryptographic Utilities

use base32::Alphabet;
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Unpadded RFC 4648 base-32 (`A-Z2-7`)
const BASE32: Alphabet = Alphabet::Rfc4648 { padding: false };

/// The OS random source could not supply bytes
#[derive(Debug, Error)]
#[error("OS random source unavailable: {0}")]
pub struct EntropyError(String);

/// Fill `buf` from the OS CSPRNG
///
/// No fallback generator; a failure aborts the secret being minted.
pub fn fill_random(buf: &mut [u8]) -> Result<(), EntropyError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| EntropyError(e.to_string()))
}

/// Draw `N` random bytes from the OS CSPRNG
pub fn random_array<const N: usize>() -> Result<[u8; N], EntropyError> {
    let mut bytes = [0u8; N];
    fill_random(&mut bytes)?;
    Ok(bytes)
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as unpadded upper-case base-32
pub fn to_base32(bytes: &[u8]) -> String {
    base32::encode(BASE32, bytes)
}

/// Decode unpadded upper-case base-32
///
/// Returns `None` for any character outside `A-Z2-7`, including lower case.
pub fn from_base32(s: &str) -> Option<Vec<u8>> {
    if !s.bytes().all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b)) {
        return None;
    }
    base32::decode(BASE32, s)
}
