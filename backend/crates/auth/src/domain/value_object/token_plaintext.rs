//! Token Plaintext Value Object
//!
//! The externally visible form of a bearer token: 16 random bytes encoded
//! as unpadded base-32 (26 characters, `A-Z2-7`).

use std::fmt;

use platform::crypto;

/// Raw entropy carried by every token
pub const TOKEN_ENTROPY_BYTES: usize = 16;

/// Encoded length of [`TOKEN_ENTROPY_BYTES`] in unpadded base-32
pub const TOKEN_PLAINTEXT_LEN: usize = 26;

/// Token plaintext that passed the shape gate
///
/// Only this type can be turned into a lookup digest, so no storage query
/// runs for a string that could never have been issued.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPlaintext(String);

impl TokenPlaintext {
    /// Validate a presented token
    ///
    /// Returns `None` unless `raw` is exactly 26 characters of the base-32
    /// alphabet that decode to 16 bytes.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != TOKEN_PLAINTEXT_LEN {
            return None;
        }
        let decoded = crypto::from_base32(raw)?;
        if decoded.len() != TOKEN_ENTROPY_BYTES {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// Encode freshly drawn entropy
    pub(crate) fn from_entropy(bytes: &[u8; TOKEN_ENTROPY_BYTES]) -> Self {
        Self(crypto::to_base32(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// SHA-256 of the plaintext's UTF-8 bytes; the only form ever stored
    pub fn digest(&self) -> [u8; 32] {
        crypto::sha256(self.0.as_bytes())
    }
}

impl fmt::Debug for TokenPlaintext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenPlaintext")
            .field(&"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Y3QMGX3PJ3WLRL2YRTQGQ6KRHU";

    #[test]
    fn test_parse_accepts_issued_shape() {
        let token = TokenPlaintext::parse(SAMPLE).unwrap();
        assert_eq!(token.as_str(), SAMPLE);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(TokenPlaintext::parse("abc").is_none());
        assert!(TokenPlaintext::parse("").is_none());
        assert!(TokenPlaintext::parse(&SAMPLE[..25]).is_none());
        assert!(TokenPlaintext::parse(&format!("{SAMPLE}A")).is_none());
    }

    #[test]
    fn test_parse_rejects_foreign_alphabet() {
        assert!(TokenPlaintext::parse(&SAMPLE.to_lowercase()).is_none());
        assert!(TokenPlaintext::parse("Y3QMGX3PJ3WLRL2YRTQGQ6KRH1").is_none());
        assert!(TokenPlaintext::parse("Y3QMGX3PJ3WLRL2YRTQGQ6KRH=").is_none());
    }

    #[test]
    fn test_from_entropy_shape() {
        let token = TokenPlaintext::from_entropy(&[0xAB; TOKEN_ENTROPY_BYTES]);
        assert_eq!(token.as_str().len(), TOKEN_PLAINTEXT_LEN);
        assert!(TokenPlaintext::parse(token.as_str()).is_some());
    }

    #[test]
    fn test_digest_is_sha256_of_text() {
        let token = TokenPlaintext::parse(SAMPLE).unwrap();
        assert_eq!(token.digest(), crypto::sha256(SAMPLE.as_bytes()));
        assert_eq!(token.digest(), token.clone().digest());
    }

    #[test]
    fn test_debug_redacted() {
        let token = TokenPlaintext::parse(SAMPLE).unwrap();
        assert!(!format!("{token:?}").contains(SAMPLE));
    }
}
