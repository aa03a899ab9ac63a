//! Password Hashing and Verification
//!
//! - Argon2id hashing with a caller-chosen work factor
//! - Zeroization of clear-text passwords
//! - Verification that tells "wrong password" apart from engine failures
//!
//! Argon2's own verifier compares digests in constant time, so a mismatch
//! reveals nothing about where the candidate diverged.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{Error as PhcError, SaltString},
};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto;

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Salt length in bytes (128 bits)
const SALT_LEN: usize = 16;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("must be at least {min} characters long")]
    TooShort { min: usize, actual: usize },

    #[error("must not be more than {max} characters long")]
    TooLong { max: usize, actual: usize },

    #[error("must be provided")]
    EmptyOrWhitespace,

    #[error("must not contain control characters")]
    InvalidCharacter,

    #[error("is too common")]
    CommonPattern,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// The hashing engine failed (bad parameters, no salt entropy, ...)
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not a PHC string this engine understands
    #[error("invalid password hash format")]
    InvalidHashFormat,

    /// Verification failed for a reason other than a mismatch
    #[error("password verification failed: {0}")]
    VerificationFailed(String),
}

// ============================================================================
// Work factor
// ============================================================================

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashingParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordHashingParams {
    /// OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordHashingParams {
    /// Cheap parameters for development and tests
    pub fn low_cost() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST.max(8 * 1024),
            iterations: 1,
            parallelism: 1,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Input is NFKC-normalized on construction so that visually identical
/// passwords hash identically. Policy is checked separately with
/// [`ClearTextPassword::check_policy`].
///
/// Does not implement `Clone`; debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: &str) -> Self {
        Self(raw.nfkc().collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Validate length, characters and known-weak passwords
    pub fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        if self.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = self.0.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if self
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != ' ' && ch != '\t')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_password(&self.0) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(())
    }

    /// Hash with Argon2id and a fresh 128-bit salt from the OS CSPRNG
    pub fn hash(
        &self,
        params: &PasswordHashingParams,
    ) -> Result<HashedPassword, PasswordHashError> {
        let salt_bytes = crypto::random_array::<SALT_LEN>()
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        let hash = params
            .hasher()?
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format
///
/// The PHC string embeds algorithm, version, cost parameters and salt, so
/// verification works regardless of the parameters currently configured.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a candidate password
    ///
    /// `Ok(false)` means the candidate is simply wrong. `Err` is reserved for
    /// failures of the verification engine itself.
    pub fn verify(&self, candidate: &ClearTextPassword) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(&self.hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::VerificationFailed(e.to_string())),
        }
    }

    /// True when the stored hash was made with different parameters
    pub fn needs_rehash(&self, params: &PasswordHashingParams) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return true;
        };
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(stored) => {
                stored.m_cost() != params.memory_kib
                    || stored.t_cost() != params.iterations
                    || stored.p_cost() != params.parallelism
            }
            Err(_) => true,
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn is_common_password(password: &str) -> bool {
    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "12345678",
        "123456789",
        "1234567890",
        "qwertyuiop",
        "abcdefgh",
        "iloveyou",
        "sunshine",
        "football",
        "baseball",
        "trustno1",
        "letmein1",
    ];

    let lower = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lower.as_str()) {
        return true;
    }

    // Single repeated character, e.g. "aaaaaaaa"
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PasswordHashingParams {
        PasswordHashingParams::low_cost()
    }

    #[test]
    fn test_policy_too_short() {
        let result = ClearTextPassword::new("short").check_policy();
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_policy_too_long() {
        let long_password = "ab".repeat(MAX_PASSWORD_LENGTH);
        let result = ClearTextPassword::new(&long_password).check_policy();
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_policy_empty_or_whitespace() {
        assert_eq!(
            ClearTextPassword::new("").check_policy(),
            Err(PasswordPolicyError::EmptyOrWhitespace)
        );
        assert_eq!(
            ClearTextPassword::new("        ").check_policy(),
            Err(PasswordPolicyError::EmptyOrWhitespace)
        );
    }

    #[test]
    fn test_policy_common() {
        assert_eq!(
            ClearTextPassword::new("Password123").check_policy(),
            Err(PasswordPolicyError::CommonPattern)
        );
        assert_eq!(
            ClearTextPassword::new("zzzzzzzzzz").check_policy(),
            Err(PasswordPolicyError::CommonPattern)
        );
    }

    #[test]
    fn test_policy_control_character() {
        assert_eq!(
            ClearTextPassword::new("abc\u{0007}defghij").check_policy(),
            Err(PasswordPolicyError::InvalidCharacter)
        );
    }

    #[test]
    fn test_policy_accepts_unicode() {
        assert!(ClearTextPassword::new("パスワード安全です!").check_policy().is_ok());
        assert!(ClearTextPassword::new("MySecure#Pass2024!").check_policy().is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new("TestPassword123!");
        let hashed = password.hash(&params()).unwrap();

        assert!(hashed.verify(&password).unwrap());

        let wrong = ClearTextPassword::new("WrongPassword123!");
        assert!(!hashed.verify(&wrong).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let password = ClearTextPassword::new("TestPassword123!");
        let a = password.hash(&params()).unwrap();
        let b = password.hash(&params()).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
    }

    #[test]
    fn test_nfkc_normalization_matches() {
        // U+FF21 FULLWIDTH LATIN CAPITAL LETTER A normalizes to "A"
        let hashed = ClearTextPassword::new("\u{FF21}bcdefgh1!")
            .hash(&params())
            .unwrap();
        assert!(hashed.verify(&ClearTextPassword::new("Abcdefgh1!")).unwrap());
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = ClearTextPassword::new("TestPassword123!");
        let hashed = password.hash(&params()).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&password).unwrap());
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(matches!(
            HashedPassword::from_phc_string("not_a_valid_hash"),
            Err(PasswordHashError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_invalid_params_fail_hashing() {
        let params = PasswordHashingParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        let result = ClearTextPassword::new("TestPassword123!").hash(&params);
        assert!(matches!(result, Err(PasswordHashError::HashingFailed(_))));
    }

    #[test]
    fn test_needs_rehash() {
        let hashed = ClearTextPassword::new("TestPassword123!")
            .hash(&params())
            .unwrap();
        assert!(!hashed.needs_rehash(&params()));
        assert!(hashed.needs_rehash(&PasswordHashingParams::default()));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new("secret-value");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret-value"));
    }
}
