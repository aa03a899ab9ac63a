//! Token Entity
//!
//! One issued bearer credential. The plaintext lives only in this value and
//! is handed to the caller once; stores keep `hash`, `user_id`, `expiry`
//! and `scope`.

use chrono::{DateTime, Duration, Utc};
use platform::crypto;

use crate::domain::value_object::{
    token_plaintext::{TOKEN_ENTROPY_BYTES, TokenPlaintext},
    token_scope::TokenScope,
    user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

/// Token entity
#[derive(Debug, Clone)]
pub struct Token {
    /// Returned to the client at issuance, never persisted
    pub plaintext: TokenPlaintext,
    /// SHA-256 of the plaintext; the lookup key
    pub hash: [u8; 32],
    /// Owner
    pub user_id: UserId,
    /// Absolute expiry
    pub expiry: DateTime<Utc>,
    /// Purpose
    pub scope: TokenScope,
}

impl Token {
    /// Mint a token from 16 bytes of OS entropy
    ///
    /// Fails with `InvalidTtl` for a TTL that is not positive or whose expiry
    /// is not representable, before touching the random source. Fails with
    /// `EntropyUnavailable` if the source fails.
    pub fn generate(user_id: UserId, ttl: Duration, scope: TokenScope) -> AuthResult<Self> {
        if ttl <= Duration::zero() {
            return Err(AuthError::InvalidTtl);
        }
        let expiry = Utc::now()
            .checked_add_signed(ttl)
            .ok_or(AuthError::InvalidTtl)?;

        let entropy = crypto::random_array::<TOKEN_ENTROPY_BYTES>()?;
        let plaintext = TokenPlaintext::from_entropy(&entropy);
        let hash = plaintext.digest();

        Ok(Self {
            plaintext,
            hash,
            user_id,
            expiry,
            scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::token_plaintext::TOKEN_PLAINTEXT_LEN;
    use std::collections::HashSet;

    #[test]
    fn test_generate_shape() {
        let token = Token::generate(
            UserId::from_i64(1),
            Duration::hours(1),
            TokenScope::Authentication,
        )
        .unwrap();

        assert_eq!(token.plaintext.as_str().len(), TOKEN_PLAINTEXT_LEN);
        assert!(TokenPlaintext::parse(token.plaintext.as_str()).is_some());
        assert_eq!(token.hash, crypto::sha256(token.plaintext.as_str().as_bytes()));
        assert_eq!(token.scope, TokenScope::Authentication);
        assert!(token.expiry > Utc::now());
    }

    #[test]
    fn test_generate_expiry() {
        let before = Utc::now();
        let token =
            Token::generate(UserId::from_i64(1), Duration::days(3), TokenScope::Activation)
                .unwrap();
        let after = Utc::now();

        assert!(token.expiry >= before + Duration::days(3));
        assert!(token.expiry <= after + Duration::days(3));
    }

    #[test]
    fn test_generate_rejects_non_positive_ttl() {
        for ttl in [Duration::zero(), Duration::seconds(-1)] {
            assert!(matches!(
                Token::generate(UserId::from_i64(1), ttl, TokenScope::Authentication),
                Err(AuthError::InvalidTtl)
            ));
        }
    }

    #[test]
    fn test_generate_rejects_unrepresentable_expiry() {
        for ttl in [Duration::MAX, Duration::days(365 * 300_000)] {
            assert!(matches!(
                Token::generate(UserId::from_i64(1), ttl, TokenScope::Authentication),
                Err(AuthError::InvalidTtl)
            ));
        }
    }

    #[test]
    fn test_generate_distinct() {
        let mut plaintexts = HashSet::new();
        let mut hashes = HashSet::new();
        for _ in 0..10_000 {
            let token = Token::generate(
                UserId::from_i64(1),
                Duration::minutes(5),
                TokenScope::Authentication,
            )
            .unwrap();
            assert!(hashes.insert(token.hash));
            assert!(plaintexts.insert(token.plaintext.into_string()));
        }
    }
}
