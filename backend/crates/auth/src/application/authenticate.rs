//! Authenticate Use Case
//!
//! Resolves the `Authorization` header of one request to an [`Identity`].
//!
//! ```text
//! no header ............................ Anonymous
//! not "Bearer <token>" ................. MalformedCredential
//! token fails the 26-char shape gate ... InvalidCredential
//! no live authentication token ......... InvalidCredential
//! owner not activated .................. InactiveAccount
//! otherwise ............................ Identity::User
//! ```

use std::sync::Arc;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::TokenRepository;
use crate::domain::value_object::{token_plaintext::TokenPlaintext, token_scope::TokenScope};
use crate::error::{AuthError, AuthResult};

/// Authenticate use case
pub struct AuthenticateUseCase<T>
where
    T: TokenRepository,
{
    token_repo: Arc<T>,
}

impl<T> AuthenticateUseCase<T>
where
    T: TokenRepository,
{
    pub fn new(token_repo: Arc<T>) -> Self {
        Self { token_repo }
    }

    /// Resolve the raw `Authorization` header value
    ///
    /// An empty header is treated the same as an absent one.
    pub async fn resolve(&self, authorization: Option<&str>) -> AuthResult<Identity> {
        let header = match authorization {
            None | Some("") => return Ok(Identity::Anonymous),
            Some(header) => header,
        };

        let raw = parse_bearer(header).ok_or(AuthError::MalformedCredential)?;

        let plaintext = TokenPlaintext::parse(raw).ok_or_else(|| {
            tracing::debug!(length = raw.len(), "Bearer token failed shape check");
            AuthError::InvalidCredential
        })?;

        let user = match self
            .token_repo
            .get_user_for_token(&plaintext, TokenScope::Authentication)
            .await
        {
            Ok(user) => user,
            Err(AuthError::RecordNotFound) => {
                tracing::debug!("Bearer token unknown, expired or revoked");
                return Err(AuthError::InvalidCredential);
            }
            Err(e) => return Err(e),
        };

        if !user.activated {
            tracing::debug!(user_id = %user.id, "Token owner not activated");
            return Err(AuthError::InactiveAccount);
        }

        Ok(Identity::User(user))
    }
}

/// Split `Bearer <token>`; exactly two space-separated parts
fn parse_bearer(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc"), Some("abc"));
        assert_eq!(parse_bearer("Bearer "), Some(""));
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("bearer abc"), None);
        assert_eq!(parse_bearer("Basic abc"), None);
        assert_eq!(parse_bearer("Bearer abc def"), None);
        assert_eq!(parse_bearer("Bearer  abc"), None);
    }
}
