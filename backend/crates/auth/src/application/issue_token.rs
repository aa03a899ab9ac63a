//! Issue Token Use Case
//!
//! Mints a token and persists it. The returned value is the only place the
//! plaintext ever exists.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::entity::token::Token;
use crate::domain::repository::TokenRepository;
use crate::domain::value_object::{token_scope::TokenScope, user_id::UserId};
use crate::error::AuthResult;

/// Issue token use case
pub struct IssueTokenUseCase<T>
where
    T: TokenRepository,
{
    token_repo: Arc<T>,
}

impl<T> IssueTokenUseCase<T>
where
    T: TokenRepository,
{
    pub fn new(token_repo: Arc<T>) -> Self {
        Self { token_repo }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        ttl: Duration,
        scope: TokenScope,
    ) -> AuthResult<Token> {
        let token = Token::generate(user_id, ttl, scope)?;

        self.token_repo.insert(&token).await?;

        tracing::info!(
            user_id = %user_id,
            scope = %scope,
            expiry = %token.expiry,
            "Token issued"
        );

        Ok(token)
    }
}
