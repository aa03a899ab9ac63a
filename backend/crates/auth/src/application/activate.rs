//! Activate User Use Case
//!
//! Redeems an activation token and marks its owner as activated.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::value_object::{token_plaintext::TokenPlaintext, token_scope::TokenScope};
use crate::error::{AuthError, AuthResult};

/// Activate user use case
pub struct ActivateUserUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
}

impl<U, T> ActivateUserUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub fn new(user_repo: Arc<U>, token_repo: Arc<T>) -> Self {
        Self {
            user_repo,
            token_repo,
        }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<User> {
        if token.is_empty() {
            return Err(AuthError::field("token", "must be provided"));
        }
        let plaintext = TokenPlaintext::parse(token)
            .ok_or_else(|| AuthError::field("token", "must be 26 bytes long"))?;

        let mut user = match self
            .token_repo
            .get_user_for_token(&plaintext, TokenScope::Activation)
            .await
        {
            Ok(user) => user,
            Err(AuthError::RecordNotFound) => return Err(AuthError::InvalidActivationToken),
            Err(e) => return Err(e),
        };

        user.activate();
        self.user_repo.update(&mut user).await?;

        // Remaining activation tokens are now pointless
        self.token_repo
            .delete_all_for_user(user.id, TokenScope::Activation)
            .await?;

        tracing::info!(user_id = %user.id, "User activated");

        Ok(user)
    }
}
