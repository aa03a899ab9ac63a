//! Change Password Use Case
//!
//! Replaces the caller's password and revokes their authentication tokens.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::value_object::token_scope::TokenScope;
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    config: Arc<AuthConfig>,
}

impl<U, T> ChangePasswordUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub fn new(user_repo: Arc<U>, token_repo: Arc<T>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            token_repo,
            config,
        }
    }

    pub async fn execute(&self, user: &User, input: ChangePasswordInput) -> AuthResult<User> {
        if !user.credential.matches(&input.current_password)? {
            return Err(AuthError::field("currentPassword", "is incorrect"));
        }

        let mut updated = user.clone();
        updated
            .credential
            .set(&input.new_password, &self.config.password_hashing)?;
        updated
            .credential
            .check_policy()
            .map_err(|e| AuthError::field("newPassword", e))?;

        self.user_repo.update(&mut updated).await?;

        let revoked = self
            .token_repo
            .delete_all_for_user(updated.id, TokenScope::Authentication)
            .await?;

        tracing::info!(user_id = %updated.id, revoked, "Password changed");

        Ok(updated)
    }
}
