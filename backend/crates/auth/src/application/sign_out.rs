//! Sign Out Use Case
//!
//! Revokes every authentication token of the caller (logout on all devices).

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::TokenRepository;
use crate::domain::value_object::token_scope::TokenScope;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<T>
where
    T: TokenRepository,
{
    token_repo: Arc<T>,
}

impl<T> SignOutUseCase<T>
where
    T: TokenRepository,
{
    pub fn new(token_repo: Arc<T>) -> Self {
        Self { token_repo }
    }

    pub async fn execute(&self, user: &User) -> AuthResult<u64> {
        let revoked = self
            .token_repo
            .delete_all_for_user(user.id, TokenScope::Authentication)
            .await?;

        tracing::info!(user_id = %user.id, revoked, "User signed out everywhere");

        Ok(revoked)
    }
}
