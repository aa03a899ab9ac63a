//! Authorize Use Case
//!
//! Checks that the caller is an activated user holding a permission code.

use std::sync::Arc;

use crate::domain::entity::{identity::Identity, user::User};
use crate::domain::repository::PermissionRepository;
use crate::domain::value_object::permissions::Permissions;
use crate::error::AuthResult;

/// Authorize use case
pub struct AuthorizeUseCase<P>
where
    P: PermissionRepository,
{
    permission_repo: Arc<P>,
}

impl<P> AuthorizeUseCase<P>
where
    P: PermissionRepository,
{
    pub fn new(permission_repo: Arc<P>) -> Self {
        Self { permission_repo }
    }

    /// The caller, if activated and granted `code`
    ///
    /// Anonymous callers fail with `AuthenticationRequired`, inactive ones
    /// with `InactiveAccount`, both before any lookup.
    pub async fn execute(&self, identity: &Identity, code: &str) -> AuthResult<User> {
        let user = identity.require_activated()?;
        let permissions = self.permission_repo.get_all_for_user(user.id).await?;

        identity
            .require_permission(&permissions, code)
            .inspect_err(|_| {
                tracing::debug!(user_id = %user.id, permission = code, "Permission denied");
            })
            .cloned()
    }

    /// Permission codes granted to the user
    pub async fn permissions_of(&self, user: &User) -> AuthResult<Permissions> {
        self.permission_repo.get_all_for_user(user.id).await
    }
}
