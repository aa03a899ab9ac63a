//! Request Identity
//!
//! Who is behind the current request: nobody (anonymous) or a resolved user.

use crate::domain::entity::user::User;
use crate::domain::value_object::permissions::Permissions;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub enum Identity {
    /// No `Authorization` header was sent
    Anonymous,
    /// Token resolved to this user
    User(User),
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Anonymous => None,
            Identity::User(user) => Some(user),
        }
    }

    /// The user, or `AuthenticationRequired` for an anonymous caller
    pub fn require_user(&self) -> AuthResult<&User> {
        self.user().ok_or(AuthError::AuthenticationRequired)
    }

    /// The user, provided the account is activated
    pub fn require_activated(&self) -> AuthResult<&User> {
        let user = self.require_user()?;
        if !user.activated {
            return Err(AuthError::InactiveAccount);
        }
        Ok(user)
    }

    /// The activated user, provided `permissions` (the user's grants)
    /// include `code`
    pub fn require_permission(&self, permissions: &Permissions, code: &str) -> AuthResult<&User> {
        let user = self.require_activated()?;
        if !permissions.include(code) {
            return Err(AuthError::PermissionDenied(code.to_string()));
        }
        Ok(user)
    }
}
