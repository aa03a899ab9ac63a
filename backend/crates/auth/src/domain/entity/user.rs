//! User Entity
//!
//! Identity record with its embedded credential.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    credential::Credential, email::Email, user_id::UserId, user_name::UserName,
};

/// User entity
///
/// `id`, `created_at` and `version` are assigned by the store on insert.
#[derive(Debug, Clone)]
pub struct User {
    /// Database identifier
    pub id: UserId,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Display name
    pub name: UserName,
    /// Unique, lower-cased email
    pub email: Email,
    /// Password credential
    pub credential: Credential,
    /// Whether the email address has been confirmed
    pub activated: bool,
    /// Optimistic concurrency counter, bumped on every update
    pub version: i32,
}

impl User {
    /// Create a new, not yet persisted, unactivated user
    pub fn new(name: UserName, email: Email, credential: Credential) -> Self {
        Self {
            id: UserId::from_i64(0),
            created_at: Utc::now(),
            name,
            email,
            credential,
            activated: false,
            version: 0,
        }
    }

    pub fn activate(&mut self) {
        self.activated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_inactive() {
        let user = User::new(
            UserName::new("Alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            Credential::Unset,
        );
        assert!(!user.activated);
        assert_eq!(user.version, 0);
    }

    #[test]
    fn test_activate() {
        let mut user = User::new(
            UserName::new("Alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            Credential::Unset,
        );
        user.activate();
        assert!(user.activated);
    }
}
