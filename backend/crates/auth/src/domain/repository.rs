//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer. Every call is one atomic unit of work; no
//! operation spans more than one statement.

use crate::domain::entity::{token::Token, user::User};
use crate::domain::value_object::{
    email::Email, permissions::Permissions, token_plaintext::TokenPlaintext,
    token_scope::TokenScope, user_id::UserId,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user, filling in `id`, `created_at` and `version`
    ///
    /// Fails with `DuplicateEmail` if the address is taken.
    async fn create(&self, user: &mut User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    /// Find user by (lower-cased) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Write back a loaded user if its `version` is still current
    ///
    /// Bumps `version` on success; fails with `EditConflict` otherwise.
    async fn update(&self, user: &mut User) -> AuthResult<()>;
}

/// Token store trait
#[trait_variant::make(TokenRepository: Send)]
pub trait LocalTokenRepository {
    /// Persist a token's hash, owner, expiry and scope
    ///
    /// Fails with `ConstraintViolation` if the owner does not exist.
    async fn insert(&self, token: &Token) -> AuthResult<()>;

    /// Owner of an unexpired token with this plaintext and scope
    ///
    /// Fails with `RecordNotFound` for unknown, expired, wrong-scope and
    /// revoked tokens alike.
    async fn get_user_for_token(
        &self,
        plaintext: &TokenPlaintext,
        scope: TokenScope,
    ) -> AuthResult<User>;

    /// Revoke every token of `scope` owned by the user; idempotent
    async fn delete_all_for_user(&self, user_id: UserId, scope: TokenScope) -> AuthResult<u64>;

    /// Clean up expired tokens
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Permission repository trait
#[trait_variant::make(PermissionRepository: Send)]
pub trait LocalPermissionRepository {
    /// Every permission code granted to the user; empty if none
    async fn get_all_for_user(&self, user_id: UserId) -> AuthResult<Permissions>;

    /// Grant codes to the user; codes already held are left as they are
    ///
    /// Fails with `ConstraintViolation` if the user does not exist.
    async fn add_for_user(&self, user_id: UserId, codes: &[String]) -> AuthResult<()>;
}
