//! In-Memory Repository Implementation
//!
//! Same contract as the PostgreSQL repository, kept in process memory.
//! Used by tests and for running the API without a database.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entity::{token::Token, user::User};
use crate::domain::repository::{PermissionRepository, TokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, permissions::Permissions, token_plaintext::TokenPlaintext,
    token_scope::TokenScope, user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

/// Persisted part of a token; the plaintext is never kept
#[derive(Debug, Clone)]
struct StoredToken {
    user_id: UserId,
    expiry: DateTime<Utc>,
    scope: TokenScope,
}

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<UserId, User>,
    tokens: HashMap<[u8; 32], StoredToken>,
    permissions: BTreeMap<UserId, BTreeSet<String>>,
}

/// In-memory auth repository
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens, expired or not
    #[cfg(test)]
    pub(crate) async fn token_count(&self) -> usize {
        self.state.read().await.tokens.len()
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &mut User) -> AuthResult<()> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail);
        }

        state.next_id += 1;
        user.id = UserId::from_i64(state.next_id);
        user.created_at = Utc::now();
        user.version = 1;

        // Cloning keeps only the hash
        state.users.insert(user.id, user.clone());

        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn update(&self, user: &mut User) -> AuthResult<()> {
        let mut state = self.state.write().await;

        if state
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(AuthError::DuplicateEmail);
        }

        let stored = state
            .users
            .get_mut(&user.id)
            .filter(|stored| stored.version == user.version)
            .ok_or(AuthError::EditConflict)?;

        user.version += 1;
        *stored = user.clone();

        Ok(())
    }
}

impl TokenRepository for InMemoryAuthRepository {
    async fn insert(&self, token: &Token) -> AuthResult<()> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&token.user_id) {
            return Err(AuthError::ConstraintViolation);
        }

        state.tokens.insert(
            token.hash,
            StoredToken {
                user_id: token.user_id,
                expiry: token.expiry,
                scope: token.scope,
            },
        );

        Ok(())
    }

    async fn get_user_for_token(
        &self,
        plaintext: &TokenPlaintext,
        scope: TokenScope,
    ) -> AuthResult<User> {
        let state = self.state.read().await;
        let now = Utc::now();

        state
            .tokens
            .get(&plaintext.digest())
            .filter(|t| t.scope == scope && t.expiry > now)
            .and_then(|t| state.users.get(&t.user_id))
            .cloned()
            .ok_or(AuthError::RecordNotFound)
    }

    async fn delete_all_for_user(&self, user_id: UserId, scope: TokenScope) -> AuthResult<u64> {
        let mut state = self.state.write().await;
        let before = state.tokens.len();
        state
            .tokens
            .retain(|_, t| !(t.user_id == user_id && t.scope == scope));
        Ok((before - state.tokens.len()) as u64)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let before = state.tokens.len();
        state.tokens.retain(|_, t| t.expiry > now);
        let deleted = (before - state.tokens.len()) as u64;

        tracing::info!(tokens_deleted = deleted, "Cleaned up expired tokens");

        Ok(deleted)
    }
}

impl PermissionRepository for InMemoryAuthRepository {
    async fn get_all_for_user(&self, user_id: UserId) -> AuthResult<Permissions> {
        let state = self.state.read().await;
        Ok(state
            .permissions
            .get(&user_id)
            .map(|codes| Permissions::new(codes.iter().cloned()))
            .unwrap_or_default())
    }

    async fn add_for_user(&self, user_id: UserId, codes: &[String]) -> AuthResult<()> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user_id) {
            return Err(AuthError::ConstraintViolation);
        }

        state
            .permissions
            .entry(user_id)
            .or_default()
            .extend(codes.iter().cloned());

        Ok(())
    }
}
