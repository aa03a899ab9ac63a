//! PostgreSQL Repository Implementations
//!
//! Every statement runs under the configured store deadline.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::{token::Token, user::User};
use crate::domain::repository::{PermissionRepository, TokenRepository, UserRepository};
use crate::domain::value_object::{
    credential::Credential, email::Email, permissions::Permissions,
    token_plaintext::TokenPlaintext, token_scope::TokenScope, user_id::UserId,
    user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

/// SQLSTATE foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE unique_violation
const UNIQUE_VIOLATION: &str = "23505";
/// Unique constraint on `users.email`
const USERS_EMAIL_KEY: &str = "users_email_key";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Run one statement under the store deadline
    async fn bounded<T, F>(&self, query: F) -> AuthResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        tokio::time::timeout(self.timeout, query)
            .await?
            .map_err(map_db_error)
    }
}

/// Translate constraint failures into domain errors
fn map_db_error(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => return AuthError::ConstraintViolation,
            Some(UNIQUE_VIOLATION) if db.constraint() == Some(USERS_EMAIL_KEY) => {
                return AuthError::DuplicateEmail;
            }
            _ => {}
        }
    }
    AuthError::Database(err)
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &mut User) -> AuthResult<()> {
        let password_hash = user.credential.phc_string()?;

        let (id, created_at, version) = self
            .bounded(
                sqlx::query_as::<_, (i64, DateTime<Utc>, i32)>(
                    r#"
                    INSERT INTO users (name, email, password_hash, activated)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, created_at, version
                    "#,
                )
                .bind(user.name.as_str())
                .bind(user.email.as_str())
                .bind(password_hash)
                .bind(user.activated)
                .fetch_one(&self.pool),
            )
            .await?;

        user.id = UserId::from_i64(id);
        user.created_at = created_at;
        user.version = version;

        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let row = self
            .bounded(
                sqlx::query_as::<_, UserRow>(
                    r#"
                    SELECT id, created_at, name, email, password_hash, activated, version
                    FROM users
                    WHERE id = $1
                    "#,
                )
                .bind(id.as_i64())
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = self
            .bounded(
                sqlx::query_as::<_, UserRow>(
                    r#"
                    SELECT id, created_at, name, email, password_hash, activated, version
                    FROM users
                    WHERE email = $1
                    "#,
                )
                .bind(email.as_str())
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update(&self, user: &mut User) -> AuthResult<()> {
        let password_hash = user.credential.phc_string()?;

        let version = self
            .bounded(
                sqlx::query_scalar::<_, i32>(
                    r#"
                    UPDATE users SET
                        name = $1,
                        email = $2,
                        password_hash = $3,
                        activated = $4,
                        version = version + 1
                    WHERE id = $5 AND version = $6
                    RETURNING version
                    "#,
                )
                .bind(user.name.as_str())
                .bind(user.email.as_str())
                .bind(password_hash)
                .bind(user.activated)
                .bind(user.id.as_i64())
                .bind(user.version)
                .fetch_optional(&self.pool),
            )
            .await?;

        user.version = version.ok_or(AuthError::EditConflict)?;

        Ok(())
    }
}

// ============================================================================
// Token Repository Implementation
// ============================================================================

impl TokenRepository for PgAuthRepository {
    async fn insert(&self, token: &Token) -> AuthResult<()> {
        self.bounded(
            sqlx::query(
                r#"
                INSERT INTO tokens (hash, user_id, expiry, scope)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&token.hash[..])
            .bind(token.user_id.as_i64())
            .bind(token.expiry)
            .bind(token.scope.code())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn get_user_for_token(
        &self,
        plaintext: &TokenPlaintext,
        scope: TokenScope,
    ) -> AuthResult<User> {
        let hash = plaintext.digest();

        let row = self
            .bounded(
                sqlx::query_as::<_, TokenUserRow>(
                    r#"
                    SELECT
                        users.id,
                        users.created_at,
                        users.name,
                        users.email,
                        users.password_hash,
                        users.activated,
                        users.version,
                        tokens.scope
                    FROM users
                    INNER JOIN tokens ON users.id = tokens.user_id
                    WHERE tokens.hash = $1
                      AND tokens.scope = $2
                      AND tokens.expiry > $3
                    "#,
                )
                .bind(&hash[..])
                .bind(scope.code())
                .bind(Utc::now())
                .fetch_optional(&self.pool),
            )
            .await?
            .ok_or(AuthError::RecordNotFound)?;

        if TokenScope::from_code(&row.scope)? != scope {
            return Err(AuthError::RecordNotFound);
        }

        row.user.into_user()
    }

    async fn delete_all_for_user(&self, user_id: UserId, scope: TokenScope) -> AuthResult<u64> {
        let deleted = self
            .bounded(
                sqlx::query("DELETE FROM tokens WHERE scope = $1 AND user_id = $2")
                    .bind(scope.code())
                    .bind(user_id.as_i64())
                    .execute(&self.pool),
            )
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deleted = self
            .bounded(
                sqlx::query("DELETE FROM tokens WHERE expiry <= $1")
                    .bind(Utc::now())
                    .execute(&self.pool),
            )
            .await?
            .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Cleaned up expired tokens");

        Ok(deleted)
    }
}

// ============================================================================
// Permission Repository Implementation
// ============================================================================

impl PermissionRepository for PgAuthRepository {
    async fn get_all_for_user(&self, user_id: UserId) -> AuthResult<Permissions> {
        let codes = self
            .bounded(
                sqlx::query_scalar::<_, String>(
                    r#"
                    SELECT permissions.code
                    FROM permissions
                    INNER JOIN users_permissions
                        ON users_permissions.permission_id = permissions.id
                    WHERE users_permissions.user_id = $1
                    ORDER BY permissions.code
                    "#,
                )
                .bind(user_id.as_i64())
                .fetch_all(&self.pool),
            )
            .await?;

        Ok(Permissions::new(codes))
    }

    async fn add_for_user(&self, user_id: UserId, codes: &[String]) -> AuthResult<()> {
        // Unknown codes are registered in the same statement
        self.bounded(
            sqlx::query(
                r#"
                WITH created AS (
                    INSERT INTO permissions (code)
                    SELECT UNNEST($2::text[])
                    ON CONFLICT (code) DO NOTHING
                    RETURNING id
                )
                INSERT INTO users_permissions (user_id, permission_id)
                SELECT $1, id FROM created
                UNION
                SELECT $1, id FROM permissions WHERE code = ANY($2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user_id.as_i64())
            .bind(codes)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    created_at: DateTime<Utc>,
    name: String,
    email: String,
    password_hash: String,
    activated: bool,
    version: i32,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let hash = HashedPassword::from_phc_string(self.password_hash).map_err(|e| {
            AuthError::Internal(format!("Invalid password hash for user {}: {}", self.id, e))
        })?;

        Ok(User {
            id: UserId::from_i64(self.id),
            created_at: self.created_at,
            name: UserName::from_db(self.name),
            email: Email::from_db(self.email),
            credential: Credential::from_hash(hash),
            activated: self.activated,
            version: self.version,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TokenUserRow {
    #[sqlx(flatten)]
    user: UserRow,
    scope: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_into_user_rejects_bad_hash() {
        let row = UserRow {
            id: 7,
            created_at: Utc::now(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: "not-a-phc-string".into(),
            activated: true,
            version: 1,
        };
        assert!(matches!(row.into_user(), Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_row_into_user() {
        let hash = platform::password::ClearTextPassword::new("correct horse battery")
            .hash(&platform::password::PasswordHashingParams::low_cost())
            .unwrap();
        let row = UserRow {
            id: 7,
            created_at: Utc::now(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: hash.as_phc_string().to_string(),
            activated: true,
            version: 3,
        };
        let user = row.into_user().unwrap();
        assert_eq!(user.id, UserId::from_i64(7));
        assert_eq!(user.version, 3);
        assert!(user.credential.plaintext().is_none());
        assert!(user.credential.matches("correct horse battery").unwrap());
    }

    #[test]
    fn test_non_database_error_passthrough() {
        assert!(matches!(
            map_db_error(sqlx::Error::RowNotFound),
            AuthError::Database(_)
        ));
    }
}
