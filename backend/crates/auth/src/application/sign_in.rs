//! Sign In Use Case
//!
//! Checks email and password and issues an authentication token.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::password::{ClearTextPassword, MAX_PASSWORD_LENGTH};

use crate::application::config::AuthConfig;
use crate::application::issue_token::IssueTokenUseCase;
use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::value_object::{email::Email, token_scope::TokenScope};
use crate::error::{AuthError, AuthResult, FieldErrors};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// Token plaintext, shown to the client once
    pub token: String,
    pub expiry: DateTime<Utc>,
}

/// Sign in use case
pub struct SignInUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    config: Arc<AuthConfig>,
}

impl<U, T> SignInUseCase<U, T>
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

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let mut errors = FieldErrors::new();
        let email = Email::new(&input.email)
            .map_err(|e| errors.insert("email".into(), e.into()))
            .ok();
        if input.password.is_empty() {
            errors.insert("password".into(), "must be provided".into());
        } else if input.password.chars().count() > MAX_PASSWORD_LENGTH {
            errors.insert(
                "password".into(),
                format!("must not be more than {MAX_PASSWORD_LENGTH} characters long"),
            );
        }
        let Some(email) = email.filter(|_| errors.is_empty()) else {
            return Err(AuthError::Validation(errors));
        };

        // Unknown email and wrong password share one error and one Argon2 cost
        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            tracing::warn!("Sign-in attempt for unknown email");
            self.burn_hash(&input.password);
            return Err(AuthError::InvalidCredential);
        };

        if !user.credential.matches(&input.password)? {
            tracing::warn!(user_id = %user.id, "Sign-in attempt with wrong password");
            return Err(AuthError::InvalidCredential);
        }

        if user.credential.needs_rehash(&self.config.password_hashing) {
            let mut upgraded = user.clone();
            let result = match upgraded
                .credential
                .set(&input.password, &self.config.password_hashing)
            {
                Ok(()) => self.user_repo.update(&mut upgraded).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => tracing::info!(user_id = %user.id, "Password hash upgraded"),
                Err(e) => {
                    tracing::warn!(user_id = %user.id, error = %e, "Password rehash skipped")
                }
            }
        }

        let token = IssueTokenUseCase::new(self.token_repo.clone())
            .execute(
                user.id,
                self.config.authentication_token_ttl(),
                TokenScope::Authentication,
            )
            .await?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(SignInOutput {
            expiry: token.expiry,
            token: token.plaintext.into_string(),
        })
    }

    /// Spend one Argon2 hash on a candidate that has nothing to verify against
    fn burn_hash(&self, candidate: &str) {
        if let Err(e) = ClearTextPassword::new(candidate).hash(&self.config.password_hashing) {
            tracing::warn!(error = %e, "Dummy password hash failed");
        }
    }
}
