//! Sign Up Use Case
//!
//! Registers an unactivated user and mails an activation token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::issue_token::IssueTokenUseCase;
use crate::domain::entity::user::User;
use crate::domain::mailer::Mailer;
use crate::domain::repository::{PermissionRepository, TokenRepository, UserRepository};
use crate::domain::value_object::{
    credential::Credential, email::Email, token_scope::TokenScope, user_name::UserName,
};
use crate::error::{AuthError, AuthResult, FieldErrors};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<U, T, P, M>
where
    U: UserRepository,
    T: TokenRepository,
    P: PermissionRepository,
    M: Mailer + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    permission_repo: Arc<P>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, T, P, M> SignUpUseCase<U, T, P, M>
where
    U: UserRepository,
    T: TokenRepository,
    P: PermissionRepository,
    M: Mailer + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<T>,
        permission_repo: Arc<P>,
        mailer: Arc<M>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            permission_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<User> {
        let mut errors = FieldErrors::new();

        let name = UserName::new(&input.name)
            .map_err(|e| errors.insert("name".into(), e.into()))
            .ok();
        let email = Email::new(&input.email)
            .map_err(|e| errors.insert("email".into(), e.into()))
            .ok();

        let mut credential = Credential::Unset;
        if !input.password.is_empty() {
            credential.set(&input.password, &self.config.password_hashing)?;
        }
        if let Err(e) = credential.check_policy() {
            errors.insert("password".into(), e);
        }

        let (Some(name), Some(email)) = (name, email) else {
            return Err(AuthError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let mut user = User::new(name, email, credential);
        self.user_repo.create(&mut user).await?;

        if !self.config.default_permissions.is_empty() {
            self.permission_repo
                .add_for_user(user.id, &self.config.default_permissions)
                .await?;
        }

        let token = IssueTokenUseCase::new(self.token_repo.clone())
            .execute(
                user.id,
                self.config.activation_token_ttl(),
                TokenScope::Activation,
            )
            .await?;

        tracing::info!(user_id = %user.id, "User signed up");

        // Delivery runs after the response; failures are only logged
        let mailer = self.mailer.clone();
        let recipient = user.clone();
        let plaintext = token.plaintext;
        tokio::spawn(async move {
            if let Err(e) = mailer.send_activation(&recipient, &plaintext).await {
                tracing::error!(user_id = %recipient.id, error = %e, "Activation email not sent");
            }
        });

        Ok(user)
    }
}
