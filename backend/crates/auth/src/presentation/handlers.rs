//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ActivateUserUseCase, AuthorizeUseCase, ChangePasswordInput, ChangePasswordUseCase, SignInInput,
    SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::mailer::Mailer;
use crate::domain::repository::{PermissionRepository, TokenRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    ActivateRequest, ChangePasswordRequest, HealthResponse, PermissionsResponse, SignInRequest,
    SignInResponse, SignUpRequest, TokenResponse, UserEnvelope,
};
use crate::presentation::identity::ActivatedUser;

/// Shared state for auth handlers
pub struct AuthAppState<R, M>
where
    R: UserRepository + TokenRepository + PermissionRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

impl<R, M> Clone for AuthAppState<R, M>
where
    R: UserRepository + TokenRepository + PermissionRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// GET /v1/healthcheck
pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "available",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Users
// ============================================================================

/// POST /v1/users
pub async fn register_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + TokenRepository + PermissionRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let user = use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::ACCEPTED, Json(UserEnvelope::from(&user))))
}

/// PUT /v1/users/activated
pub async fn activate_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<ActivateRequest>,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + TokenRepository + PermissionRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ActivateUserUseCase::new(state.repo.clone(), state.repo.clone());

    let user = use_case.execute(&req.token).await?;

    Ok(Json(UserEnvelope::from(&user)))
}

/// GET /v1/users/me
pub async fn current_user(ActivatedUser(user): ActivatedUser) -> Json<UserEnvelope> {
    Json(UserEnvelope::from(&user))
}

/// GET /v1/users/me/permissions
pub async fn current_permissions<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ActivatedUser(user): ActivatedUser,
) -> AuthResult<Json<PermissionsResponse>>
where
    R: UserRepository + TokenRepository + PermissionRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let permissions = AuthorizeUseCase::new(state.repo.clone())
        .permissions_of(&user)
        .await?;

    Ok(Json(PermissionsResponse { permissions }))
}

/// PUT /v1/users/password
pub async fn change_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ActivatedUser(user): ActivatedUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + TokenRepository + PermissionRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case =
        ChangePasswordUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    use_case
        .execute(
            &user,
            ChangePasswordInput {
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Tokens
// ============================================================================

/// POST /v1/tokens/authentication
pub async fn create_authentication_token<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + TokenRepository + PermissionRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignInResponse {
            authentication_token: TokenResponse {
                token: output.token,
                expiry: output.expiry,
            },
        }),
    ))
}

/// DELETE /v1/tokens/authentication
pub async fn delete_authentication_tokens<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ActivatedUser(user): ActivatedUser,
) -> AuthResult<StatusCode>
where
    R: UserRepository + TokenRepository + PermissionRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    SignOutUseCase::new(state.repo.clone()).execute(&user).await?;

    Ok(StatusCode::NO_CONTENT)
}
