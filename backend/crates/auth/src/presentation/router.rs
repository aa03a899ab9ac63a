//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::mailer::Mailer;
use crate::domain::repository::{PermissionRepository, TokenRepository, UserRepository};
use crate::infra::{mailer::LogMailer, postgres::PgAuthRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, authenticate};

/// Create the Auth router with the PostgreSQL repository and log mailer
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, LogMailer, config)
}

/// Create a generic Auth router for any repository and mailer
///
/// Every route runs behind the `authenticate` middleware.
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: UserRepository + TokenRepository + PermissionRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let state = AuthAppState {
        repo: repo.clone(),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };
    let middleware_state = AuthMiddlewareState { repo };

    Router::new()
        .route("/v1/healthcheck", get(handlers::healthcheck))
        .route("/v1/users", post(handlers::register_user::<R, M>))
        .route("/v1/users/activated", put(handlers::activate_user::<R, M>))
        .route("/v1/users/me", get(handlers::current_user))
        .route(
            "/v1/users/me/permissions",
            get(handlers::current_permissions::<R, M>),
        )
        .route("/v1/users/password", put(handlers::change_password::<R, M>))
        .route(
            "/v1/tokens/authentication",
            post(handlers::create_authentication_token::<R, M>)
                .delete(handlers::delete_authentication_tokens::<R, M>),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state,
            authenticate::<R>,
        ))
        .with_state(state)
}
