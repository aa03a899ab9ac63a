//! Auth Middleware
//!
//! Resolves the bearer token once per request and attaches the result to
//! the request before any handler runs.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::{AuthenticateUseCase, AuthorizeUseCase};
use crate::domain::repository::{PermissionRepository, TokenRepository};
use crate::error::AuthError;
use crate::presentation::identity;

/// Middleware state
pub struct AuthMiddlewareState<R>
where
    R: TokenRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

impl<R> Clone for AuthMiddlewareState<R>
where
    R: TokenRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

/// Attach the caller's [`Identity`](crate::domain::Identity) or reject the request
///
/// Anonymous callers pass through; rejected tokens end the request with
/// 401 or 403.
pub async fn authenticate<R>(
    State(state): State<AuthMiddlewareState<R>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    R: TokenRepository + Send + Sync + 'static,
{
    let resolved = match authorization_header(&req) {
        Ok(authorization) => {
            AuthenticateUseCase::new(state.repo.clone())
                .resolve(authorization.as_deref())
                .await
        }
        Err(e) => Err(e),
    };

    let mut response = match resolved {
        Ok(identity) => next.run(identity::attach(req, identity)).await,
        Err(e) => e.into_response(),
    };

    // Responses differ by caller
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));

    response
}

/// Permission gate state: the code a route requires
pub struct PermissionGate<R>
where
    R: PermissionRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub code: &'static str,
}

impl<R> Clone for PermissionGate<R>
where
    R: PermissionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            code: self.code,
        }
    }
}

/// Admit only activated callers holding the gate's permission code
///
/// Mount as a route layer behind [`authenticate`]. Anonymous callers get
/// 401, inactive or unpermitted ones 403.
pub async fn require_permission<R>(
    State(gate): State<PermissionGate<R>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    R: PermissionRepository + Send + Sync + 'static,
{
    let identity = identity::resolve(&req).clone();

    match AuthorizeUseCase::new(gate.repo.clone())
        .execute(&identity, gate.code)
        .await
    {
        Ok(_) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}

/// Owned copy of the `Authorization` header; non-ASCII values are malformed
fn authorization_header<B>(req: &Request<B>) -> Result<Option<String>, AuthError> {
    req.headers()
        .get(header::AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map(str::to_owned)
                .map_err(|_| AuthError::MalformedCredential)
        })
        .transpose()
}
