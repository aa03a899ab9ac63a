//! Request Identity Context
//!
//! The resolved [`Identity`] rides in the request's extensions, so it lives
//! exactly as long as the request and is never shared between requests.
//!
//! Reading it before the `authenticate` middleware has attached it is a
//! programming error and panics: a handler that needs an identity must be
//! mounted behind the middleware.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{Extensions, Request, request::Parts};

use crate::domain::entity::{identity::Identity, user::User};
use crate::error::AuthError;

/// Attach the resolved identity to a request
pub fn attach<B>(mut req: Request<B>, identity: Identity) -> Request<B> {
    req.extensions_mut().insert(identity);
    req
}

/// Identity attached earlier in this request
///
/// # Panics
/// If [`attach`] has not run for this request.
pub fn resolve<B>(req: &Request<B>) -> &Identity {
    from_extensions(req.extensions())
}

fn from_extensions(extensions: &Extensions) -> &Identity {
    match extensions.get::<Identity>() {
        Some(identity) => identity,
        None => panic!(
            "missing identity in request extensions; \
             route is not behind the authenticate middleware"
        ),
    }
}

/// Extractor for the caller's identity, anonymous included
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentIdentity(from_extensions(&parts.extensions).clone()))
    }
}

/// Extractor that only admits an authenticated, activated user
///
/// Rejects anonymous callers with 401 and inactive accounts with 403.
#[derive(Debug, Clone)]
pub struct ActivatedUser(pub User);

impl<S> FromRequestParts<S> for ActivatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        from_extensions(&parts.extensions)
            .require_activated()
            .cloned()
            .map(ActivatedUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        credential::Credential, email::Email, user_name::UserName,
    };

    fn user(activated: bool) -> User {
        let mut user = User::new(
            UserName::new("Alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            Credential::Unset,
        );
        user.activated = activated;
        user
    }

    #[test]
    fn test_attach_then_resolve() {
        let req = attach(Request::new(()), Identity::User(user(true)));
        assert_eq!(
            resolve(&req).user().map(|u| u.email.as_str()),
            Some("alice@example.com")
        );
    }

    #[test]
    fn test_attach_anonymous() {
        let req = attach(Request::new(()), Identity::Anonymous);
        assert!(resolve(&req).is_anonymous());
    }

    #[test]
    fn test_requests_do_not_share_identity() {
        let a = attach(Request::new(()), Identity::User(user(true)));
        let b = attach(Request::new(()), Identity::Anonymous);
        assert!(!resolve(&a).is_anonymous());
        assert!(resolve(&b).is_anonymous());
    }

    #[test]
    #[should_panic(expected = "missing identity")]
    fn test_resolve_before_attach_panics() {
        let req = Request::new(());
        let _ = resolve(&req);
    }

    #[tokio::test]
    async fn test_activated_user_extractor() {
        let (mut parts, _) = attach(Request::new(()), Identity::User(user(false))).into_parts();
        let result = ActivatedUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::InactiveAccount)));

        let (mut parts, _) = attach(Request::new(()), Identity::Anonymous).into_parts();
        let result = ActivatedUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::AuthenticationRequired)));

        let (mut parts, _) = attach(Request::new(()), Identity::User(user(true))).into_parts();
        let ActivatedUser(user) = ActivatedUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.activated);
    }
}
