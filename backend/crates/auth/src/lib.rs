//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and mailer traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory repositories, log mailer
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Registration with email activation tokens
//! - Bearer authentication tokens (`Authorization: Bearer <token>`)
//! - Logout on all devices and password change with token revocation
//! - Per-user permission codes checked by a route-level gate
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, tunable work factor
//! - Tokens carry 128 bits of OS entropy; only their SHA-256 is stored
//! - Unknown, expired, revoked and wrong-scope tokens are indistinguishable
//!   to the caller
//! - Every storage call runs under a deadline

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAuthRepository, postgres::PgAuthRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::{identity::Identity, token::Token, user::User};
    pub use crate::domain::value_object::{
        credential::Credential, email::Email, permissions::Permissions,
        token_plaintext::TokenPlaintext, token_scope::TokenScope, user_id::UserId,
        user_name::UserName,
    };
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::domain::repository::{PermissionRepository, TokenRepository, UserRepository};
    pub use crate::infra::memory::InMemoryAuthRepository as MemoryStore;
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}

pub mod middleware {
    pub use crate::presentation::identity::*;
    pub use crate::presentation::middleware::*;
}
