//! Domain Layer
//!
//! Contains entities, value objects, repository and mailer traits.

pub mod entity;
pub mod mailer;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{identity::Identity, token::Token, user::User};
pub use mailer::Mailer;
pub use repository::{PermissionRepository, TokenRepository, UserRepository};
