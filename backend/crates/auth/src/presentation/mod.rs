//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, middleware and the request identity context.

pub mod dto;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use identity::{ActivatedUser, CurrentIdentity};
pub use middleware::{AuthMiddlewareState, PermissionGate, authenticate, require_permission};
pub use router::{auth_router, auth_router_generic};
