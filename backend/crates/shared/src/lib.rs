//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Error classification ([`error::kind::ErrorKind`])
//! - The unified application error and result alias
//! - HTTP rendering of errors as problem details (feature `axum`)
//!
//! Only things with the same meaning across every domain crate belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
