//! Infrastructure Layer
//!
//! Repository and mailer implementations.

pub mod mailer;
pub mod memory;
pub mod postgres;

pub use mailer::LogMailer;
pub use memory::InMemoryAuthRepository;
pub use postgres::PgAuthRepository;
