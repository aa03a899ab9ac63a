//! Application Layer
//!
//! Use cases and application services.

pub mod activate;
pub mod authenticate;
pub mod authorize;
pub mod change_password;
pub mod config;
pub mod issue_token;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use activate::ActivateUserUseCase;
pub use authenticate::AuthenticateUseCase;
pub use authorize::AuthorizeUseCase;
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use issue_token::IssueTokenUseCase;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
