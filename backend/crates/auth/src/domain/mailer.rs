//! Mailer Trait
//!
//! Outbound mail is an external collaborator; only the interface lives here.

use crate::domain::entity::user::User;
use crate::domain::value_object::token_plaintext::TokenPlaintext;
use crate::error::AuthResult;

#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Deliver the activation token to the user's email address
    async fn send_activation(&self, user: &User, token: &TokenPlaintext) -> AuthResult<()>;
}
