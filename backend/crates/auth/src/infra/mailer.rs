//! Log Mailer
//!
//! Stand-in for a real mail transport: records that an activation email
//! would have been sent. The token itself is not logged.

use crate::domain::entity::user::User;
use crate::domain::mailer::Mailer;
use crate::domain::value_object::token_plaintext::TokenPlaintext;
use crate::error::AuthResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send_activation(&self, user: &User, _token: &TokenPlaintext) -> AuthResult<()> {
        tracing::info!(
            user_id = %user.id,
            recipient = %user.email,
            template = "user_welcome",
            "Activation email queued"
        );
        Ok(())
    }
}
