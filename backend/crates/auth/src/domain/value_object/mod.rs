//! Value Object Module

pub mod credential;
pub mod email;
pub mod permissions;
pub mod token_plaintext;
pub mod token_scope;
pub mod user_id;
pub mod user_name;
