//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Entropy from the OS CSPRNG that fails loudly instead of degrading
//! - SHA-256 digests and unpadded base-32 encoding
//! - Password hashing (Argon2id with a tunable work factor)
//! - Password policy checks on zeroizing clear-text buffers

pub mod crypto;
pub mod password;
