use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum display name length in bytes
pub const USER_NAME_MAX_BYTES: usize = 500;

/// Display name of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(name: &str) -> Result<Self, &'static str> {
        let name = name.trim();
        if name.is_empty() {
            return Err("must be provided");
        }
        if name.len() > USER_NAME_MAX_BYTES {
            return Err("must not be more than 500 bytes long");
        }
        Ok(Self(name.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_trimmed() {
        assert_eq!(UserName::new("  Alice Smith ").unwrap().as_str(), "Alice Smith");
    }

    #[test]
    fn test_user_name_required() {
        assert_eq!(UserName::new("   "), Err("must be provided"));
    }

    #[test]
    fn test_user_name_byte_limit() {
        assert!(UserName::new(&"a".repeat(USER_NAME_MAX_BYTES)).is_ok());
        assert!(UserName::new(&"a".repeat(USER_NAME_MAX_BYTES + 1)).is_err());
        // 3 bytes per char
        assert!(UserName::new(&"あ".repeat(167)).is_err());
    }
}
