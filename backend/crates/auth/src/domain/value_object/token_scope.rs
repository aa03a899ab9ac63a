use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Purpose a token was issued for
///
/// Stored as its `code()` string; every read path goes back through
/// [`TokenScope::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    /// Proves control of an email address; short-lived
    #[display("activation")]
    Activation,
    /// Bearer credential for API access
    #[display("authentication")]
    Authentication,
}

impl TokenScope {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use TokenScope::*;
        match self {
            Activation => "activation",
            Authentication => "authentication",
        }
    }

    pub fn from_code(code: &str) -> AuthResult<Self> {
        use TokenScope::*;
        match code {
            "activation" => Ok(Activation),
            "authentication" => Ok(Authentication),
            _ => {
                tracing::error!(scope = %code, "Unknown token scope");
                Err(AuthError::InvalidScope(code.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for scope in [TokenScope::Activation, TokenScope::Authentication] {
            assert_eq!(TokenScope::from_code(scope.code()).unwrap(), scope);
            assert_eq!(scope.to_string(), scope.code());
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(matches!(
            TokenScope::from_code("password-reset"),
            Err(AuthError::InvalidScope(_))
        ));
        assert!(TokenScope::from_code("Authentication").is_err());
    }
}
