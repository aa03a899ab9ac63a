//! Permissions Value Object
//!
//! The permission codes granted to one user, e.g. `tokens:read`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(Vec<String>);

impl Permissions {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(codes.into_iter().map(Into::into).collect())
    }

    /// Whether `code` is among the granted codes (exact match)
    pub fn include(&self, code: &str) -> bool {
        self.0.iter().any(|granted| granted == code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn codes(&self) -> &[String] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include() {
        let permissions = Permissions::new(["movies:read", "movies:write"]);
        assert!(permissions.include("movies:read"));
        assert!(permissions.include("movies:write"));
        assert!(!permissions.include("movies"));
        assert!(!permissions.include("MOVIES:READ"));
    }

    #[test]
    fn test_empty() {
        let permissions = Permissions::default();
        assert!(permissions.is_empty());
        assert!(!permissions.include(""));
    }

    #[test]
    fn test_serializes_as_list() {
        let permissions = Permissions::new(["movies:read"]);
        assert_eq!(
            serde_json::to_string(&permissions).unwrap(),
            r#"["movies:read"]"#
        );
    }
}
