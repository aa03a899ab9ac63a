//! Credential Value Object
//!
//! A user's password in one of three states:
//! - `Unset`: nothing supplied yet
//! - `Plaintext`: set during the current operation; clear text still held
//!   (zeroized on drop) next to its hash so policy can be checked
//! - `Hashed`: loaded from storage; only the PHC hash exists
//!
//! Cloning a `Plaintext` credential yields `Hashed`: the clear text never
//! leaves the value it was set on.

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashingParams};

use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
pub enum Credential {
    #[default]
    Unset,
    Plaintext {
        plaintext: ClearTextPassword,
        hash: HashedPassword,
    },
    Hashed(HashedPassword),
}

impl Credential {
    /// Wrap a hash read back from storage
    pub fn from_hash(hash: HashedPassword) -> Self {
        Credential::Hashed(hash)
    }

    /// Hash `plaintext` with Argon2id and keep the clear text in memory
    pub fn set(&mut self, plaintext: &str, params: &PasswordHashingParams) -> AuthResult<()> {
        let plaintext = ClearTextPassword::new(plaintext);
        let hash = plaintext.hash(params)?;
        *self = Credential::Plaintext { plaintext, hash };
        Ok(())
    }

    /// Verify a candidate password
    ///
    /// `Ok(false)` for a wrong (or unset) password; `Err` only when the
    /// hashing engine itself fails.
    pub fn matches(&self, candidate: &str) -> AuthResult<bool> {
        let Some(hash) = self.hash() else {
            return Ok(false);
        };
        Ok(hash.verify(&ClearTextPassword::new(candidate))?)
    }

    pub fn plaintext(&self) -> Option<&ClearTextPassword> {
        match self {
            Credential::Plaintext { plaintext, .. } => Some(plaintext),
            _ => None,
        }
    }

    pub fn hash(&self) -> Option<&HashedPassword> {
        match self {
            Credential::Unset => None,
            Credential::Plaintext { hash, .. } | Credential::Hashed(hash) => Some(hash),
        }
    }

    /// True when the stored hash predates the configured work factor
    pub fn needs_rehash(&self, params: &PasswordHashingParams) -> bool {
        self.hash().is_some_and(|hash| hash.needs_rehash(params))
    }

    /// Password policy check; only meaningful while the clear text is held
    ///
    /// A `Hashed` credential passes (it was checked when it was set).
    pub fn check_policy(&self) -> Result<(), String> {
        match self {
            Credential::Unset => Err("must be provided".to_string()),
            Credential::Plaintext { plaintext, .. } => {
                plaintext.check_policy().map_err(|e| e.to_string())
            }
            Credential::Hashed(_) => Ok(()),
        }
    }

    /// PHC string for persistence
    pub(crate) fn phc_string(&self) -> AuthResult<&str> {
        self.hash()
            .map(HashedPassword::as_phc_string)
            .ok_or_else(|| AuthError::Internal("credential has no hash to persist".to_string()))
    }
}

impl Clone for Credential {
    fn clone(&self) -> Self {
        match self {
            Credential::Unset => Credential::Unset,
            Credential::Plaintext { hash, .. } | Credential::Hashed(hash) => {
                Credential::Hashed(hash.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PasswordHashingParams {
        PasswordHashingParams::low_cost()
    }

    #[test]
    fn test_set_then_matches() {
        let mut credential = Credential::default();
        credential.set("correct horse battery", &params()).unwrap();

        assert!(credential.matches("correct horse battery").unwrap());
        assert!(!credential.matches("correct horse battery!").unwrap());
        assert!(!credential.matches("").unwrap());
    }

    #[test]
    fn test_tri_state() {
        let mut credential = Credential::Unset;
        assert!(credential.plaintext().is_none());
        assert!(credential.hash().is_none());
        assert!(matches!(credential, Credential::Unset));

        credential.set("correct horse battery", &params()).unwrap();
        assert_eq!(
            credential.plaintext().map(|p| p.as_str()),
            Some("correct horse battery")
        );
        assert!(credential.hash().is_some());

        let reloaded = Credential::from_hash(credential.hash().cloned().unwrap());
        assert!(reloaded.plaintext().is_none());
        assert!(reloaded.matches("correct horse battery").unwrap());
    }

    #[test]
    fn test_clone_drops_plaintext() {
        let mut credential = Credential::Unset;
        credential.set("correct horse battery", &params()).unwrap();

        let copy = credential.clone();
        assert!(copy.plaintext().is_none());
        assert!(copy.matches("correct horse battery").unwrap());
    }

    #[test]
    fn test_unset_matches_nothing() {
        assert!(!Credential::Unset.matches("anything").unwrap());
    }

    #[test]
    fn test_check_policy() {
        assert_eq!(
            Credential::Unset.check_policy(),
            Err("must be provided".to_string())
        );

        let mut credential = Credential::Unset;
        credential.set("short", &params()).unwrap();
        assert_eq!(
            credential.check_policy(),
            Err("must be at least 8 characters long".to_string())
        );

        credential.set("correct horse battery", &params()).unwrap();
        assert!(credential.check_policy().is_ok());
    }

    #[test]
    fn test_hashing_failure_surfaces() {
        let bad = PasswordHashingParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        let mut credential = Credential::Unset;
        assert!(matches!(
            credential.set("correct horse battery", &bad),
            Err(AuthError::HashingFailure(_))
        ));
        assert!(matches!(credential, Credential::Unset));
    }

    #[test]
    fn test_needs_rehash() {
        let mut credential = Credential::Unset;
        assert!(!credential.needs_rehash(&params()));
        credential.set("correct horse battery", &params()).unwrap();
        assert!(!credential.needs_rehash(&params()));
        assert!(credential.needs_rehash(&PasswordHashingParams::default()));
    }
}
