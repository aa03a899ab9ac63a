//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

pub use platform::password::PasswordHashingParams;

/// Upper bound for token TTLs read from the environment (10 years)
const MAX_TOKEN_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 3600);

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Activation token TTL (3 days)
    pub activation_ttl: Duration,
    /// Authentication token TTL (24 hours)
    pub authentication_ttl: Duration,
    /// Deadline applied to every storage call
    pub store_timeout: Duration,
    /// Argon2id work factor for new password hashes
    pub password_hashing: PasswordHashingParams,
    /// Permission codes granted to every new user
    pub default_permissions: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            activation_ttl: Duration::from_secs(3 * 24 * 3600), // 3 days
            authentication_ttl: Duration::from_secs(24 * 3600), // 24 hours
            store_timeout: Duration::from_secs(3),
            password_hashing: PasswordHashingParams::default(),
            default_permissions: Vec::new(),
        }
    }
}

/// Environment variable could not be parsed
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

impl AuthConfig {
    /// Create config for development (cheap password hashing)
    pub fn development() -> Self {
        Self {
            password_hashing: PasswordHashingParams::low_cost(),
            ..Default::default()
        }
    }

    /// Read overrides from `AUTH_*` environment variables
    ///
    /// Unset variables keep their default; unparsable ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let read = |name: &'static str| -> Result<Option<u64>, ConfigError> {
            match lookup(name) {
                None => Ok(None),
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .map(Some)
                    .map_err(|_| ConfigError { name, value }),
            }
        };
        let read_u32 = |name: &'static str, default: u32| -> Result<u32, ConfigError> {
            match read(name)? {
                None => Ok(default),
                Some(v) => u32::try_from(v).map_err(|_| ConfigError {
                    name,
                    value: v.to_string(),
                }),
            }
        };

        // Zero or oversized TTLs would fail every issuance; reject them at startup
        let read_ttl = |name: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match read(name)? {
                None => Ok(default),
                Some(secs) => {
                    let ttl = Duration::from_secs(secs);
                    if ttl.is_zero() || ttl > MAX_TOKEN_TTL {
                        return Err(ConfigError {
                            name,
                            value: secs.to_string(),
                        });
                    }
                    Ok(ttl)
                }
            }
        };

        Ok(Self {
            activation_ttl: read_ttl("AUTH_ACTIVATION_TTL_SECS", defaults.activation_ttl)?,
            authentication_ttl: read_ttl(
                "AUTH_AUTHENTICATION_TTL_SECS",
                defaults.authentication_ttl,
            )?,
            store_timeout: read("AUTH_STORE_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_timeout),
            password_hashing: PasswordHashingParams {
                memory_kib: read_u32(
                    "AUTH_ARGON2_MEMORY_KIB",
                    defaults.password_hashing.memory_kib,
                )?,
                iterations: read_u32(
                    "AUTH_ARGON2_ITERATIONS",
                    defaults.password_hashing.iterations,
                )?,
                parallelism: read_u32(
                    "AUTH_ARGON2_PARALLELISM",
                    defaults.password_hashing.parallelism,
                )?,
            },
            default_permissions: lookup("AUTH_DEFAULT_PERMISSIONS")
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|code| !code.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or(defaults.default_permissions),
        })
    }

    /// Activation TTL as a chrono duration
    pub fn activation_token_ttl(&self) -> chrono::Duration {
        to_chrono(self.activation_ttl)
    }

    /// Authentication TTL as a chrono duration
    pub fn authentication_token_ttl(&self) -> chrono::Duration {
        to_chrono(self.authentication_ttl)
    }
}

fn to_chrono(ttl: Duration) -> chrono::Duration {
    chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.activation_ttl, Duration::from_secs(259_200));
        assert_eq!(config.authentication_ttl, Duration::from_secs(86_400));
        assert_eq!(config.store_timeout, Duration::from_secs(3));
        assert_eq!(config.password_hashing.memory_kib, 19_456);
    }

    #[test]
    fn test_from_env_unset_keeps_defaults() {
        let config = AuthConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.authentication_ttl, AuthConfig::default().authentication_ttl);
    }

    #[test]
    fn test_from_env_overrides() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("AUTH_AUTHENTICATION_TTL_SECS", "3600"),
            ("AUTH_STORE_TIMEOUT_MS", "500"),
            ("AUTH_ARGON2_ITERATIONS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.authentication_ttl, Duration::from_secs(3600));
        assert_eq!(config.store_timeout, Duration::from_millis(500));
        assert_eq!(config.password_hashing.iterations, 3);
        assert_eq!(config.password_hashing.parallelism, 1);
    }

    #[test]
    fn test_from_env_default_permissions() {
        let config = AuthConfig::from_lookup(lookup(&[(
            "AUTH_DEFAULT_PERMISSIONS",
            "movies:read, movies:write,,",
        )]))
        .unwrap();
        assert_eq!(config.default_permissions, ["movies:read", "movies:write"]);
        assert!(AuthConfig::default().default_permissions.is_empty());
    }

    #[test]
    fn test_from_env_rejects_garbage() {
        let err = AuthConfig::from_lookup(lookup(&[("AUTH_ACTIVATION_TTL_SECS", "3d")]))
            .unwrap_err();
        assert_eq!(err.name, "AUTH_ACTIVATION_TTL_SECS");
    }

    #[test]
    fn test_from_env_rejects_unusable_ttl() {
        for value in ["0", "10000000000000"] {
            let err = AuthConfig::from_lookup(lookup(&[("AUTH_AUTHENTICATION_TTL_SECS", value)]))
                .unwrap_err();
            assert_eq!(err.name, "AUTH_AUTHENTICATION_TTL_SECS");
            assert_eq!(err.value, value);
        }
    }

    #[test]
    fn test_oversized_ttl_fails_issuance_without_panic() {
        use crate::domain::entity::token::Token;
        use crate::domain::value_object::{token_scope::TokenScope, user_id::UserId};
        use crate::error::AuthError;

        let config = AuthConfig {
            authentication_ttl: Duration::from_secs(10_000_000_000_000),
            ..AuthConfig::default()
        };
        assert!(matches!(
            Token::generate(
                UserId::from_i64(1),
                config.authentication_token_ttl(),
                TokenScope::Authentication,
            ),
            Err(AuthError::InvalidTtl)
        ));
    }

    #[test]
    fn test_chrono_ttl() {
        assert_eq!(
            AuthConfig::default().activation_token_ttl(),
            chrono::Duration::days(3)
        );
    }
}
