//! Engine configuration.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{DEFAULT_LINK_DOMAIN, DEFAULT_MAX_SIGNING_ATTEMPTS, DEFAULT_USER_ID};

/// Parameters shared by every operation of an [`Engine`](crate::Engine).
///
/// The library never reads files or the environment; callers build a
/// `Config` however they like (literal, `serde`, defaults) and hand it over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SM2 distinguishing identifier hashed into the signer context `Z`.
    pub user_id: Vec<u8>,
    /// Domain of the linkability tag. Two ring signatures by one key share a
    /// tag only when produced under the same domain.
    pub link_domain: Vec<u8>,
    /// Upper bound on SM2 nonce draws before giving up. At least one.
    #[serde(deserialize_with = "at_least_one")]
    pub max_signing_attempts: u32,
}

fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(u32::deserialize(deserializer)?.max(1))
}

impl Default for Config {
    fn default() -> Self {
        Config {
            user_id: DEFAULT_USER_ID.to_vec(),
            link_domain: DEFAULT_LINK_DOMAIN.to_vec(),
            max_signing_attempts: DEFAULT_MAX_SIGNING_ATTEMPTS,
        }
    }
}

impl Config {
    pub fn with_user_id(mut self, user_id: impl Into<Vec<u8>>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_link_domain(mut self, link_domain: impl Into<Vec<u8>>) -> Self {
        self.link_domain = link_domain.into();
        self
    }

    pub fn with_max_signing_attempts(mut self, attempts: u32) -> Self {
        self.max_signing_attempts = attempts.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.user_id, b"1234567812345678");
        assert_eq!(config.max_signing_attempts, 10);
    }

    #[test]
    fn test_builder_clamps_attempts() {
        let config = Config::default().with_max_signing_attempts(0);
        assert_eq!(config.max_signing_attempts, 1);
    }

    #[test]
    fn test_deserialize_clamps_attempts() {
        let zero = Config {
            max_signing_attempts: 0,
            ..Config::default()
        };
        let bytes = bincode::serialize(&zero).unwrap();
        let decoded: Config = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded.max_signing_attempts, 1);
    }

    #[test]
    fn test_bincode_roundtrip() {
        let partial = Config {
            link_domain: b"app".to_vec(),
            ..Config::default()
        };
        let bytes = bincode::serialize(&partial).unwrap();
        let decoded: Config = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, partial);
    }
}
