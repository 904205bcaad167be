//! Plan cache configuration, loaded from TOML.

use crate::query::escape::EscapeCharacter;
use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// PlanCacheConfig
///
/// ```toml
/// cache_plans = true
/// escape = "\\"
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PlanCacheConfig {
    /// When false, no method keeps a cached plan and every call rebuilds.
    pub cache_plans: bool,

    /// Escape character handed to plan builders for LIKE-style slots.
    pub escape: EscapeCharacter,
}

impl PlanCacheConfig {
    /// Parse a configuration document; missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(ConfigError::from)
    }
}

impl Default for PlanCacheConfig {
    fn default() -> Self {
        Self {
            cache_plans: true,
            escape: EscapeCharacter::DEFAULT,
        }
    }
}

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid plan cache config: {0}")]
    Parse(#[from] toml::de::Error),
}
