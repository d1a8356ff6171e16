//! Configuration of token issuance.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    default::{default_lifetime, default_version},
    UcanError, UcanResult, RE_VERSION,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Settings applied by [`UcanBuilder`][crate::UcanBuilder] when a token does not set them itself.
///
/// ```toml
/// lifetime = 3600
/// version = "0.9.1"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, TypedBuilder)]
pub struct UcanConfig {
    /// Seconds from issuance until an issued token expires.
    #[serde(default = "default_lifetime")]
    #[builder(default = default_lifetime())]
    pub lifetime: u64,

    /// The version written into issued tokens.
    #[serde(default = "default_version")]
    #[builder(default = default_version(), setter(into))]
    pub version: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl UcanConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> UcanResult<()> {
        if !RE_VERSION.is_match(&self.version) {
            return Err(UcanError::InvalidConfig(format!(
                "version \"{}\" must be of the form <major>.<minor>.<patch>",
                self.version
            )));
        }

        if i64::try_from(self.lifetime).is_err() {
            return Err(UcanError::InvalidConfig(format!(
                "lifetime {} is out of range",
                self.lifetime
            )));
        }

        Ok(())
    }

    /// Loads and validates a configuration from a toml file.
    pub fn from_file(path: impl AsRef<Path>) -> UcanResult<Self> {
        let config = fs::read_to_string(path)?;
        Self::from_string(config)
    }

    /// Loads and validates a configuration from a toml string.
    pub fn from_string(config: impl AsRef<str>) -> UcanResult<Self> {
        let config: Self = toml::from_str(config.as_ref())?;
        config.validate()?;
        Ok(config)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for UcanConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
