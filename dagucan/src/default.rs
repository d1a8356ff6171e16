//! Default configuration values.

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The UCAN version written into issued tokens.
pub const VERSION: &str = "0.9.1";

/// The default lifetime of an issued token in seconds.
pub const DEFAULT_LIFETIME: u64 = 30;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

pub(crate) const fn default_lifetime() -> u64 {
    DEFAULT_LIFETIME
}

pub(crate) fn default_version() -> String {
    VERSION.to_string()
}
