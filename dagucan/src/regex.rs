use lazy_static::lazy_static;
use regex::Regex;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

lazy_static! {
    /// Regex for a UCAN version such as `0.9.1`.
    pub static ref RE_VERSION: Regex = Regex::new(r"^\d+\.\d+\.\d+$").unwrap();

    /// Regex for a URI with a non-empty scheme.
    pub static ref RE_URI: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S*$").unwrap();

    /// Regex for a delegated resource of the form `as:<did>:*`.
    pub static ref RE_AS_DID: Regex = Regex::new(r"^as:did:[a-z0-9]+:\S+:\*$").unwrap();

    /// Regex for an ability made of at least two non-empty `/` separated segments.
    pub static ref RE_ABILITY: Regex = Regex::new(r"^[^/]+(?:/[^/]+)+$").unwrap();
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
