//! Error types of the dagucan crate.

use dagucan_did::DidError;
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result type for UCAN operations.
pub type UcanResult<T> = Result<T, UcanError>;

/// Defines the types of errors that can occur in UCAN operations.
///
/// Errors about a field name the field and render the received value the way it would appear in
/// JSON, e.g. `"tomorrow"` for a string or `8.7` for a float.
#[derive(Debug, Error)]
pub enum UcanError {
    /// The token is not made of three dot-separated segments.
    #[error("Expected JWT format: 3 dot-separated base64url-encoded values.")]
    InvalidJwtFormat,

    /// Base64 decoding errors
    #[error("Base64 decoding error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// Json (de)serialization errors
    #[error("Json serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// DAG-CBOR encoding or decoding errors
    #[error("DAG-CBOR error: {0}")]
    CborError(#[from] serde_cbor::Error),

    /// The bytes are neither a DAG-CBOR map nor a JWT.
    #[error("Unsupported encoding, expected a DAG-CBOR map or a UTF-8 encoded JWT")]
    UnsupportedEncoding,

    /// A field has the wrong type.
    #[error("Expected {field} to be {expected}, instead got {received}")]
    ExpectedType {
        /// The field name, e.g. `nbf` or `prf[0]`.
        field: String,

        /// The expected type.
        expected: &'static str,

        /// The received value.
        received: String,
    },

    /// A field has a value outside of what it accepts.
    #[error("{field} has invalid value {received}")]
    InvalidValue {
        /// The field name.
        field: String,

        /// The received value.
        received: String,
    },

    /// A field that must be an array is not.
    #[error("{0} must be an array")]
    ExpectedArray(String),

    /// An element that must be an object is not.
    #[error("{field} must be of type object, instead got {received}")]
    ExpectedObject {
        /// The element name, e.g. `fct[0]`.
        field: String,

        /// The received value.
        received: String,
    },

    /// The signature field is not a signature envelope.
    #[error("Expected signature s, instead got {0}")]
    InvalidSignature(String),

    /// The `iss` or `aud` field is not a valid DID.
    #[error("Invalid {field}: {source}")]
    InvalidPrincipal {
        /// The field name.
        field: &'static str,

        /// Why the DID was rejected.
        source: DidError,
    },

    /// The issuer passed to the builder does not have a valid DID.
    #[error("Invalid issuer.did() \"{did}\": {source}")]
    InvalidIssuer {
        /// What `issuer.did()` returned.
        did: String,

        /// Why the DID was rejected.
        source: DidError,
    },

    /// The audience passed to the builder does not have a valid DID.
    #[error("Invalid audience.did() \"{did}\": {source}")]
    InvalidAudience {
        /// What `audience.did()` returned.
        did: String,

        /// Why the DID was rejected.
        source: DidError,
    },

    /// A capability violates the capability grammar.
    #[error("Capability has invalid '{field}: {received}', {reason}")]
    InvalidCapability {
        /// `with`, `can` or the name of a caveat.
        field: String,

        /// The received value.
        received: String,

        /// What the value must be.
        reason: &'static str,
    },

    /// The token version is not supported.
    #[error("Invalid version '{field}: {received}'")]
    UnsupportedVersion {
        /// `ucv` for JWTs and `v` for DAG-CBOR.
        field: &'static str,

        /// The received value.
        received: String,
    },

    /// The JWT header `typ` is not `JWT`.
    #[error("Expected typ to be a \"JWT\" instead got {0}")]
    UnsupportedTokenType(String),

    /// A proof link could not be read.
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    /// Key errors
    #[error("Key error: {0}")]
    KeyError(#[from] dagucan_key::KeyError),

    /// Did errors
    #[error("Did error: {0}")]
    DidError(#[from] DidError),

    /// Base encoding or decoding error.
    #[error("Base encoding or decoding error: {0}")]
    BaseError(#[from] multibase::Error),

    /// Io errors
    #[error("Io error: {0}")]
    IoError(#[from] std::io::Error),

    /// Toml deserialization errors
    #[error("Toml error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl UcanError {
    pub(crate) fn expected_type(
        field: impl Into<String>,
        expected: &'static str,
        received: impl Into<String>,
    ) -> Self {
        Self::ExpectedType {
            field: field.into(),
            expected,
            received: received.into(),
        }
    }

    pub(crate) fn invalid_value(field: impl Into<String>, received: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            received: received.into(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `UcanResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> UcanResult<T> {
    Result::Ok(value)
}
