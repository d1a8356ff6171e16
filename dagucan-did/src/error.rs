//! Error types of the dagucan-did crate.

use dagucan_key::KeyAlgorithm;
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A type alias for a `Result` that uses `DidError` as the error type.
pub type DidResult<T> = Result<T, DidError>;

/// The main error type of the dagucan-did crate.
#[derive(Debug, Error)]
pub enum DidError {
    /// The value does not start with `did:`.
    #[error("Invalid DID \"{0}\", must start with 'did:'")]
    InvalidDid(String),

    /// The `did:key` identifier is not base58btc multibase encoded.
    #[error("Unsupported DID encoding, expected base58btc multibase prefix 'z' instead got '{0}'")]
    UnsupportedBase(char),

    /// The multicodec code does not name a supported public key type.
    #[error("Unsupported DID encoding, unknown multicode 0x{0:x}.")]
    UnsupportedKeyEncoding(u64),

    /// The `p256-pub` key is an uncompressed point.
    #[error("Only p256-pub compressed is supported.")]
    UncompressedP256Key,

    /// The key bytes do not have the shape the key type requires.
    #[error("Invalid {algorithm} key: {reason}")]
    InvalidKey {
        /// The key type.
        algorithm: KeyAlgorithm,

        /// Why the key was rejected.
        reason: String,
    },

    /// The DID carries no key material.
    #[error("DID \"{0}\" is not a did:key and cannot verify signatures")]
    NotAKeyDid(String),

    /// The binary form of an opaque DID is not valid UTF-8.
    #[error("Invalid DID bytes: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// Key error.
    #[error("Key error: {0}")]
    KeyError(#[from] dagucan_key::KeyError),

    /// Base encoding or decoding error.
    #[error("Base encoding or decoding error: {0}")]
    BaseError(#[from] multibase::Error),
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `DidResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> DidResult<T> {
    Result::Ok(value)
}
