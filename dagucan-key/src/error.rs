//! Error types of the dagucan-key crate.

use thiserror::Error;

use crate::SignatureAlgorithm;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A type alias for a `Result` that uses `KeyError` as the error type.
pub type KeyResult<T> = Result<T, KeyError>;

/// The main error type of the dagucan-key crate.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Signing or verification failed inside a signature primitive.
    #[error("Signature error: {0}")]
    SignatureError(#[from] ed25519_dalek::SignatureError),

    /// The verifier does not support the algorithm the signature was made with.
    #[error("Unsupported signature algorithm {0} (0x{code:x})", code = .0.code())]
    UnsupportedSignatureAlgorithm(SignatureAlgorithm),

    /// The signature was made with a different algorithm than the verifying key uses.
    #[error("Signature algorithm mismatch: expected {expected}, instead got {actual}")]
    SignatureAlgorithmMismatch {
        /// The algorithm of the verifying key.
        expected: SignatureAlgorithm,

        /// The algorithm recorded in the signature.
        actual: SignatureAlgorithm,
    },

    /// The signature envelope bytes are malformed.
    #[error("Invalid signature envelope: {0}")]
    InvalidSignatureEnvelope(String),

    /// A multicodec varint could not be read.
    #[error("Invalid varint: {0}")]
    InvalidVarint(String),

    /// The key bytes are malformed.
    #[error("Invalid {algorithm} key: {reason}")]
    InvalidKey {
        /// The key algorithm name.
        algorithm: &'static str,

        /// Why the key was rejected.
        reason: String,
    },

    /// RSA errors
    #[error("RSA error: {0}")]
    RsaError(#[from] ::rsa::Error),

    /// PKCS#1 encoding errors
    #[error("PKCS#1 error: {0}")]
    Pkcs1Error(#[from] ::rsa::pkcs1::Error),
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `KeyResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> KeyResult<T> {
    Result::Ok(value)
}
