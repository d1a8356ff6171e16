use std::future::Future;

use rand_core::CryptoRngCore;

use crate::{KeyAlgorithm, KeyResult, Signature, SignatureAlgorithm};

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// A collaborator that can sign payloads.
pub trait Signer {
    /// Returns the algorithm the signer signs with.
    fn signature_algorithm(&self) -> SignatureAlgorithm;

    /// Signs `payload`, returning the raw signature bytes.
    fn sign(&self, payload: &[u8]) -> impl Future<Output = KeyResult<Vec<u8>>>;
}

/// A collaborator that can verify signatures.
pub trait Verifier {
    /// Returns the algorithm the verifier checks signatures for.
    fn signature_algorithm(&self) -> SignatureAlgorithm;

    /// Verifies that `signature` was made over `payload` by the holder of this key.
    ///
    /// A signature made with any algorithm other than [`Verifier::signature_algorithm`] fails.
    fn verify(
        &self,
        payload: &[u8],
        signature: &Signature,
    ) -> impl Future<Output = KeyResult<()>>;
}

/// A trait for constructing a public key.
pub trait PublicKeyGenerate {
    /// Generates a public key from its bytes.
    fn from_public_key(bytes: &[u8]) -> KeyResult<Self>
    where
        Self: Sized;
}

/// A trait for constructing a key pair.
pub trait KeyPairGenerate {
    /// Generates a key pair from a cryptographically secure random number generator.
    fn generate(rng: &mut impl CryptoRngCore) -> KeyResult<Self>
    where
        Self: Sized;

    /// Constructs a key pair from its private key bytes.
    fn from_private_key(bytes: &[u8]) -> KeyResult<Self>
    where
        Self: Sized;
}

/// A trait for getting the public key bytes.
pub trait PublicKeyBytes {
    /// Returns the public key bytes.
    fn public_key_bytes(&self) -> Vec<u8>;
}

/// A trait for getting the algorithm of a key.
pub trait GetKeyAlgorithm {
    /// Returns the algorithm of the key.
    fn key_algorithm(&self) -> KeyAlgorithm;
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl<T> Signer for &T
where
    T: Signer,
{
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        (**self).signature_algorithm()
    }

    fn sign(&self, payload: &[u8]) -> impl Future<Output = KeyResult<Vec<u8>>> {
        (**self).sign(payload)
    }
}

impl<T> Verifier for &T
where
    T: Verifier,
{
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        (**self).signature_algorithm()
    }

    fn verify(
        &self,
        payload: &[u8],
        signature: &Signature,
    ) -> impl Future<Output = KeyResult<()>> {
        (**self).verify(payload, signature)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Fails unless `signature` was made with `expected`.
pub(crate) fn check_algorithm(expected: SignatureAlgorithm, signature: &Signature) -> KeyResult<()> {
    if !signature.algorithm().is_registered() {
        tracing::debug!(algorithm = %signature.algorithm(), "unregistered signature algorithm");
        return Err(crate::KeyError::UnsupportedSignatureAlgorithm(
            signature.algorithm().clone(),
        ));
    }

    if signature.algorithm() != &expected {
        tracing::debug!(%expected, actual = %signature.algorithm(), "signature algorithm mismatch");
        return Err(crate::KeyError::SignatureAlgorithmMismatch {
            expected,
            actual: signature.algorithm().clone(),
        });
    }

    Ok(())
}
