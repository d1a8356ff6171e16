use p256::ecdsa::{
    signature::{Signer as _, Verifier as _},
    SigningKey, VerifyingKey,
};
use rand_core::CryptoRngCore;

use crate::{
    traits::check_algorithm, AsymmetricKey, GetKeyAlgorithm, KeyAlgorithm, KeyPairGenerate,
    KeyResult, PubKey, PublicKeyBytes, PublicKeyGenerate, Signature, SignatureAlgorithm, Signer,
    Verifier,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A [`NIST P-256`][ref] public key.
///
/// [ref]: https://en.wikipedia.org/wiki/Elliptic_Curve_Digital_Signature_Algorithm
pub type P256PubKey = PubKey<VerifyingKey>;

/// A [`NIST P-256`][ref] key pair with a signing key.
///
/// [ref]: https://en.wikipedia.org/wiki/Elliptic_Curve_Digital_Signature_Algorithm
pub type P256KeyPair = P256Key<SigningKey>;

pub(crate) type P256Key<S> = AsymmetricKey<VerifyingKey, S>;

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl<S> Verifier for P256Key<S> {
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::ES256
    }

    async fn verify(&self, payload: &[u8], signature: &Signature) -> KeyResult<()> {
        check_algorithm(SignatureAlgorithm::ES256, signature)?;
        let signature = p256::ecdsa::Signature::from_slice(signature.raw())?;
        self.public
            .verify(payload, &signature)
            .map_err(Into::into)
    }
}

impl Signer for P256KeyPair {
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::ES256
    }

    async fn sign(&self, payload: &[u8]) -> KeyResult<Vec<u8>> {
        let signature: p256::ecdsa::Signature = self.private.try_sign(payload)?;
        Ok(signature.to_bytes().to_vec())
    }
}

impl PublicKeyGenerate for P256PubKey {
    /// Generates a public key from the given bytes from the [`Elliptic-Curve-Point-to-Octet-String` encoding][ref]
    /// described in SEC 1: Elliptic Curve Cryptography (Version 2.0).
    ///
    /// [ref]: http://www.secg.org/sec1-v2.pdf
    fn from_public_key(bytes: &[u8]) -> KeyResult<Self> {
        Ok(Self {
            public: VerifyingKey::from_sec1_bytes(bytes)?,
            private: (),
        })
    }
}

impl KeyPairGenerate for P256KeyPair {
    fn generate(rng: &mut impl CryptoRngCore) -> KeyResult<Self> {
        let signing_key = SigningKey::random(rng);
        Ok(Self {
            public: *signing_key.verifying_key(),
            private: signing_key,
        })
    }

    fn from_private_key(bytes: &[u8]) -> KeyResult<Self> {
        let signing_key = SigningKey::from_slice(bytes)?;
        Ok(Self {
            public: *signing_key.verifying_key(),
            private: signing_key,
        })
    }
}

impl<S> PublicKeyBytes for P256Key<S> {
    /// Returns the public key bytes in the compressed [`Elliptic-Curve-Point-to-Octet-String` encoding][ref]
    /// described in SEC 1: Elliptic Curve Cryptography (Version 2.0).
    ///
    /// [ref]: http://www.secg.org/sec1-v2.pdf
    fn public_key_bytes(&self) -> Vec<u8> {
        self.public.to_encoded_point(true).as_bytes().to_vec()
    }
}

impl<S> GetKeyAlgorithm for P256Key<S> {
    fn key_algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::P256
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
