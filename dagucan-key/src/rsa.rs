use rand_core::CryptoRngCore;
use rsa::{
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPublicKey},
    pkcs1v15,
    signature::{SignatureEncoding, Signer as _, Verifier as _},
    RsaPrivateKey, RsaPublicKey,
};
use sha2::Sha256;

use crate::{
    traits::check_algorithm, AsymmetricKey, GetKeyAlgorithm, KeyAlgorithm, KeyPairGenerate,
    KeyResult, PubKey, PublicKeyBytes, PublicKeyGenerate, Signature, SignatureAlgorithm, Signer,
    Verifier,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The modulus size of generated RSA keys.
pub const RSA_KEY_BITS: usize = 2048;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An RSA public key along with its PKCS#1 DER encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublic {
    key: RsaPublicKey,
    der: Vec<u8>,
}

/// An [`RSA`][ref] public key used for RS256 signatures.
///
/// [ref]: https://en.wikipedia.org/wiki/RSA_(cryptosystem)
pub type RsaPubKey = PubKey<RsaPublic>;

/// An [`RSA`][ref] key pair used for RS256 signatures.
///
/// [ref]: https://en.wikipedia.org/wiki/RSA_(cryptosystem)
pub type RsaKeyPair = RsaKey<RsaPrivateKey>;

pub(crate) type RsaKey<S> = AsymmetricKey<RsaPublic, S>;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RsaPublic {
    fn new(key: RsaPublicKey) -> KeyResult<Self> {
        let der = key.to_pkcs1_der()?.as_bytes().to_vec();
        Ok(Self { key, der })
    }
}

impl RsaKeyPair {
    /// Generates a key pair with a modulus of `bits` bits.
    pub fn generate_with_bits(rng: &mut impl CryptoRngCore, bits: usize) -> KeyResult<Self> {
        let private = RsaPrivateKey::new(rng, bits)?;
        Ok(Self {
            public: RsaPublic::new(private.to_public_key())?,
            private,
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl<S> Verifier for RsaKey<S> {
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::RS256
    }

    async fn verify(&self, payload: &[u8], signature: &Signature) -> KeyResult<()> {
        check_algorithm(SignatureAlgorithm::RS256, signature)?;
        let verifying_key = pkcs1v15::VerifyingKey::<Sha256>::new(self.public.key.clone());
        let signature = pkcs1v15::Signature::try_from(signature.raw())?;
        verifying_key
            .verify(payload, &signature)
            .map_err(Into::into)
    }
}

impl Signer for RsaKeyPair {
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::RS256
    }

    async fn sign(&self, payload: &[u8]) -> KeyResult<Vec<u8>> {
        let signing_key = pkcs1v15::SigningKey::<Sha256>::new(self.private.clone());
        let signature = signing_key.try_sign(payload)?;
        Ok(signature.to_vec())
    }
}

impl PublicKeyGenerate for RsaPubKey {
    /// Generates a public key from its PKCS#1 DER encoding.
    fn from_public_key(bytes: &[u8]) -> KeyResult<Self> {
        Ok(Self {
            public: RsaPublic::new(RsaPublicKey::from_pkcs1_der(bytes)?)?,
            private: (),
        })
    }
}

impl KeyPairGenerate for RsaKeyPair {
    fn generate(rng: &mut impl CryptoRngCore) -> KeyResult<Self> {
        Self::generate_with_bits(rng, RSA_KEY_BITS)
    }

    /// Constructs a key pair from its PKCS#1 DER encoded private key.
    fn from_private_key(bytes: &[u8]) -> KeyResult<Self> {
        let private = RsaPrivateKey::from_pkcs1_der(bytes)?;
        Ok(Self {
            public: RsaPublic::new(private.to_public_key())?,
            private,
        })
    }
}

impl<S> PublicKeyBytes for RsaKey<S> {
    /// Returns the PKCS#1 DER encoding of the public key.
    fn public_key_bytes(&self) -> Vec<u8> {
        self.public.der.clone()
    }
}

impl<S> GetKeyAlgorithm for RsaKey<S> {
    fn key_algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Rsa
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
