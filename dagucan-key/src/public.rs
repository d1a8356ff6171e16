use crate::{
    Ed25519PubKey, GetKeyAlgorithm, KeyAlgorithm, KeyResult, P256PubKey, PublicKeyBytes,
    PublicKeyGenerate, RsaPubKey, Signature, SignatureAlgorithm, Verifier,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A public key of any supported algorithm.
///
/// This is what a `did:key` decodes to when it needs to act as a signature verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// `ed25519` public key.
    Ed25519(Ed25519PubKey),

    /// `NIST P-256` public key.
    P256(P256PubKey),

    /// `RSA` public key.
    Rsa(RsaPubKey),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PublicKey {
    /// Decodes a public key of the given algorithm from its raw bytes.
    pub fn from_raw(algorithm: KeyAlgorithm, bytes: &[u8]) -> KeyResult<Self> {
        let key = match algorithm {
            KeyAlgorithm::Ed25519 => Self::Ed25519(Ed25519PubKey::from_public_key(bytes)?),
            KeyAlgorithm::P256 => Self::P256(P256PubKey::from_public_key(bytes)?),
            KeyAlgorithm::Rsa => Self::Rsa(RsaPubKey::from_public_key(bytes)?),
        };

        Ok(key)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Verifier for PublicKey {
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.key_algorithm().signature_algorithm()
    }

    async fn verify(&self, payload: &[u8], signature: &Signature) -> KeyResult<()> {
        match self {
            Self::Ed25519(key) => key.verify(payload, signature).await,
            Self::P256(key) => key.verify(payload, signature).await,
            Self::Rsa(key) => key.verify(payload, signature).await,
        }
    }
}

impl PublicKeyBytes for PublicKey {
    fn public_key_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.public_key_bytes(),
            Self::P256(key) => key.public_key_bytes(),
            Self::Rsa(key) => key.public_key_bytes(),
        }
    }
}

impl GetKeyAlgorithm for PublicKey {
    fn key_algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
            Self::P256(_) => KeyAlgorithm::P256,
            Self::Rsa(_) => KeyAlgorithm::Rsa,
        }
    }
}

impl From<Ed25519PubKey> for PublicKey {
    fn from(key: Ed25519PubKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<P256PubKey> for PublicKey {
    fn from(key: P256PubKey) -> Self {
        Self::P256(key)
    }
}

impl From<RsaPubKey> for PublicKey {
    fn from(key: RsaPubKey) -> Self {
        Self::Rsa(key)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::{Ed25519KeyPair, KeyPairGenerate, P256KeyPair, Signer};

    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_public_key_dispatch() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let ed25519 = Ed25519KeyPair::generate(&mut rng)?;
        let p256 = P256KeyPair::generate(&mut rng)?;

        let ed25519_public =
            PublicKey::from_raw(KeyAlgorithm::Ed25519, &ed25519.public_key_bytes())?;
        let p256_public = PublicKey::from_raw(KeyAlgorithm::P256, &p256.public_key_bytes())?;
        assert_eq!(ed25519_public.signature_algorithm(), SignatureAlgorithm::EdDSA);
        assert_eq!(p256_public.signature_algorithm(), SignatureAlgorithm::ES256);

        let signature = Signature::new(SignatureAlgorithm::ES256, p256.sign(b"hello").await?);
        p256_public.verify(b"hello", &signature).await?;
        assert!(ed25519_public.verify(b"hello", &signature).await.is_err());

        Ok(())
    }

    #[test]
    fn test_public_key_from_bad_bytes() {
        assert!(PublicKey::from_raw(KeyAlgorithm::Ed25519, &[1, 2, 3]).is_err());
        assert!(PublicKey::from_raw(KeyAlgorithm::P256, &[0x02; 12]).is_err());
    }
}
