use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use rand_core::CryptoRngCore;

use crate::{
    traits::check_algorithm, AsymmetricKey, GetKeyAlgorithm, KeyAlgorithm, KeyPairGenerate,
    KeyResult, PubKey, PublicKeyBytes, PublicKeyGenerate, Signature, SignatureAlgorithm, Signer,
    Verifier,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An [`ed25519`][ref] verifying key.
///
/// [ref]: https://en.wikipedia.org/wiki/EdDSA
pub type Ed25519PubKey = PubKey<VerifyingKey>;

/// An [`ed25519`][ref] key pair with a signing key.
///
/// [ref]: https://en.wikipedia.org/wiki/EdDSA
pub type Ed25519KeyPair = Ed25519Key<SigningKey>;

pub(crate) type Ed25519Key<S> = AsymmetricKey<VerifyingKey, S>;

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl<S> Verifier for Ed25519Key<S> {
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::EdDSA
    }

    async fn verify(&self, payload: &[u8], signature: &Signature) -> KeyResult<()> {
        check_algorithm(SignatureAlgorithm::EdDSA, signature)?;
        let signature = ed25519_dalek::Signature::try_from(signature.raw())?;
        self.public
            .verify_strict(payload, &signature)
            .map_err(Into::into)
    }
}

impl Signer for Ed25519KeyPair {
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::EdDSA
    }

    async fn sign(&self, payload: &[u8]) -> KeyResult<Vec<u8>> {
        let signature = self.private.try_sign(payload)?;
        Ok(signature.to_vec())
    }
}

impl PublicKeyGenerate for Ed25519PubKey {
    fn from_public_key(bytes: &[u8]) -> KeyResult<Self> {
        Ok(Self {
            public: VerifyingKey::try_from(bytes)?,
            private: (),
        })
    }
}

impl KeyPairGenerate for Ed25519KeyPair {
    fn generate(rng: &mut impl CryptoRngCore) -> KeyResult<Self> {
        let signing_key = SigningKey::generate(rng);
        Ok(Self {
            public: signing_key.verifying_key(),
            private: signing_key,
        })
    }

    fn from_private_key(bytes: &[u8]) -> KeyResult<Self> {
        let signing_key = SigningKey::try_from(bytes)?;
        Ok(Self {
            public: signing_key.verifying_key(),
            private: signing_key,
        })
    }
}

impl<S> PublicKeyBytes for Ed25519Key<S> {
    fn public_key_bytes(&self) -> Vec<u8> {
        self.public.to_bytes().to_vec()
    }
}

impl<S> GetKeyAlgorithm for Ed25519Key<S> {
    fn key_algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Ed25519
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::KeyError;

    use super::*;

    #[test]
    fn test_ed25519_generate() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let key_pair = Ed25519KeyPair::generate(&mut rng)?;

        let public_key_bytes = key_pair.public_key_bytes();
        assert_eq!(public_key_bytes.len(), 32);

        let public_key = Ed25519PubKey::from_public_key(&public_key_bytes)?;
        assert_eq!(key_pair.public_key(), public_key);

        let private_key = Ed25519KeyPair::from_private_key(&key_pair.private.to_bytes())?;
        assert_eq!(key_pair, private_key);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_ed25519_sign_and_verify() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let key_pair = Ed25519KeyPair::generate(&mut rng)?;

        let payload = b"eyJhbGciOiJFZERTQSJ9.eyJpc3MiOiJkaWQ6a2V5In0";
        let raw = key_pair.sign(payload).await?;
        let signature = Signature::new(SignatureAlgorithm::EdDSA, raw);

        key_pair.verify(payload, &signature).await?;
        key_pair.public_key().verify(payload, &signature).await?;
        assert!(key_pair.verify(b"tampered", &signature).await.is_err());

        let other = Ed25519KeyPair::generate(&mut rng)?;
        assert!(other.verify(payload, &signature).await.is_err());

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_ed25519_rejects_other_algorithms() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let key_pair = Ed25519KeyPair::generate(&mut rng)?;

        let raw = key_pair.sign(b"payload").await?;
        let signature = Signature::new(SignatureAlgorithm::ES256, raw);

        let result = key_pair.verify(b"payload", &signature).await;
        tracing::debug!(?result);
        assert!(matches!(
            result,
            Err(KeyError::SignatureAlgorithmMismatch { .. })
        ));

        let raw = key_pair.sign(b"payload").await?;
        for algorithm in [
            SignatureAlgorithm::Unknown(0xd0ff),
            SignatureAlgorithm::NonStandard("PS256".into()),
        ] {
            let signature = Signature::new(algorithm.clone(), raw.clone());
            let result = key_pair.verify(b"payload", &signature).await;
            assert!(matches!(
                result,
                Err(KeyError::UnsupportedSignatureAlgorithm(actual)) if actual == algorithm
            ));
        }

        Ok(())
    }
}
