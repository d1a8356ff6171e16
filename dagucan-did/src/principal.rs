use dagucan_key::{AsymmetricKey, GetKeyAlgorithm, PublicKey, PublicKeyBytes};

use crate::{Did, DidResult};

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Anything that is identified by a DID, such as the issuer or audience of a token.
pub trait Principal {
    /// Returns the DID of the principal in its text form.
    fn did(&self) -> String;
}

/// Conversion of DIDs, DID strings and binary DIDs into a [`Did`].
pub trait IntoDid {
    /// Converts the value into a [`Did`].
    fn into_did(self) -> DidResult<Did>;
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations: Principal
//--------------------------------------------------------------------------------------------------

impl<T> Principal for &T
where
    T: Principal + ?Sized,
{
    fn did(&self) -> String {
        (**self).did()
    }
}

impl Principal for Did {
    fn did(&self) -> String {
        self.to_string()
    }
}

impl Principal for str {
    fn did(&self) -> String {
        self.to_string()
    }
}

impl Principal for String {
    fn did(&self) -> String {
        self.clone()
    }
}

impl<P, S> Principal for AsymmetricKey<P, S>
where
    AsymmetricKey<P, S>: PublicKeyBytes + GetKeyAlgorithm,
{
    fn did(&self) -> String {
        Did::from_key(self).to_string()
    }
}

impl Principal for PublicKey {
    fn did(&self) -> String {
        Did::from_key(self).to_string()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations: IntoDid
//--------------------------------------------------------------------------------------------------

impl IntoDid for Did {
    fn into_did(self) -> DidResult<Did> {
        Ok(self)
    }
}

impl IntoDid for &Did {
    fn into_did(self) -> DidResult<Did> {
        Ok(self.clone())
    }
}

impl IntoDid for &str {
    fn into_did(self) -> DidResult<Did> {
        Did::parse(self)
    }
}

impl IntoDid for String {
    fn into_did(self) -> DidResult<Did> {
        Did::parse(&self)
    }
}

impl IntoDid for &String {
    fn into_did(self) -> DidResult<Did> {
        Did::parse(self)
    }
}

impl IntoDid for &[u8] {
    fn into_did(self) -> DidResult<Did> {
        Did::from_bytes(self)
    }
}

impl IntoDid for Vec<u8> {
    fn into_did(self) -> DidResult<Did> {
        Did::from_bytes(&self)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use dagucan_key::{Ed25519KeyPair, KeyPairGenerate, Signature, SignatureAlgorithm, Signer, Verifier};

    use crate::DidError;

    use super::*;

    #[test_log::test]
    fn test_into_did_from_all_forms() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        let did = Did::parse(&alice.did())?;

        assert_eq!(alice.did().as_str().into_did()?, did);
        assert_eq!(alice.did().into_did()?, did);
        assert_eq!(did.to_bytes().as_slice().into_did()?, did);
        assert_eq!(did.to_bytes().into_did()?, did);
        assert_eq!((&did).into_did()?, did);
        assert_eq!(did.clone().into_did()?, did);

        Ok(())
    }

    #[test_log::test]
    fn test_into_did_rejects_non_did_strings() {
        assert!(matches!(
            "alice".into_did(),
            Err(DidError::InvalidDid(value)) if value == "alice"
        ));
    }

    #[test_log::test(tokio::test)]
    async fn test_did_key_verifier_checks_signatures() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        let verifier = Did::parse(&alice.did())?.verifier()?;
        assert_eq!(verifier.did(), alice.did());

        let signature = Signature::new(SignatureAlgorithm::EdDSA, alice.sign(b"hello").await?);
        verifier.verify(b"hello", &signature).await?;

        Ok(())
    }
}
