use dagucan_key::Verifier;

use crate::{jwt, time, Expiration, Ucan};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns `true` if the token expired before `now`.
pub fn is_expired_at(ucan: &Ucan, now: i64) -> bool {
    match ucan.expiration() {
        Expiration::Finite(expiration) => expiration < now,
        Expiration::Unbounded => false,
    }
}

/// Returns `true` if the token is not valid until after `now`.
pub fn is_too_early_at(ucan: &Ucan, now: i64) -> bool {
    ucan.not_before()
        .is_some_and(|not_before| not_before > now)
}

/// Returns `true` if the token has expired.
pub fn is_expired(ucan: &Ucan) -> bool {
    is_expired_at(ucan, time::now())
}

/// Returns `true` if the token is not valid yet.
pub fn is_too_early(ucan: &Ucan) -> bool {
    is_too_early_at(ucan, time::now())
}

/// Checks the signature of a token against the key of `verifier`.
///
/// Any failure reads as `false`: an algorithm the verifier does not use, an algorithm nobody
/// supports, a malformed key or signature, or a signature that does not match.
pub async fn verify_signature(ucan: &Ucan, verifier: &impl Verifier) -> bool {
    let algorithm = ucan.signature().algorithm();
    if *algorithm != verifier.signature_algorithm() {
        tracing::debug!(
            %algorithm,
            verifier = %verifier.signature_algorithm(),
            "signature algorithm does not match verifier"
        );
        return false;
    }

    let payload = jwt::signing_payload(ucan);
    match verifier.verify(&payload, ucan.signature()).await {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(%error, issuer = %ucan.issuer(), "ucan signature verification failed");
            false
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use dagucan_key::{Ed25519KeyPair, KeyPairGenerate, Signature, SignatureAlgorithm};

    use crate::Capability;

    use super::*;

    async fn issue(
        alice: &Ed25519KeyPair,
        expiration: Expiration,
        not_before: Option<i64>,
    ) -> anyhow::Result<Ucan> {
        let builder = Ucan::builder()
            .issuer(alice)
            .audience(alice)
            .capabilities([Capability::new("my:*", "*")?])
            .expiration(expiration);

        let builder = match not_before {
            Some(not_before) => builder.not_before(not_before),
            None => builder,
        };

        Ok(builder.issue().await?)
    }

    #[test_log::test(tokio::test)]
    async fn test_time_predicates() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        let now = time::now();

        let expired = issue(&alice, Expiration::Finite(now - 10), None).await?;
        assert!(expired.is_expired());
        assert!(!expired.is_too_early());

        let early = issue(&alice, Expiration::Finite(now + 60), Some(now + 30)).await?;
        assert!(!early.is_expired());
        assert!(early.is_too_early());

        let inverted = issue(&alice, Expiration::Finite(now - 10), Some(now + 10)).await?;
        assert!(inverted.is_expired());
        assert!(inverted.is_too_early());

        let unbounded = issue(&alice, Expiration::Unbounded, None).await?;
        assert!(!is_expired_at(&unbounded, i64::MAX));
        assert!(!is_too_early_at(&unbounded, i64::MIN));

        let boundary = issue(&alice, Expiration::Finite(100), Some(50)).await?;
        assert!(!is_expired_at(&boundary, 100));
        assert!(is_expired_at(&boundary, 101));
        assert!(!is_too_early_at(&boundary, 50));
        assert!(is_too_early_at(&boundary, 49));

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_verify_signature() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        let bob = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

        let ucan = issue(&alice, Expiration::Unbounded, None).await?;
        assert!(verify_signature(&ucan, &alice.public_key()).await);
        assert!(!verify_signature(&ucan, &bob.public_key()).await);

        let mut unknown = ucan.clone();
        unknown.signature = Signature::new(
            SignatureAlgorithm::Unknown(0xd0ff),
            ucan.signature().raw().to_vec(),
        );
        assert!(!verify_signature(&unknown, &alice.public_key()).await);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_signature_from_other_token_fails() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

        let put = Ucan::builder()
            .issuer(&alice)
            .audience(&alice)
            .capabilities([Capability::new("my:*", "store/put")?])
            .issue()
            .await?;

        let get = Ucan::builder()
            .issuer(&alice)
            .audience(&alice)
            .capabilities([Capability::new("my:*", "store/get")?])
            .issue()
            .await?;

        assert!(verify_signature(&put, &alice.public_key()).await);
        assert!(verify_signature(&get, &alice.public_key()).await);

        let mut swapped = put.clone();
        swapped.signature = get.signature().clone();
        assert!(!verify_signature(&swapped, &alice.public_key()).await);

        Ok(())
    }
}
