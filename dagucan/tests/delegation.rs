use dagucan::{
    decode, encode, parse, Capability, Expiration, Fact, Principal, Sha256, SignatureAlgorithm,
    Signer, Ucan, Verifier, DAG_CBOR, RAW,
};
use dagucan_key::{Ed25519KeyPair, KeyPairGenerate, KeyResult, RsaKeyPair};
use serde_json::{json, Value};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Signs with an ed25519 key under a DNS name.
struct DnsSigner<'a> {
    name: &'static str,
    key: &'a Ed25519KeyPair,
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Principal for DnsSigner<'_> {
    fn did(&self) -> String {
        format!("did:dns:{}", self.name)
    }
}

impl Signer for DnsSigner<'_> {
    fn signature_algorithm(&self) -> SignatureAlgorithm {
        Signer::signature_algorithm(self.key)
    }

    async fn sign(&self, payload: &[u8]) -> KeyResult<Vec<u8>> {
        self.key.sign(payload).await
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[test_log::test(tokio::test)]
async fn test_self_issued_token_verifies_against_issuer_did() -> anyhow::Result<()> {
    let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

    let ucan = Ucan::builder()
        .issuer(&alice)
        .audience(&alice)
        .capabilities([Capability::new(alice.did(), "store/put")?])
        .issue()
        .await?;

    tracing::debug!(token = %ucan);
    assert!(!ucan.is_expired());
    assert!(!ucan.is_too_early());
    assert!(ucan.verify_signature(&ucan.issuer().verifier()?).await);

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_derived_token_links_to_its_proof() -> anyhow::Result<()> {
    let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
    let bob = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
    let mallory = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

    let root = Ucan::builder()
        .issuer(&alice)
        .audience(&bob)
        .capabilities([Capability::new(alice.did(), "store/put")?])
        .issue()
        .await?;

    let proof = root.link(&Sha256).await?;
    assert_eq!(proof.codec(), DAG_CBOR);

    let leaf = Ucan::builder()
        .issuer(&bob)
        .audience(&mallory)
        .capabilities(root.capabilities().to_vec())
        .expiration(root.expiration())
        .proofs([proof.clone()])
        .issue()
        .await?;

    assert_eq!(leaf.issuer().to_string(), bob.did());
    assert_eq!(leaf.audience().to_string(), mallory.did());
    assert_eq!(leaf.capabilities(), root.capabilities());
    assert_eq!(leaf.expiration(), root.expiration());
    assert_eq!(leaf.proofs(), &[proof.clone()]);

    let decoded = decode(&encode(&leaf)?)?;
    assert_eq!(decoded, leaf);

    let reparsed = parse(&leaf.to_string())?;
    assert_eq!(reparsed.proofs(), &[proof]);
    assert!(reparsed.is_cbor());

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_issue_by_non_key_did() -> anyhow::Result<()> {
    let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
    let bob = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
    let signer = DnsSigner {
        name: "alice.space",
        key: &alice,
    };

    let ucan = Ucan::builder()
        .issuer(&signer)
        .audience(&bob)
        .capabilities([Capability::new(alice.did(), "store/put")?])
        .issue()
        .await?;

    assert_eq!(ucan.issuer().to_string(), "did:dns:alice.space");
    assert!(!ucan.issuer().is_key());
    assert!(ucan.issuer().verifier().is_err());
    assert!(ucan.expiration().as_finite() > Some(dagucan::now()));

    let token = ucan.to_string();
    let (payload, _) = token.rsplit_once('.').unwrap_or_default();
    alice.verify(payload.as_bytes(), ucan.signature()).await?;
    assert!(ucan.verify_signature(&alice).await);

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_rsa_issuer() -> anyhow::Result<()> {
    let bot = RsaKeyPair::generate_with_bits(&mut rand::thread_rng(), 1024)?;
    let bob = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

    let ucan = Ucan::builder()
        .issuer(&bot)
        .audience(&bob)
        .capabilities([Capability::new(bot.did(), "store/put")?])
        .issue()
        .await?;

    assert_eq!(ucan.signature().algorithm().name(), "RS256");
    assert_eq!(decode(&encode(&ucan)?)?, ucan);
    assert!(ucan.verify_signature(&ucan.issuer().verifier()?).await);

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_audiences_with_other_dids() -> anyhow::Result<()> {
    let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

    for audience in [
        "did:key:zDnaehbKF2iga4pf2D42ygGALc9EkQzTdcu43RpaAk45sUdW6",
        "did:dns:ucan.storage",
        "did:web:ucan.storage",
    ] {
        let ucan = Ucan::builder()
            .issuer(&alice)
            .audience(audience)
            .capabilities([Capability::new(alice.did(), "store/put")?])
            .nonce("hello")
            .issue()
            .await?;

        assert_eq!(ucan.audience().to_string(), audience);
        assert_eq!(decode(&encode(&ucan)?)?, ucan);
        assert_eq!(parse(&ucan.to_string())?, ucan);
    }

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_permanent_delegation() -> anyhow::Result<()> {
    let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
    let bob = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

    let ucan = Ucan::builder()
        .issuer(&alice)
        .audience(&bob)
        .capabilities([Capability::new(alice.did(), "store/put")?])
        .expiration(Expiration::Unbounded)
        .issue()
        .await?;

    assert!(ucan.expiration().is_unbounded());
    assert!(!ucan.is_expired());

    let token = ucan.to_string();
    let body = token.split('.').nth(1).unwrap_or_default();
    let body: Value = serde_json::from_slice(&base64_url_decode(body)?)?;
    assert!(body.get("exp").is_none());

    assert_eq!(parse(&token)?, ucan);
    assert_eq!(decode(&encode(&ucan)?)?, ucan);

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_namespace_ability() -> anyhow::Result<()> {
    let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
    let bob = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

    let ucan = Ucan::builder()
        .issuer(&alice)
        .audience(&bob)
        .capabilities([Capability::new(alice.did(), "account/*")?])
        .issue()
        .await?;

    assert_eq!(ucan.capabilities()[0].can(), "account/*");

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_optional_fields_survive_both_encodings() -> anyhow::Result<()> {
    let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
    let bob = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

    let ucan = Ucan::builder()
        .issuer(&alice)
        .audience(&bob)
        .capabilities([Capability::new(alice.did(), "store/put")?])
        .facts([fact(json!({ "hello": "world" })), fact(json!({ "nested": [1, 2] }))])
        .nonce("1100263a4012")
        .not_before(1_650_000_000)
        .issue()
        .await?;

    assert_eq!(ucan.facts().len(), 2);
    assert_eq!(ucan.nonce(), Some("1100263a4012"));
    assert_eq!(ucan.not_before(), Some(1_650_000_000));

    assert_eq!(decode(&encode(&ucan)?)?, ucan);
    assert_eq!(parse(&ucan.to_string())?, ucan);

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_write_matches_link() -> anyhow::Result<()> {
    let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

    let ucan = Ucan::builder()
        .issuer(&alice)
        .audience(&alice)
        .capabilities([Capability::new("my:*", "*")?])
        .issue()
        .await?;

    let block = ucan.write(&Sha256).await?;
    assert_eq!(block.cid(), &ucan.link(&Sha256).await?);
    assert_eq!(block.bytes().as_ref(), encode(&ucan)?.as_slice());
    assert_eq!(block.decode()?, ucan);

    let (cid, _) = block.into_parts();
    let parsed = cid.to_string().parse()?;
    assert_eq!(cid, parsed);

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_text_native_token_links_differently() -> anyhow::Result<()> {
    let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

    let ucan = Ucan::builder()
        .issuer(&alice)
        .audience(&alice)
        .capabilities([Capability::new("my:*", "*")?])
        .issue()
        .await?;

    let token = ucan.to_string();
    let text_native = decode(token.as_bytes())?;
    assert!(!text_native.is_cbor());
    assert_eq!(text_native.claims(), ucan.claims());

    let cbor_link = ucan.link(&Sha256).await?;
    let text_link = text_native.link(&Sha256).await?;
    assert_ne!(cbor_link, text_link);
    assert_eq!(text_link.codec(), RAW);
    assert_eq!(text_link.inline_jwt(), Some(token.as_str()));

    assert!(text_native.verify_signature(&alice).await);

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_cbor_token_with_text_native_proof() -> anyhow::Result<()> {
    let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
    let bob = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

    let root = Ucan::builder()
        .issuer(&alice)
        .audience(&bob)
        .capabilities([Capability::new(alice.did(), "store/put")?])
        .issue()
        .await?;

    let text_native = decode(root.to_string().as_bytes())?;
    let proof = text_native.link(&Sha256).await?;
    assert!(proof.digest().len() > 64);

    let leaf = Ucan::builder()
        .issuer(&bob)
        .audience(&alice)
        .capabilities(root.capabilities().to_vec())
        .proofs([proof.clone()])
        .issue()
        .await?;

    assert!(leaf.is_cbor());
    assert_eq!(decode(&encode(&leaf)?)?, leaf);
    assert_eq!(parse(&leaf.to_string())?, leaf);
    assert!(parse(&leaf.to_string())?.is_cbor());

    let block = leaf.write(&Sha256).await?;
    assert_eq!(block.cid(), &leaf.link(&Sha256).await?);
    assert_eq!(block.decode()?.proofs(), &[proof]);

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn fact(value: Value) -> Fact {
    value.as_object().cloned().unwrap_or_default()
}

fn base64_url_decode(segment: &str) -> anyhow::Result<Vec<u8>> {
    use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};
    Ok(BASE64_URL_SAFE_NO_PAD.decode(segment)?)
}
