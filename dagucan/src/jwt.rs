//! The JWT form of a token: `base64url(header).base64url(body).base64url(signature)`.
//!
//! The header is `{"alg", "typ": "JWT", "ucv"}` and the body carries the claims under their short
//! names. Both are written as compact JSON with keys in lexicographic order, which is the
//! canonical formatting of a CBOR-native token and also the payload its issuer signs.

use base64::prelude::{Engine, BASE64_URL_SAFE_NO_PAD};
use dagucan_did::Did;
use dagucan_key::{Signature, SignatureAlgorithm};
use serde_json::{Map, Value};

use crate::{
    schema, Capability, Claims, Expiration, Link, Origin, Ucan, UcanError, UcanResult, RE_VERSION,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The only token type accepted in the `typ` header.
pub const TOKEN_TYPE: &str = "JWT";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Formats a token as a JWT.
///
/// Text-native tokens return the exact JWT they were parsed from.
pub fn format(ucan: &Ucan) -> String {
    match &ucan.origin {
        Origin::Jwt(jwt) => jwt.clone(),
        Origin::Cbor => format_token(&ucan.claims, &ucan.signature),
    }
}

/// Parses a JWT into a token.
///
/// The token is CBOR-native when formatting the parsed claims reproduces the input exactly, and
/// text-native otherwise.
pub fn parse(jwt: &str) -> UcanResult<Ucan> {
    let segments = jwt.split('.').collect::<Vec<_>>();
    let [header, body, signature] = segments.as_slice() else {
        return Err(UcanError::InvalidJwtFormat);
    };

    let header = decode_object(header, "header")?;
    let body = decode_object(body, "body")?;
    let raw = BASE64_URL_SAFE_NO_PAD.decode(signature)?;

    let (version, algorithm) = read_header(&header)?;
    let claims = read_body(&body, version)?;
    let signature = Signature::new(algorithm, raw);

    let origin = if format_token(&claims, &signature) == jwt {
        Origin::Cbor
    } else {
        Origin::Jwt(jwt.to_string())
    };

    tracing::debug!(
        issuer = %claims.issuer,
        cbor = matches!(origin, Origin::Cbor),
        "parsed ucan jwt"
    );

    Ok(Ucan {
        claims,
        signature,
        origin,
    })
}

/// Returns the bytes the issuer signs, the `header.body` part of the JWT.
pub fn signing_payload(ucan: &Ucan) -> Vec<u8> {
    match &ucan.origin {
        Origin::Jwt(jwt) => jwt
            .rsplit_once('.')
            .map_or(jwt.as_str(), |(payload, _)| payload)
            .as_bytes()
            .to_vec(),
        Origin::Cbor => format_payload(&ucan.claims, ucan.signature.algorithm()).into_bytes(),
    }
}

/// Formats the canonical `header.body` of claims signed with `algorithm`.
pub(crate) fn format_payload(claims: &Claims, algorithm: &SignatureAlgorithm) -> String {
    let header = serde_json::json!({
        "alg": algorithm.name(),
        "typ": TOKEN_TYPE,
        "ucv": claims.version,
    });

    format!(
        "{}.{}",
        BASE64_URL_SAFE_NO_PAD.encode(header.to_string()),
        BASE64_URL_SAFE_NO_PAD.encode(format_body(claims).to_string())
    )
}

fn format_token(claims: &Claims, signature: &Signature) -> String {
    format!(
        "{}.{}",
        format_payload(claims, signature.algorithm()),
        BASE64_URL_SAFE_NO_PAD.encode(signature.raw())
    )
}

fn format_body(claims: &Claims) -> Value {
    let mut body = Map::new();
    body.insert(
        "att".into(),
        claims.capabilities.iter().cloned().map(Value::from).collect(),
    );
    body.insert("aud".into(), Value::String(claims.audience.to_string()));

    if let Expiration::Finite(expiration) = claims.expiration {
        body.insert("exp".into(), Value::from(expiration));
    }

    body.insert(
        "fct".into(),
        claims.facts.iter().cloned().map(Value::Object).collect(),
    );
    body.insert("iss".into(), Value::String(claims.issuer.to_string()));

    if let Some(not_before) = claims.not_before {
        body.insert("nbf".into(), Value::from(not_before));
    }

    if let Some(nonce) = &claims.nonce {
        body.insert("nnc".into(), Value::from(nonce.as_str()));
    }

    body.insert(
        "prf".into(),
        claims.proofs.iter().map(|proof| Value::String(proof.to_proof())).collect(),
    );

    Value::Object(body)
}

fn decode_object(segment: &str, field: &str) -> UcanResult<Map<String, Value>> {
    let bytes = BASE64_URL_SAFE_NO_PAD.decode(segment)?;
    let value: Value = serde_json::from_slice(&bytes)?;
    match value {
        Value::Object(map) => Ok(map),
        value => Err(UcanError::ExpectedObject {
            field: field.to_string(),
            received: value.to_string(),
        }),
    }
}

fn read_header(header: &Map<String, Value>) -> UcanResult<(String, SignatureAlgorithm)> {
    match header.get("typ") {
        Some(Value::String(typ)) if typ == TOKEN_TYPE => {}
        value => return Err(UcanError::UnsupportedTokenType(schema::describe(value))),
    }

    let version = match header.get("ucv") {
        Some(Value::String(version)) if RE_VERSION.is_match(version) => version.clone(),
        value => {
            return Err(UcanError::UnsupportedVersion {
                field: "ucv",
                received: schema::describe(value),
            })
        }
    };

    let algorithm = match header.get("alg") {
        Some(Value::String(alg)) => SignatureAlgorithm::from_name(alg),
        value => {
            return Err(UcanError::expected_type(
                "alg",
                "string",
                schema::describe(value),
            ))
        }
    };

    Ok((version, algorithm))
}

fn read_body(body: &Map<String, Value>, version: String) -> UcanResult<Claims> {
    Ok(Claims {
        version,
        issuer: read_did(body, "iss")?,
        audience: read_did(body, "aud")?,
        capabilities: read_capabilities(body)?,
        expiration: read_integer(body, "exp")?.into(),
        not_before: read_integer(body, "nbf")?,
        nonce: read_nonce(body)?,
        facts: read_facts(body)?,
        proofs: read_proofs(body)?,
    })
}

fn read_did(body: &Map<String, Value>, field: &'static str) -> UcanResult<Did> {
    match body.get(field) {
        Some(Value::String(did)) => {
            Did::parse(did).map_err(|source| UcanError::InvalidPrincipal { field, source })
        }
        value => Err(UcanError::expected_type(
            field,
            "string",
            schema::describe(value),
        )),
    }
}

fn read_capabilities(body: &Map<String, Value>) -> UcanResult<Vec<Capability>> {
    let Some(Value::Array(values)) = body.get("att") else {
        return Err(UcanError::ExpectedArray("att".to_string()));
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(map) => Capability::from_map(map),
            value => Err(UcanError::ExpectedObject {
                field: format!("att[{index}]"),
                received: value.to_string(),
            }),
        })
        .collect()
}

fn read_integer(body: &Map<String, Value>, field: &str) -> UcanResult<Option<i64>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) if number.is_i64() => Ok(number.as_i64()),
        value => Err(UcanError::expected_type(
            field,
            "integer",
            schema::describe(value),
        )),
    }
}

fn read_nonce(body: &Map<String, Value>) -> UcanResult<Option<String>> {
    match body.get("nnc") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(nonce)) => Ok(Some(nonce.clone())),
        value => Err(UcanError::invalid_value("nnc", schema::describe(value))),
    }
}

fn read_facts(body: &Map<String, Value>) -> UcanResult<Vec<Map<String, Value>>> {
    let values = match body.get("fct") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(values)) => values,
        Some(_) => return Err(UcanError::ExpectedArray("fct".to_string())),
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(fact) => Ok(fact.clone()),
            value => Err(UcanError::ExpectedObject {
                field: format!("fct[{index}]"),
                received: value.to_string(),
            }),
        })
        .collect()
}

fn read_proofs(body: &Map<String, Value>) -> UcanResult<Vec<Link>> {
    let values = match body.get("prf") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(values)) => values,
        Some(_) => return Err(UcanError::ExpectedArray("prf".to_string())),
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .as_str()
                .and_then(Link::from_proof)
                .ok_or_else(|| UcanError::invalid_value(format!("prf[{index}]"), value.to_string()))
        })
        .collect()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use dagucan_did::Principal;
    use dagucan_key::{Ed25519KeyPair, KeyPairGenerate, Signer, NON_STANDARD};
    use serde_json::json;

    use super::*;

    /// Signs an arbitrary header and body, the way a third party would hand-build a JWT.
    async fn sign_jwt(
        signer: &Ed25519KeyPair,
        header: Value,
        body: Value,
    ) -> anyhow::Result<String> {
        let payload = format!(
            "{}.{}",
            BASE64_URL_SAFE_NO_PAD.encode(header.to_string()),
            BASE64_URL_SAFE_NO_PAD.encode(body.to_string())
        );
        let signature = signer.sign(payload.as_bytes()).await?;
        Ok(format!("{payload}.{}", BASE64_URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Builds a JWT from the default claims of `alice`, overriding fields of the header and body.
    async fn sign_jwt_with(
        alice: &Ed25519KeyPair,
        header: Value,
        body: Value,
    ) -> anyhow::Result<String> {
        let mut default_header = json!({ "alg": "EdDSA", "typ": "JWT", "ucv": "0.9.1" });
        let mut default_body = json!({
            "iss": alice.did(),
            "aud": alice.did(),
            "exp": 1_900_000_000,
            "att": [{ "with": "mailto:*", "can": "send/message" }],
            "prf": [],
        });

        merge(&mut default_header, header);
        merge(&mut default_body, body);
        sign_jwt(alice, default_header, default_body).await
    }

    fn merge(target: &mut Value, overrides: Value) {
        if let (Value::Object(target), Value::Object(overrides)) = (target, overrides) {
            target.extend(overrides);
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_parse_rejects_wrong_segment_count() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        let jwt = sign_jwt_with(&alice, json!({}), json!({})).await?;

        let (_, tail) = jwt.split_once('.').unwrap_or_default();
        let error = parse(tail).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Expected JWT format: 3 dot-separated base64url-encoded values."
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_parse_field_errors() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

        let cases = [
            (json!({ "typ": "IPLD" }), json!({}), r#"Expected typ to be a "JWT" instead got "IPLD""#),
            (json!({ "ucv": "9.0" }), json!({}), r#"Invalid version 'ucv: "9.0"'"#),
            (json!({}), json!({ "nnc": 5 }), "nnc has invalid value 5"),
            (json!({}), json!({ "nbf": "tomorrow" }), r#"Expected nbf to be integer, instead got "tomorrow""#),
            (json!({}), json!({ "exp": 8.7 }), "Expected exp to be integer, instead got 8.7"),
            (
                json!({}),
                json!({ "att": { "with": "mailto:*", "can": "send/message" } }),
                "att must be an array",
            ),
            (json!({}), json!({ "fct": [1] }), "fct[0] must be of type object, instead got 1"),
            (json!({}), json!({ "prf": [1] }), "prf[0] has invalid value 1"),
            (json!({}), json!({ "prf": {} }), "prf must be an array"),
        ];

        for (header, body, expected) in cases {
            let jwt = sign_jwt_with(&alice, header, body).await?;
            let error = parse(&jwt).unwrap_err();
            tracing::debug!(%error);
            assert_eq!(error.to_string(), expected);
        }

        let jwt = sign_jwt_with(&alice, json!({}), json!({ "aud": "bob", "fct": [1] })).await?;
        let error = parse(&jwt).unwrap_err();
        assert!(error
            .to_string()
            .contains(r#"Invalid DID "bob", must start with 'did:'"#));

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_parse_keeps_non_standard_algorithm() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        let jwt = sign_jwt_with(&alice, json!({ "alg": "whatever" }), json!({})).await?;

        let ucan = parse(&jwt)?;
        assert_eq!(
            ucan.signature().algorithm(),
            &SignatureAlgorithm::NonStandard("whatever".into())
        );
        assert_eq!(ucan.signature().code(), NON_STANDARD);
        assert!(jwt.ends_with(&format!(
            ".{}",
            BASE64_URL_SAFE_NO_PAD.encode(ucan.signature().raw())
        )));
        assert_eq!(ucan.issuer().to_string(), alice.did());
        assert_eq!(format(&ucan), jwt);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_parse_hand_built_jwt_is_text_native() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        let header = json!({ "alg": "EdDSA", "typ": "JWT", "ucv": "0.8.1" });
        let body = json!({
            "iss": alice.did(),
            "aud": alice.did(),
            "exp": 1_650_500_849,
            "att": [{ "with": "mailto:boris@fission.codes", "can": "msg/send" }],
        });

        // serde_json writes the keys sorted, so swap two of them to leave canonical form
        let jwt = sign_jwt(&alice, header, body).await?;
        let (header, rest) = jwt.split_once('.').unwrap_or_default();
        let header = String::from_utf8(BASE64_URL_SAFE_NO_PAD.decode(header)?)?;
        let reordered = header.replace(r#""alg":"EdDSA","typ":"JWT""#, r#""typ":"JWT","alg":"EdDSA""#);
        let (body, _) = rest.split_once('.').unwrap_or_default();
        let payload = format!("{}.{body}", BASE64_URL_SAFE_NO_PAD.encode(reordered));
        let signature = alice.sign(payload.as_bytes()).await?;
        let jwt = format!("{payload}.{}", BASE64_URL_SAFE_NO_PAD.encode(signature));

        let ucan = parse(&jwt)?;
        tracing::debug!(?ucan);
        assert_eq!(ucan.jwt(), Some(jwt.as_str()));
        assert_eq!(ucan.version(), "0.8.1");
        assert_eq!(ucan.expiration(), Expiration::Finite(1_650_500_849));
        assert!(ucan.facts().is_empty());
        assert!(ucan.proofs().is_empty());
        assert_eq!(format(&ucan), jwt);
        assert_eq!(signing_payload(&ucan), payload.as_bytes());

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_parse_canonical_jwt_is_cbor_native() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        let jwt = sign_jwt_with(&alice, json!({}), json!({ "fct": [] })).await?;

        let ucan = parse(&jwt)?;
        assert!(ucan.is_cbor());
        assert_eq!(format(&ucan), jwt);

        let issued = Ucan::builder()
            .issuer(&alice)
            .audience(&alice)
            .expiration(ucan.expiration())
            .capabilities(ucan.capabilities().to_vec())
            .issue()
            .await?;
        assert_eq!(issued.signature(), ucan.signature());
        assert_eq!(issued, ucan);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_inline_proofs() -> anyhow::Result<()> {
        let alice = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        let bob = Ed25519KeyPair::generate(&mut rand::thread_rng())?;

        let root = sign_jwt_with(&alice, json!({}), json!({ "aud": bob.did() })).await?;
        let leaf = sign_jwt(
            &bob,
            json!({ "alg": "EdDSA", "typ": "JWT", "ucv": "0.8.1" }),
            json!({
                "iss": bob.did(),
                "aud": alice.did(),
                "att": [{ "with": "mailto:*", "can": "send/message" }],
                "prf": [root],
            }),
        )
        .await?;

        let ucan = parse(&leaf)?;
        assert_eq!(ucan.expiration(), Expiration::Unbounded);

        let [proof] = ucan.proofs() else {
            anyhow::bail!("expected one proof");
        };
        assert_eq!(proof.codec(), crate::RAW);
        assert_eq!(proof.hash_code(), crate::IDENTITY);
        assert_eq!(proof.digest(), root.as_bytes());
        assert_eq!(format(&ucan), leaf);

        Ok(())
    }
}
