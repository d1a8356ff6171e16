//! The DAG-CBOR form of a token.
//!
//! A token is a single map with the keys `v`, `iss`, `aud`, `att`, `exp`, `fct`, `prf`, `s` and the
//! optional `nbf` and `nnc`. DIDs and the signature are written in their binary forms, proofs are
//! tag 42 links and an unbounded expiration is `null`.

use std::collections::BTreeMap;

use dagucan_did::Did;
use dagucan_key::Signature;
use serde_cbor::Value as CborValue;

use crate::{
    schema, Capability, Claims, Expiration, Fact, Link, Origin, Ucan, UcanError, UcanResult,
    CBOR_LINK_TAG, RE_VERSION,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Encodes the claims and signature of a token as DAG-CBOR.
///
/// Map keys are written in canonical order, so equal tokens always encode to equal bytes.
pub fn encode(ucan: &Ucan) -> UcanResult<Vec<u8>> {
    let claims = &ucan.claims;
    let mut map = BTreeMap::new();
    let mut insert = |key: &str, value: CborValue| map.insert(CborValue::Text(key.to_string()), value);

    insert("v", CborValue::Text(claims.version.clone()));
    insert("iss", CborValue::Bytes(claims.issuer.to_bytes()));
    insert("aud", CborValue::Bytes(claims.audience.to_bytes()));
    insert(
        "att",
        CborValue::Array(
            claims
                .capabilities
                .iter()
                .map(|capability| CborValue::Map(schema::json_map_to_cbor(&capability.to_map())))
                .collect(),
        ),
    );
    insert(
        "exp",
        match claims.expiration {
            Expiration::Finite(expiration) => CborValue::Integer(expiration.into()),
            Expiration::Unbounded => CborValue::Null,
        },
    );
    insert(
        "fct",
        CborValue::Array(
            claims
                .facts
                .iter()
                .map(|fact| CborValue::Map(schema::json_map_to_cbor(fact)))
                .collect(),
        ),
    );
    insert(
        "prf",
        CborValue::Array(claims.proofs.iter().map(Link::to_cbor).collect()),
    );

    if let Some(not_before) = claims.not_before {
        insert("nbf", CborValue::Integer(not_before.into()));
    }

    if let Some(nonce) = &claims.nonce {
        insert("nnc", CborValue::Text(nonce.clone()));
    }

    insert("s", CborValue::Bytes(ucan.signature.to_bytes()));

    Ok(serde_cbor::to_vec(&CborValue::Map(map))?)
}

/// Decodes a CBOR-native token from DAG-CBOR.
pub fn decode(bytes: &[u8]) -> UcanResult<Ucan> {
    let map = match serde_cbor::from_slice(bytes)? {
        CborValue::Map(entries) => schema::text_keys(entries, "ucan")?,
        value => {
            return Err(UcanError::ExpectedObject {
                field: "ucan".to_string(),
                received: schema::describe_cbor(&value),
            })
        }
    };

    let claims = Claims {
        version: read_version(&map)?,
        issuer: read_did(&map, "iss")?,
        audience: read_did(&map, "aud")?,
        capabilities: read_capabilities(&map)?,
        expiration: read_integer(&map, "exp")?.into(),
        not_before: read_integer(&map, "nbf")?,
        nonce: read_nonce(&map)?,
        facts: read_facts(&map)?,
        proofs: read_proofs(&map)?,
    };

    let signature = read_signature(&map)?;

    tracing::trace!(issuer = %claims.issuer, "decoded ucan cbor");

    Ok(Ucan {
        claims,
        signature,
        origin: Origin::Cbor,
    })
}

fn describe(value: Option<&CborValue>) -> String {
    value.map_or_else(|| "undefined".to_string(), schema::describe_cbor)
}

fn read_version(map: &BTreeMap<String, CborValue>) -> UcanResult<String> {
    match map.get("v") {
        Some(CborValue::Text(version)) if RE_VERSION.is_match(version) => Ok(version.clone()),
        value => Err(UcanError::UnsupportedVersion {
            field: "v",
            received: describe(value),
        }),
    }
}

fn read_did(map: &BTreeMap<String, CborValue>, field: &'static str) -> UcanResult<Did> {
    match map.get(field) {
        Some(CborValue::Bytes(bytes)) => {
            Did::from_bytes(bytes).map_err(|source| UcanError::InvalidPrincipal { field, source })
        }
        value => Err(UcanError::expected_type(field, "bytes", describe(value))),
    }
}

fn read_capabilities(map: &BTreeMap<String, CborValue>) -> UcanResult<Vec<Capability>> {
    let Some(CborValue::Array(values)) = map.get("att") else {
        return Err(UcanError::ExpectedArray("att".to_string()));
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let field = format!("att[{index}]");
            match value {
                CborValue::Map(entries) => {
                    Capability::from_map(&schema::cbor_map_to_json(entries, &field)?)
                }
                value => Err(UcanError::ExpectedObject {
                    field,
                    received: schema::describe_cbor(value),
                }),
            }
        })
        .collect()
}

fn read_integer(map: &BTreeMap<String, CborValue>, field: &str) -> UcanResult<Option<i64>> {
    match map.get(field) {
        None | Some(CborValue::Null) => Ok(None),
        Some(CborValue::Integer(value)) if i64::try_from(*value).is_ok() => {
            Ok(i64::try_from(*value).ok())
        }
        value => Err(UcanError::expected_type(field, "integer", describe(value))),
    }
}

fn read_nonce(map: &BTreeMap<String, CborValue>) -> UcanResult<Option<String>> {
    match map.get("nnc") {
        None | Some(CborValue::Null) => Ok(None),
        Some(CborValue::Text(nonce)) => Ok(Some(nonce.clone())),
        value => Err(UcanError::invalid_value("nnc", describe(value))),
    }
}

fn read_facts(map: &BTreeMap<String, CborValue>) -> UcanResult<Vec<Fact>> {
    let values = match map.get("fct") {
        None | Some(CborValue::Null) => return Ok(Vec::new()),
        Some(CborValue::Array(values)) => values,
        Some(_) => return Err(UcanError::ExpectedArray("fct".to_string())),
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let field = format!("fct[{index}]");
            match value {
                CborValue::Map(entries) => schema::cbor_map_to_json(entries, &field),
                value => Err(UcanError::ExpectedObject {
                    field,
                    received: schema::describe_cbor(value),
                }),
            }
        })
        .collect()
}

fn read_proofs(map: &BTreeMap<String, CborValue>) -> UcanResult<Vec<Link>> {
    let values = match map.get("prf") {
        None | Some(CborValue::Null) => return Ok(Vec::new()),
        Some(CborValue::Array(values)) => values,
        Some(_) => return Err(UcanError::ExpectedArray("prf".to_string())),
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            CborValue::Tag(CBOR_LINK_TAG, _) => Link::from_cbor(value),
            value => Err(UcanError::expected_type(
                format!("prf[{index}]"),
                "IPLD link",
                schema::describe_cbor(value),
            )),
        })
        .collect()
}

fn read_signature(map: &BTreeMap<String, CborValue>) -> UcanResult<Signature> {
    let value = map.get("s");
    match value {
        Some(CborValue::Bytes(bytes)) => {
            Signature::from_bytes(bytes).map_err(|_| UcanError::InvalidSignature(describe(value)))
        }
        value => Err(UcanError::InvalidSignature(describe(value))),
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
