//! Conversions between the JSON and CBOR data models used by the two token formats, and the
//! rendering of received values in error messages.

use std::collections::BTreeMap;

use base64::prelude::{Engine, BASE64_STANDARD_NO_PAD};
use serde_cbor::Value as CborValue;
use serde_json::{json, Map, Number, Value};

use crate::{Link, UcanError, UcanResult, CBOR_LINK_TAG};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Renders a JSON value the way it is written in a token, or `undefined` when it is absent.
pub(crate) fn describe(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "undefined".to_string(),
    }
}

/// Renders a CBOR value in its DAG-JSON form.
pub(crate) fn describe_cbor(value: &CborValue) -> String {
    cbor_to_dag_json(value).to_string()
}

/// Converts a CBOR value into a JSON value.
///
/// Bytes, links and maps with non-text keys have no JSON counterpart and fail with
/// [`UcanError::InvalidValue`] naming `field`.
pub(crate) fn cbor_to_json(value: &CborValue, field: &str) -> UcanResult<Value> {
    let invalid = || UcanError::invalid_value(field, describe_cbor(value));

    let value = match value {
        CborValue::Null => Value::Null,
        CborValue::Bool(value) => Value::Bool(*value),
        CborValue::Integer(value) => integer_to_json(*value).ok_or_else(invalid)?,
        CborValue::Float(value) => Number::from_f64(*value)
            .map(Value::Number)
            .ok_or_else(invalid)?,
        CborValue::Text(value) => Value::String(value.clone()),
        CborValue::Array(values) => Value::Array(
            values
                .iter()
                .map(|value| cbor_to_json(value, field))
                .collect::<UcanResult<_>>()?,
        ),
        CborValue::Map(entries) => Value::Object(cbor_map_to_json(entries, field)?),
        _ => return Err(invalid()),
    };

    Ok(value)
}

/// Converts the entries of a CBOR map into a JSON object.
pub(crate) fn cbor_map_to_json(
    entries: &BTreeMap<CborValue, CborValue>,
    field: &str,
) -> UcanResult<Map<String, Value>> {
    entries
        .iter()
        .map(|(key, value)| match key {
            CborValue::Text(key) => Ok((key.clone(), cbor_to_json(value, field)?)),
            key => Err(UcanError::invalid_value(field, describe_cbor(key))),
        })
        .collect()
}

/// Splits a CBOR map into its text keyed entries.
pub(crate) fn text_keys(
    entries: BTreeMap<CborValue, CborValue>,
    field: &str,
) -> UcanResult<BTreeMap<String, CborValue>> {
    entries
        .into_iter()
        .map(|(key, value)| match key {
            CborValue::Text(key) => Ok((key, value)),
            key => Err(UcanError::invalid_value(field, describe_cbor(&key))),
        })
        .collect()
}

/// Converts a JSON value into a CBOR value.
pub(crate) fn json_to_cbor(value: &Value) -> CborValue {
    match value {
        Value::Null => CborValue::Null,
        Value::Bool(value) => CborValue::Bool(*value),
        Value::Number(number) => {
            if let Some(value) = number.as_i64() {
                CborValue::Integer(value.into())
            } else if let Some(value) = number.as_u64() {
                CborValue::Integer(value.into())
            } else {
                CborValue::Float(number.as_f64().unwrap_or_default())
            }
        }
        Value::String(value) => CborValue::Text(value.clone()),
        Value::Array(values) => CborValue::Array(values.iter().map(json_to_cbor).collect()),
        Value::Object(map) => CborValue::Map(json_map_to_cbor(map)),
    }
}

/// Converts a JSON object into the entries of a CBOR map.
pub(crate) fn json_map_to_cbor(map: &Map<String, Value>) -> BTreeMap<CborValue, CborValue> {
    map.iter()
        .map(|(key, value)| (CborValue::Text(key.clone()), json_to_cbor(value)))
        .collect()
}

fn integer_to_json(value: i128) -> Option<Value> {
    i64::try_from(value)
        .map(Value::from)
        .or_else(|_| u64::try_from(value).map(Value::from))
        .ok()
}

fn cbor_to_dag_json(value: &CborValue) -> Value {
    match value {
        CborValue::Null => Value::Null,
        CborValue::Bool(value) => Value::Bool(*value),
        CborValue::Integer(value) => {
            integer_to_json(*value).unwrap_or_else(|| Value::String(value.to_string()))
        }
        CborValue::Float(value) => Number::from_f64(*value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        CborValue::Text(value) => Value::String(value.clone()),
        CborValue::Bytes(bytes) => {
            json!({ "/": { "bytes": BASE64_STANDARD_NO_PAD.encode(bytes) } })
        }
        CborValue::Array(values) => Value::Array(values.iter().map(cbor_to_dag_json).collect()),
        CborValue::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| {
                    let key = match key {
                        CborValue::Text(key) => key.clone(),
                        key => describe_cbor(key),
                    };
                    (key, cbor_to_dag_json(value))
                })
                .collect(),
        ),
        CborValue::Tag(CBOR_LINK_TAG, inner) => match Link::from_cbor(value) {
            Ok(link) => json!({ "/": link.to_string() }),
            Err(_) => cbor_to_dag_json(inner),
        },
        CborValue::Tag(_, inner) => cbor_to_dag_json(inner),
        _ => Value::Null,
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_renders_json() -> anyhow::Result<()> {
        assert_eq!(describe(Some(&json!("tomorrow"))), r#""tomorrow""#);
        assert_eq!(describe(Some(&json!(8.7))), "8.7");
        assert_eq!(describe(Some(&json!(5))), "5");
        assert_eq!(describe(None), "undefined");

        assert_eq!(describe_cbor(&CborValue::Float(8.7)), "8.7");
        assert_eq!(
            describe_cbor(&CborValue::Text("hello world".into())),
            r#""hello world""#
        );
        assert_eq!(
            describe_cbor(&CborValue::Bytes(vec![1, 2, 3])),
            r#"{"/":{"bytes":"AQID"}}"#
        );

        let cid = "bafkreihgufl2d3wwp4kjo75na265sywwi3yqcx2xpk3rif4tlo62nscg4m";
        let link: Link = cid.parse()?;
        assert_eq!(describe_cbor(&link.to_cbor()), format!(r#"{{"/":"{cid}"}}"#));

        Ok(())
    }

    #[test_log::test]
    fn test_json_cbor_conversion() -> anyhow::Result<()> {
        let value = json!({
            "int": -3,
            "big": u64::MAX,
            "float": 1.5,
            "list": [null, true, "x"],
            "map": { "nested": {} },
        });

        let cbor = json_to_cbor(&value);
        tracing::debug!(?cbor);
        assert_eq!(cbor_to_json(&cbor, "fct[0]")?, value);

        Ok(())
    }

    #[test]
    fn test_cbor_bytes_are_not_json() {
        let value = CborValue::Array(vec![CborValue::Bytes(vec![0xff])]);
        let error = cbor_to_json(&value, "att[0]").unwrap_err();
        assert_eq!(
            error.to_string(),
            r#"att[0] has invalid value {"/":{"bytes":"/w"}}"#
        );
    }

    #[test]
    fn test_cbor_non_text_keys_are_not_json() {
        let entries = BTreeMap::from([(CborValue::Integer(1), CborValue::Bool(true))]);
        let error = cbor_map_to_json(&entries, "fct[0]").unwrap_err();
        assert_eq!(error.to_string(), "fct[0] has invalid value 1");

        let entries = BTreeMap::from([(CborValue::Bytes(vec![1]), CborValue::Null)]);
        assert!(text_keys(entries, "ucan").is_err());
    }
}
