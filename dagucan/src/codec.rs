//! The binary form of a token, as stored in blocks.
//!
//! CBOR-native tokens are DAG-CBOR maps. Text-native tokens are the UTF-8 bytes of their JWT,
//! addressed under the raw codec.

use crate::{cbor, jwt, Origin, Ucan, UcanError, UcanResult, DAG_CBOR, RAW};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the multicodec code of the binary form of a token.
pub fn code(ucan: &Ucan) -> u64 {
    match ucan.origin {
        Origin::Cbor => DAG_CBOR,
        Origin::Jwt(_) => RAW,
    }
}

/// Encodes a token into its binary form.
pub fn encode(ucan: &Ucan) -> UcanResult<Vec<u8>> {
    match &ucan.origin {
        Origin::Cbor => cbor::encode(ucan),
        Origin::Jwt(jwt) => Ok(jwt.as_bytes().to_vec()),
    }
}

/// Decodes a token from its binary form.
///
/// A DAG-CBOR map yields a CBOR-native token. UTF-8 bytes of a JWT yield a text-native token,
/// whether or not the JWT is canonically formatted. Anything else fails with
/// [`UcanError::UnsupportedEncoding`].
pub fn decode(bytes: &[u8]) -> UcanResult<Ucan> {
    match bytes.first() {
        // major type 5, a map
        Some(0xa0..=0xbf) => cbor::decode(bytes),
        Some(_) => {
            let text = std::str::from_utf8(bytes).map_err(|_| UcanError::UnsupportedEncoding)?;
            if text.split('.').count() != 3 {
                return Err(UcanError::UnsupportedEncoding);
            }

            let mut ucan = jwt::parse(text)?;
            ucan.origin = Origin::Jwt(text.to_string());
            Ok(ucan)
        }
        None => Err(UcanError::UnsupportedEncoding),
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
