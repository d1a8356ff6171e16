use std::{fmt::Display, str::FromStr};

use bytes::Bytes;
use dagucan_key::{read_varint, write_varint};
use multibase::Base;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_cbor::Value as CborValue;

use crate::{cbor, Hasher, Origin, Ucan, UcanError, UcanResult, IDENTITY};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The CID version of every [`Link`].
pub const CID_V1: u64 = 0x01;

/// Multicodec code of DAG-CBOR encoded tokens.
pub const DAG_CBOR: u64 = 0x71;

/// Multicodec code of raw bytes, used for JWT encoded tokens.
pub const RAW: u64 = 0x55;

/// CBOR tag of IPLD links.
pub const CBOR_LINK_TAG: u64 = 42;

/// The multibase prefix a tagged CBOR link carries ahead of its binary form.
const CBOR_LINK_PREFIX: u8 = 0x00;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A version 1 [content identifier][cid].
///
/// Digests may be of any size, so a whole JWT can be linked under the identity multihash.
///
/// [cid]: https://github.com/multiformats/cid
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    codec: u64,
    hash: u64,
    digest: Vec<u8>,
}

/// An encoded token together with the link that addresses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    cid: Link,
    bytes: Bytes,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Link {
    /// Creates a link from a content codec, a multihash code and a digest.
    pub fn new(codec: u64, hash: u64, digest: impl Into<Vec<u8>>) -> Self {
        Self {
            codec,
            hash,
            digest: digest.into(),
        }
    }

    /// Creates a link that embeds the bytes themselves under the identity multihash.
    pub fn identity(codec: u64, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(codec, IDENTITY, bytes)
    }

    /// Creates the link of a JWT, which is the JWT itself as raw bytes.
    pub fn inline(jwt: &str) -> Self {
        Self::identity(RAW, jwt.as_bytes())
    }

    /// Returns the content codec.
    pub fn codec(&self) -> u64 {
        self.codec
    }

    /// Returns the multihash code.
    pub fn hash_code(&self) -> u64 {
        self.hash
    }

    /// Returns the digest.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Returns the JWT embedded in a raw identity link.
    pub fn inline_jwt(&self) -> Option<&str> {
        if self.codec != RAW || self.hash != IDENTITY {
            return None;
        }

        std::str::from_utf8(&self.digest)
            .ok()
            .filter(|text| text.split('.').count() == 3)
    }

    /// Encodes the link into its binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.digest.len() + 8);
        write_varint(&mut bytes, CID_V1);
        write_varint(&mut bytes, self.codec);
        write_varint(&mut bytes, self.hash);
        write_varint(&mut bytes, self.digest.len() as u64);
        bytes.extend_from_slice(&self.digest);
        bytes
    }

    /// Decodes a link from its binary form.
    pub fn from_bytes(bytes: &[u8]) -> UcanResult<Self> {
        let mut cursor = bytes;
        let mut next =
            || read_varint(&mut cursor).map_err(|e| UcanError::InvalidLink(e.to_string()));

        let version = next()?;
        if version != CID_V1 {
            return Err(UcanError::InvalidLink(format!(
                "unsupported CID version {version}"
            )));
        }

        let codec = next()?;
        let hash = next()?;
        let size = next()?;

        if cursor.len() as u64 != size {
            return Err(UcanError::InvalidLink(format!(
                "expected a {size} byte digest, instead got {} bytes",
                cursor.len()
            )));
        }

        Ok(Self::new(codec, hash, cursor))
    }

    /// Writes the link as a tag 42 CBOR value holding `0x00 ++ binary form`.
    pub fn to_cbor(&self) -> CborValue {
        let mut bytes = vec![CBOR_LINK_PREFIX];
        bytes.extend(self.to_bytes());
        CborValue::Tag(CBOR_LINK_TAG, Box::new(CborValue::Bytes(bytes)))
    }

    /// Reads a link from a tag 42 CBOR value.
    pub fn from_cbor(value: &CborValue) -> UcanResult<Self> {
        let CborValue::Tag(CBOR_LINK_TAG, inner) = value else {
            return Err(UcanError::InvalidLink("expected CBOR tag 42".to_string()));
        };

        match inner.as_ref() {
            CborValue::Bytes(bytes) => match bytes.split_first() {
                Some((&CBOR_LINK_PREFIX, link)) => Self::from_bytes(link),
                _ => Err(UcanError::InvalidLink(
                    "expected a 0x00 prefix on tagged link bytes".to_string(),
                )),
            },
            _ => Err(UcanError::InvalidLink(
                "expected CBOR tag 42 to hold bytes".to_string(),
            )),
        }
    }

    /// Reads a proof as written in a JWT, either an inline JWT or the text form of a link.
    pub(crate) fn from_proof(proof: &str) -> Option<Self> {
        if proof.split('.').count() == 3 {
            return Some(Self::inline(proof));
        }

        proof.parse().ok()
    }

    /// Writes a proof the way a JWT carries it.
    pub(crate) fn to_proof(&self) -> String {
        match self.inline_jwt() {
            Some(jwt) => jwt.to_string(),
            None => self.to_string(),
        }
    }
}

impl Block {
    /// The link addressing the bytes.
    pub fn cid(&self) -> &Link {
        &self.cid
    }

    /// The encoded token.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Decodes the token held by the block.
    pub fn decode(&self) -> UcanResult<Ucan> {
        crate::decode(&self.bytes)
    }

    /// Splits the block into its link and bytes.
    pub fn into_parts(self) -> (Link, Bytes) {
        (self.cid, self.bytes)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Encodes a token and derives the link that addresses it.
///
/// CBOR-native tokens are encoded as DAG-CBOR and hashed with `hasher`. Text-native tokens are
/// their JWT bytes, addressed by a raw identity link that no hasher takes part in.
pub async fn write(ucan: &Ucan, hasher: &impl Hasher) -> UcanResult<Block> {
    let block = match ucan.origin() {
        Origin::Jwt(jwt) => Block {
            cid: Link::inline(jwt),
            bytes: Bytes::copy_from_slice(jwt.as_bytes()),
        },
        Origin::Cbor => {
            let bytes = cbor::encode(ucan)?;
            let digest = hasher.digest(&bytes).await?;
            Block {
                cid: Link::new(DAG_CBOR, hasher.code(), digest),
                bytes: Bytes::from(bytes),
            }
        }
    };

    tracing::trace!(cid = %block.cid, hasher = hasher.name(), "wrote ucan block");
    Ok(block)
}

/// Derives the link that addresses a token.
pub async fn link(ucan: &Ucan, hasher: &impl Hasher) -> UcanResult<Link> {
    Ok(write(ucan, hasher).await?.cid)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", multibase::encode(Base::Base32Lower, self.to_bytes()))
    }
}

impl FromStr for Link {
    type Err = UcanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, bytes) = multibase::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for Link {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let link = String::deserialize(deserializer)?;
        link.parse().map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
