use std::{fmt::Display, str::FromStr};

use dagucan_did::Did;
use dagucan_key::{Signature, Verifier};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{
    cbor, codec, jwt, verify, Block, Capability, Hasher, Link, UcanBuilder, UcanError, UcanResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An arbitrary JSON object asserted by the issuer.
pub type Fact = Map<String, Value>;

/// When a token stops being valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiration {
    /// Expires at the given time in seconds since the Unix epoch.
    Finite(i64),

    /// Never expires.
    Unbounded,
}

/// The wire format a token was built for.
///
/// A CBOR-native token is signed over its canonical encoding and addressed by a hash of its
/// DAG-CBOR bytes. A text-native token keeps the JWT it was parsed from, byte for byte, because
/// its signature covers that exact text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Built by issuance or read from DAG-CBOR or from a canonically formatted JWT.
    Cbor,

    /// Read from a JWT that is kept verbatim.
    Jwt(String),
}

/// The claims of a token, everything but its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub(crate) version: String,
    pub(crate) issuer: Did,
    pub(crate) audience: Did,
    pub(crate) capabilities: Vec<Capability>,
    pub(crate) expiration: Expiration,
    pub(crate) not_before: Option<i64>,
    pub(crate) nonce: Option<String>,
    pub(crate) facts: Vec<Fact>,
    pub(crate) proofs: Vec<Link>,
}

/// A signed [UCAN][ucan].
///
/// Tokens are immutable. They come from [`UcanBuilder::issue`], [`decode`][crate::decode] or
/// [`parse`][crate::parse].
///
/// [ucan]: https://github.com/ucan-wg/spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ucan {
    pub(crate) claims: Claims,
    pub(crate) signature: Signature,
    pub(crate) origin: Origin,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Expiration {
    /// Returns the expiration time, or `None` if the token never expires.
    pub fn as_finite(&self) -> Option<i64> {
        match self {
            Self::Finite(time) => Some(*time),
            Self::Unbounded => None,
        }
    }

    /// Returns `true` if the token never expires.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

impl Claims {
    /// The UCAN version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The principal that issued the token.
    pub fn issuer(&self) -> &Did {
        &self.issuer
    }

    /// The principal the token is delegated to.
    pub fn audience(&self) -> &Did {
        &self.audience
    }

    /// The capabilities granted.
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// When the token stops being valid.
    pub fn expiration(&self) -> Expiration {
        self.expiration
    }

    /// The time before which the token is not valid.
    pub fn not_before(&self) -> Option<i64> {
        self.not_before
    }

    /// The nonce.
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// The facts asserted by the issuer.
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Links to the tokens that delegate the capabilities to the issuer.
    pub fn proofs(&self) -> &[Link] {
        &self.proofs
    }
}

impl Ucan {
    /// Starts building a token.
    pub fn builder() -> UcanBuilder {
        UcanBuilder::default()
    }

    /// The claims of the token.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// The UCAN version.
    pub fn version(&self) -> &str {
        self.claims.version()
    }

    /// The principal that issued the token.
    pub fn issuer(&self) -> &Did {
        self.claims.issuer()
    }

    /// The principal the token is delegated to.
    pub fn audience(&self) -> &Did {
        self.claims.audience()
    }

    /// The capabilities granted.
    pub fn capabilities(&self) -> &[Capability] {
        self.claims.capabilities()
    }

    /// When the token stops being valid.
    pub fn expiration(&self) -> Expiration {
        self.claims.expiration()
    }

    /// The time before which the token is not valid.
    pub fn not_before(&self) -> Option<i64> {
        self.claims.not_before()
    }

    /// The nonce.
    pub fn nonce(&self) -> Option<&str> {
        self.claims.nonce()
    }

    /// The facts asserted by the issuer.
    pub fn facts(&self) -> &[Fact] {
        self.claims.facts()
    }

    /// Links to the tokens that delegate the capabilities to the issuer.
    pub fn proofs(&self) -> &[Link] {
        self.claims.proofs()
    }

    /// The signature of the issuer.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The wire format the token was built for.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Returns `true` if the token is CBOR-native.
    pub fn is_cbor(&self) -> bool {
        matches!(self.origin, Origin::Cbor)
    }

    /// The JWT a text-native token was parsed from.
    pub fn jwt(&self) -> Option<&str> {
        match &self.origin {
            Origin::Jwt(jwt) => Some(jwt),
            Origin::Cbor => None,
        }
    }

    /// The multicodec code of the binary form of the token.
    pub fn code(&self) -> u64 {
        codec::code(self)
    }

    /// Encodes the token, see [`encode`][crate::encode].
    pub fn encode(&self) -> UcanResult<Vec<u8>> {
        codec::encode(self)
    }

    /// Encodes the claims of the token as DAG-CBOR whatever its origin.
    pub fn to_cbor(&self) -> UcanResult<Vec<u8>> {
        cbor::encode(self)
    }

    /// Formats the token as a JWT, see [`format`][crate::format].
    pub fn format(&self) -> String {
        jwt::format(self)
    }

    /// Derives the link that addresses the token.
    pub async fn link(&self, hasher: &impl Hasher) -> UcanResult<Link> {
        crate::link(self, hasher).await
    }

    /// Encodes the token and derives the link that addresses it.
    pub async fn write(&self, hasher: &impl Hasher) -> UcanResult<Block> {
        crate::write(self, hasher).await
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        verify::is_expired(self)
    }

    /// Returns `true` if the token is not valid yet.
    pub fn is_too_early(&self) -> bool {
        verify::is_too_early(self)
    }

    /// Checks the signature of the token, see [`verify_signature`][crate::verify_signature].
    pub async fn verify_signature(&self, verifier: &impl Verifier) -> bool {
        verify::verify_signature(self, verifier).await
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<i64> for Expiration {
    fn from(time: i64) -> Self {
        Self::Finite(time)
    }
}

impl From<Option<i64>> for Expiration {
    fn from(time: Option<i64>) -> Self {
        time.map_or(Self::Unbounded, Self::Finite)
    }
}

impl Display for Expiration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(time) => write!(f, "{time}"),
            Self::Unbounded => write!(f, "Infinity"),
        }
    }
}

impl Display for Ucan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

impl FromStr for Ucan {
    type Err = UcanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        jwt::parse(s)
    }
}

impl Serialize for Ucan {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ucan {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ucan = String::deserialize(deserializer)?;
        jwt::parse(&ucan).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
