use std::{convert::Infallible, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Multicodec code for `EdDSA` signatures.
pub const EDDSA: u64 = 0xd0ed;

/// Multicodec code for `ES256` signatures.
pub const ES256: u64 = 0xd01200;

/// Multicodec code for `ES256K` signatures.
pub const ES256K: u64 = 0xd0e7;

/// Multicodec code for `ES384` signatures.
pub const ES384: u64 = 0xd01201;

/// Multicodec code for `ES512` signatures.
pub const ES512: u64 = 0xd01202;

/// Multicodec code for `RS256` signatures.
pub const RS256: u64 = 0xd01205;

/// Multicodec code for `BLS12381G1` signatures.
pub const BLS12381G1: u64 = 0xd0ea;

/// Multicodec code for `BLS12381G2` signatures.
pub const BLS12381G2: u64 = 0xd0eb;

/// Multicodec code for `EIP191` signatures.
pub const EIP191: u64 = 0xd191;

/// Multicodec code shared by every signature algorithm that has no code of its own. The algorithm
/// name travels next to the raw signature bytes.
pub const NON_STANDARD: u64 = 0xd000;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A signature algorithm, identified both by its multicodec code and by its JWT `alg` name.
///
/// Algorithms outside the registry are never rejected. A name without a code becomes
/// [`SignatureAlgorithm::NonStandard`] and a code without a name becomes
/// [`SignatureAlgorithm::Unknown`]; both survive a round trip through either token format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// EdDSA using `ed25519`.
    EdDSA,

    /// ECDSA using `NIST P-256` and SHA-256.
    ES256,

    /// ECDSA using `secp256k1` and SHA-256.
    ES256K,

    /// ECDSA using `NIST P-384` and SHA-384.
    ES384,

    /// ECDSA using `NIST P-521` and SHA-512.
    ES512,

    /// RSASSA-PKCS1-v1_5 using SHA-256.
    RS256,

    /// BLS signatures on the G1 group of BLS12-381.
    BLS12381G1,

    /// BLS signatures on the G2 group of BLS12-381.
    BLS12381G2,

    /// Ethereum personal message signatures.
    EIP191,

    /// An algorithm known only by name, encoded under [`NON_STANDARD`].
    NonStandard(String),

    /// An algorithm known only by its code.
    Unknown(u64),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl SignatureAlgorithm {
    /// Returns the multicodec code of the algorithm.
    pub fn code(&self) -> u64 {
        match self {
            Self::EdDSA => EDDSA,
            Self::ES256 => ES256,
            Self::ES256K => ES256K,
            Self::ES384 => ES384,
            Self::ES512 => ES512,
            Self::RS256 => RS256,
            Self::BLS12381G1 => BLS12381G1,
            Self::BLS12381G2 => BLS12381G2,
            Self::EIP191 => EIP191,
            Self::NonStandard(_) => NON_STANDARD,
            Self::Unknown(code) => *code,
        }
    }

    /// Returns the JWT `alg` name of the algorithm.
    ///
    /// Unknown algorithms are named after their code, e.g. `0xd0ff`.
    pub fn name(&self) -> String {
        match self {
            Self::EdDSA => "EdDSA".into(),
            Self::ES256 => "ES256".into(),
            Self::ES256K => "ES256K".into(),
            Self::ES384 => "ES384".into(),
            Self::ES512 => "ES512".into(),
            Self::RS256 => "RS256".into(),
            Self::BLS12381G1 => "BLS12381G1".into(),
            Self::BLS12381G2 => "BLS12381G2".into(),
            Self::EIP191 => "EIP191".into(),
            Self::NonStandard(name) => name.clone(),
            Self::Unknown(code) => format!("0x{code:x}"),
        }
    }

    /// Looks up a registered algorithm by its code.
    ///
    /// Returns `None` for [`NON_STANDARD`] since that code alone does not name an algorithm.
    pub fn from_code(code: u64) -> Option<Self> {
        let algorithm = match code {
            EDDSA => Self::EdDSA,
            ES256 => Self::ES256,
            ES256K => Self::ES256K,
            ES384 => Self::ES384,
            ES512 => Self::ES512,
            RS256 => Self::RS256,
            BLS12381G1 => Self::BLS12381G1,
            BLS12381G2 => Self::BLS12381G2,
            EIP191 => Self::EIP191,
            _ => return None,
        };

        Some(algorithm)
    }

    /// Looks up an algorithm by its JWT `alg` name. This never fails.
    pub fn from_name(name: &str) -> Self {
        match name {
            "EdDSA" => Self::EdDSA,
            "ES256" => Self::ES256,
            "ES256K" => Self::ES256K,
            "ES384" => Self::ES384,
            "ES512" => Self::ES512,
            "RS256" => Self::RS256,
            "BLS12381G1" => Self::BLS12381G1,
            "BLS12381G2" => Self::BLS12381G2,
            "EIP191" => Self::EIP191,
            name => match parse_code_name(name) {
                Some(code) => Self::Unknown(code),
                None => Self::NonStandard(name.to_string()),
            },
        }
    }

    /// Returns `true` if the algorithm has its own entry in the registry.
    pub fn is_registered(&self) -> bool {
        !matches!(self, Self::NonStandard(_) | Self::Unknown(_))
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Reads names of the form `0x<hex>` produced for unknown codes. Only the exact canonical spelling
/// of an unregistered code is accepted so that the name survives being rewritten.
fn parse_code_name(name: &str) -> Option<u64> {
    let code = u64::from_str_radix(name.strip_prefix("0x")?, 16).ok()?;
    if code == NON_STANDARD
        || SignatureAlgorithm::from_code(code).is_some()
        || format!("0x{code:x}") != name
    {
        return None;
    }

    Some(code)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl Serialize for SignatureAlgorithm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for SignatureAlgorithm {
    fn deserialize<D>(deserializer: D) -> Result<SignatureAlgorithm, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
