use std::{fmt::Display, str::FromStr};

use dagucan_key::{
    encode_varint, read_varint, write_varint, GetKeyAlgorithm, KeyAlgorithm, PublicKey,
    PublicKeyBytes,
};
use multibase::Base;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{DidError, DidResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The prefix every DID starts with.
pub const DID_PREFIX: &str = "did:";

/// The prefix of [`did:key`][ref] identifiers.
///
/// [ref]: https://w3c-ccg.github.io/did-method-key/
pub const DID_KEY_PREFIX: &str = "did:key:";

/// Multicodec code that tags the binary form of DIDs which are not `did:key`s. The tag is followed
/// by the UTF-8 text of the DID without its `did:` prefix.
pub const DID_CORE: u64 = 0x0d1d;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A [decentralized identifier][ref].
///
/// [`did:key`][did-key] identifiers are decoded into their key algorithm and raw public key bytes.
/// Any other method is kept as it was given.
///
/// The binary form is the multicodec encoded public key for `did:key`s and
/// `varint(DID_CORE) ++ utf8(text after "did:")` for everything else.
///
/// [ref]: https://www.w3.org/TR/did-core/
/// [did-key]: https://w3c-ccg.github.io/did-method-key/
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Did {
    /// A `did:key` backed by a public key.
    Key {
        /// The algorithm of the public key.
        algorithm: KeyAlgorithm,

        /// The raw public key bytes.
        key: Vec<u8>,
    },

    /// A DID of any other method, carrying no key material.
    Opaque(String),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Did {
    /// Parses a DID from its text form.
    pub fn parse(did: &str) -> DidResult<Self> {
        if !did.starts_with(DID_PREFIX) {
            return Err(DidError::InvalidDid(did.to_string()));
        }

        if let Some(encoded) = did.strip_prefix(DID_KEY_PREFIX) {
            let (base, bytes) = multibase::decode(encoded)?;
            if base != Base::Base58Btc {
                return Err(DidError::UnsupportedBase(base.code()));
            }

            return Self::from_multicodec(&bytes);
        }

        Ok(Self::Opaque(did.to_string()))
    }

    /// Creates a `did:key` from a public key.
    pub fn from_key<K>(key: &K) -> Self
    where
        K: PublicKeyBytes + GetKeyAlgorithm,
    {
        Self::Key {
            algorithm: key.key_algorithm(),
            key: key.public_key_bytes(),
        }
    }

    /// Decodes a DID from its binary form.
    pub fn from_bytes(bytes: &[u8]) -> DidResult<Self> {
        let mut cursor = bytes;
        if read_varint(&mut cursor)? == DID_CORE {
            let text = std::str::from_utf8(cursor)?;
            return Self::parse(&format!("{DID_PREFIX}{text}"));
        }

        Self::from_multicodec(bytes)
    }

    /// Encodes the DID into its binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Key { algorithm, key } => {
                let mut bytes = encode_varint(algorithm.code());
                bytes.extend_from_slice(key);
                bytes
            }
            Self::Opaque(did) => {
                let mut bytes = encode_varint(DID_CORE);
                bytes.extend_from_slice(did.strip_prefix(DID_PREFIX).unwrap_or(did).as_bytes());
                bytes
            }
        }
    }

    /// Returns the DID method, e.g. `key` or `dns`.
    pub fn method(&self) -> &str {
        match self {
            Self::Key { .. } => "key",
            Self::Opaque(did) => did
                .strip_prefix(DID_PREFIX)
                .and_then(|rest| rest.split(':').next())
                .unwrap_or_default(),
        }
    }

    /// Returns the key algorithm of a `did:key`.
    pub fn key_algorithm(&self) -> Option<KeyAlgorithm> {
        match self {
            Self::Key { algorithm, .. } => Some(*algorithm),
            Self::Opaque(_) => None,
        }
    }

    /// Returns the raw public key bytes of a `did:key`.
    pub fn key_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Key { key, .. } => Some(key),
            Self::Opaque(_) => None,
        }
    }

    /// Returns `true` if this is a `did:key`.
    pub fn is_key(&self) -> bool {
        matches!(self, Self::Key { .. })
    }

    /// Decodes the public key of a `did:key` so it can verify signatures.
    ///
    /// Opaque DIDs have no key material and fail with [`DidError::NotAKeyDid`].
    pub fn verifier(&self) -> DidResult<PublicKey> {
        match self {
            Self::Key { algorithm, key } => Ok(PublicKey::from_raw(*algorithm, key)?),
            Self::Opaque(did) => Err(DidError::NotAKeyDid(did.clone())),
        }
    }

    /// Decodes a multicodec tagged public key.
    fn from_multicodec(bytes: &[u8]) -> DidResult<Self> {
        let mut cursor = bytes;
        let code = read_varint(&mut cursor)?;
        let algorithm =
            KeyAlgorithm::from_code(code).ok_or(DidError::UnsupportedKeyEncoding(code))?;

        check_key_shape(algorithm, cursor)?;

        Ok(Self::Key {
            algorithm,
            key: cursor.to_vec(),
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn check_key_shape(algorithm: KeyAlgorithm, key: &[u8]) -> DidResult<()> {
    let invalid = |reason: String| DidError::InvalidKey { algorithm, reason };

    match algorithm {
        KeyAlgorithm::Ed25519 if key.len() != 32 => {
            Err(invalid(format!("expected 32 bytes, instead got {}", key.len())))
        }
        KeyAlgorithm::P256 => match key {
            [0x04, ..] if key.len() == 65 => {
                tracing::debug!("rejecting uncompressed p256 did:key");
                Err(DidError::UncompressedP256Key)
            }
            [0x02 | 0x03, ..] if key.len() == 33 => Ok(()),
            _ => Err(invalid(format!(
                "expected a 33 byte compressed point, instead got {} bytes",
                key.len()
            ))),
        },
        KeyAlgorithm::Rsa if key.is_empty() => Err(invalid("expected PKCS#1 DER bytes".into())),
        _ => Ok(()),
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key { algorithm, key } => {
                let mut bytes = Vec::with_capacity(key.len() + 3);
                write_varint(&mut bytes, algorithm.code());
                bytes.extend_from_slice(key);
                write!(
                    f,
                    "{DID_KEY_PREFIX}{}",
                    multibase::encode(Base::Base58Btc, bytes)
                )
            }
            Self::Opaque(did) => write!(f, "{did}"),
        }
    }
}

impl FromStr for Did {
    type Err = DidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Did {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D>(deserializer: D) -> Result<Did, D::Error>
    where
        D: Deserializer<'de>,
    {
        let did = String::deserialize(deserializer)?;
        Did::parse(&did).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
