use std::fmt::Display;

use crate::SignatureAlgorithm;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Multicodec code for `ed25519` public keys.
pub const ED25519_PUB: u64 = 0xed;

/// Multicodec code for `NIST P-256` public keys.
pub const P256_PUB: u64 = 0x1200;

/// Multicodec code for `RSA` public keys.
pub const RSA_PUB: u64 = 0x1205;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The public key algorithms that can back a `did:key`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyAlgorithm {
    /// An `ed25519` key.
    Ed25519,

    /// A `NIST P-256` key in compressed SEC1 form.
    P256,

    /// An `RSA` key in PKCS#1 DER form.
    Rsa,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl KeyAlgorithm {
    /// Returns the multicodec code of the public key type.
    pub fn code(&self) -> u64 {
        match self {
            Self::Ed25519 => ED25519_PUB,
            Self::P256 => P256_PUB,
            Self::Rsa => RSA_PUB,
        }
    }

    /// Looks up a key algorithm by its multicodec code.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            ED25519_PUB => Some(Self::Ed25519),
            P256_PUB => Some(Self::P256),
            RSA_PUB => Some(Self::Rsa),
            _ => None,
        }
    }

    /// Returns the multicodec name of the public key type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519-pub",
            Self::P256 => "p256-pub",
            Self::Rsa => "rsa-pub",
        }
    }

    /// Returns the signature algorithm keys of this type sign with.
    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        match self {
            Self::Ed25519 => SignatureAlgorithm::EdDSA,
            Self::P256 => SignatureAlgorithm::ES256,
            Self::Rsa => SignatureAlgorithm::RS256,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
