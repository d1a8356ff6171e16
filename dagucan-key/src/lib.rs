//! Key material, signature algorithms and the signature envelope used by UCAN tokens.
//!
//! The crate provides:
//! - [`SignatureAlgorithm`], a bidirectional registry between multicodec signature codes and their
//!   JWT `alg` names.
//! - [`Signature`], the tagged `{algorithm, raw bytes}` envelope together with its varint encoding.
//! - [`Signer`] and [`Verifier`], the asynchronous collaborator traits a token issuer or verifier
//!   implements.
//! - Ready-made `ed25519`, `NIST P-256` and `RSA` keys implementing those traits.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod algorithm;
mod ed25519;
mod error;
mod key;
mod kind;
mod p256;
mod public;
mod rsa;
mod signature;
mod traits;
mod varint;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use algorithm::*;
pub use ed25519::*;
pub use error::*;
pub use key::*;
pub use kind::*;
pub use public::*;
pub use signature::*;
pub use traits::*;
pub use varint::*;

pub use self::p256::*;
pub use self::rsa::*;
