//! Decentralized identifiers for UCAN principals.
//!
//! `did:key` identifiers are decoded into their key algorithm and raw public key so they can act as
//! signature verifiers. Every other DID method is kept verbatim as an opaque identifier.
//!
//! Supported `did:key` key types:
//! - `ed25519-pub`
//! - `p256-pub` (compressed points only)
//! - `rsa-pub`

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod did;
mod error;
mod principal;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use did::*;
pub use error::*;
pub use principal::*;
