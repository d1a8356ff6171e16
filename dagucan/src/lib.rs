#![warn(missing_docs)]
#![allow(clippy::module_inception)]

//! `dagucan` implements [UCAN][ucan] authorization tokens with two interchangeable wire forms.
//!
//! A token is either _CBOR-native_, in which case its canonical form is a DAG-CBOR block addressed
//! by a hash of its bytes, or _text-native_, in which case it is a JWT whose exact text is retained
//! and addressed by an identity link under the raw codec.
//!
//! ```text
//!                 issue / decode / parse
//!                          │
//!                          ▼
//!    ┌────────────── Ucan { claims, s, origin } ──────────────┐
//!    │                     │                                  │
//!  encode                format                           link / write
//!  (DAG-CBOR or          (JWT text)                       (Link, Block)
//!   UTF-8 JWT)
//! ```
//!
//! [ucan]: https://github.com/ucan-wg/spec

mod builder;
mod capability;
pub mod cbor;
pub mod codec;
pub mod config;
mod default;
mod error;
mod hasher;
pub mod jwt;
mod link;
mod regex;
mod schema;
mod time;
mod ucan;
mod verify;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use builder::*;
pub use capability::*;
pub use codec::{decode, encode};
pub use config::UcanConfig;
pub use default::{DEFAULT_LIFETIME, VERSION};
pub use error::*;
pub use hasher::*;
pub use jwt::{format, parse};
pub use link::*;
pub use self::regex::*;
pub use time::*;
pub use ucan::*;
pub use verify::*;

pub use dagucan_did::{Did, DidError, IntoDid, Principal};
pub use dagucan_key::{Signature, SignatureAlgorithm, Signer, Verifier};
