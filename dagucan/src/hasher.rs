use std::future::Future;

use sha2::{Digest, Sha256 as Sha256Digest};

use crate::UcanResult;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Multicodec code of the `sha2-256` multihash.
pub const SHA2_256: u64 = 0x12;

/// Multicodec code of the `identity` multihash.
pub const IDENTITY: u64 = 0x00;

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// A multihash function used to address token blocks.
pub trait Hasher {
    /// The multihash name, e.g. `sha2-256`.
    fn name(&self) -> &str;

    /// The multihash code.
    fn code(&self) -> u64;

    /// Hashes the bytes.
    fn digest(&self, bytes: &[u8]) -> impl Future<Output = UcanResult<Vec<u8>>>;
}

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The `sha2-256` hasher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256;

/// The `identity` hasher, whose digest is the input itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Hasher for Sha256 {
    fn name(&self) -> &str {
        "sha2-256"
    }

    fn code(&self) -> u64 {
        SHA2_256
    }

    async fn digest(&self, bytes: &[u8]) -> UcanResult<Vec<u8>> {
        Ok(Sha256Digest::digest(bytes).to_vec())
    }
}

impl Hasher for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn code(&self) -> u64 {
        IDENTITY
    }

    async fn digest(&self, bytes: &[u8]) -> UcanResult<Vec<u8>> {
        Ok(bytes.to_vec())
    }
}

impl<T> Hasher for &T
where
    T: Hasher,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn code(&self) -> u64 {
        (**self).code()
    }

    fn digest(&self, bytes: &[u8]) -> impl Future<Output = UcanResult<Vec<u8>>> {
        (**self).digest(bytes)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_sha256_digest() -> anyhow::Result<()> {
        let digest = Sha256.digest(b"hello").await?;
        assert_eq!(digest.len(), 32);
        assert_eq!(
            digest[..4],
            [0x2c, 0xf2, 0x4d, 0xba],
            "sha256(\"hello\") starts with 2cf24dba"
        );
        assert_eq!(Sha256.name(), "sha2-256");
        assert_eq!((&Sha256).code(), SHA2_256);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_identity_digest() -> anyhow::Result<()> {
        assert_eq!(Identity.digest(b"hello").await?, b"hello");
        assert_eq!(Identity.code(), IDENTITY);

        Ok(())
    }
}
