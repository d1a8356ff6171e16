use crate::{read_varint, write_varint, KeyError, KeyResult, SignatureAlgorithm, NON_STANDARD};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A signature tagged with the algorithm that produced it.
///
/// The binary form is `varint(code) ++ varint(len(raw)) ++ raw`. Signatures under the
/// [`NON_STANDARD`] code carry the UTF-8 algorithm name after the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    algorithm: SignatureAlgorithm,
    raw: Vec<u8>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Signature {
    /// Creates a signature envelope from an algorithm and raw signature bytes.
    pub fn new(algorithm: SignatureAlgorithm, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            raw: raw.into(),
        }
    }

    /// Returns the algorithm of the signature.
    pub fn algorithm(&self) -> &SignatureAlgorithm {
        &self.algorithm
    }

    /// Returns the multicodec code of the signature algorithm.
    pub fn code(&self) -> u64 {
        self.algorithm.code()
    }

    /// Returns the raw signature bytes.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Encodes the envelope into its binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.raw.len() + 8);
        write_varint(&mut bytes, self.algorithm.code());
        write_varint(&mut bytes, self.raw.len() as u64);
        bytes.extend_from_slice(&self.raw);

        if let SignatureAlgorithm::NonStandard(name) = &self.algorithm {
            bytes.extend_from_slice(name.as_bytes());
        }

        bytes
    }

    /// Decodes an envelope from its binary form.
    ///
    /// Codes missing from the registry are kept as [`SignatureAlgorithm::Unknown`].
    pub fn from_bytes(bytes: &[u8]) -> KeyResult<Self> {
        let mut cursor = bytes;
        let code = read_varint(&mut cursor)?;
        let size = usize::try_from(read_varint(&mut cursor)?)
            .map_err(|e| KeyError::InvalidSignatureEnvelope(e.to_string()))?;

        if cursor.len() < size {
            return Err(KeyError::InvalidSignatureEnvelope(format!(
                "expected {size} signature bytes, found {}",
                cursor.len()
            )));
        }

        let (raw, rest) = cursor.split_at(size);
        let algorithm = match code {
            NON_STANDARD => {
                let name = std::str::from_utf8(rest)
                    .map_err(|e| KeyError::InvalidSignatureEnvelope(e.to_string()))?;
                SignatureAlgorithm::NonStandard(name.to_string())
            }
            code => {
                if !rest.is_empty() {
                    return Err(KeyError::InvalidSignatureEnvelope(format!(
                        "{} unexpected trailing bytes",
                        rest.len()
                    )));
                }

                SignatureAlgorithm::from_code(code).unwrap_or(SignatureAlgorithm::Unknown(code))
            }
        };

        Ok(Self {
            algorithm,
            raw: raw.to_vec(),
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
