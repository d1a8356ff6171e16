use crate::{KeyError, KeyResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Appends `value` to `buffer` as an unsigned LEB128 varint, the encoding multicodec uses for its
/// codes.
pub fn write_varint(buffer: &mut Vec<u8>, value: u64) {
    // Writing into a `Vec` cannot fail.
    let _ = leb128::write::unsigned(buffer, value);
}

/// Returns `value` encoded as an unsigned LEB128 varint.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(10);
    write_varint(&mut buffer, value);
    buffer
}

/// Reads an unsigned LEB128 varint from the front of `bytes`, advancing the slice past it.
pub fn read_varint(bytes: &mut &[u8]) -> KeyResult<u64> {
    leb128::read::unsigned(bytes).map_err(|e| KeyError::InvalidVarint(e.to_string()))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
