use crate::errors::ByteConversionError;

/// Conversion between elements and fixed-width byte strings.
///
/// Implementations emit a canonical encoding of constant length for a given
/// type, and reject byte strings of the wrong length or encoding values
/// outside the valid range.
pub trait ByteConversion: Sized {
    fn to_bytes_be(&self) -> Vec<u8>;

    fn to_bytes_le(&self) -> Vec<u8>;

    fn from_bytes_be(bytes: &[u8]) -> Result<Self, ByteConversionError>;

    fn from_bytes_le(bytes: &[u8]) -> Result<Self, ByteConversionError>;
}
