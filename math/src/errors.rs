use core::fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum ByteConversionError {
    InvalidLength { expected: usize, got: usize },
    ValueNotInField,
}

impl Display for ByteConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteConversionError::InvalidLength { expected, got } => {
                write!(f, "expected {expected} bytes, got {got}")
            }
            ByteConversionError::ValueNotInField => {
                write!(f, "byte string encodes a value outside the field")
            }
        }
    }
}

impl std::error::Error for ByteConversionError {}
