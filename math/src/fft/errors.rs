use core::fmt::Display;

use crate::field::errors::FieldError;

#[derive(Debug, PartialEq, Eq)]
pub enum FFTError {
    RootOfUnityError(u64),
    InputError(usize),
}

impl Display for FFTError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FFTError::RootOfUnityError(order) => {
                write!(f, "domain of order 2^{order} exceeds the field's two-adicity")
            }
            FFTError::InputError(len) => {
                write!(f, "input length {len} is not a power of two")
            }
        }
    }
}

impl std::error::Error for FFTError {}

impl From<FieldError> for FFTError {
    fn from(error: FieldError) -> Self {
        match error {
            FieldError::RootOfUnityError(order) => FFTError::RootOfUnityError(order),
            FieldError::InvZeroError => FFTError::InputError(0),
        }
    }
}
