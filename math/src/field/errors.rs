use core::fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum FieldError {
    InvZeroError,
    RootOfUnityError(u64),
}

impl Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldError::InvZeroError => write!(f, "tried to invert the zero element"),
            FieldError::RootOfUnityError(order) => {
                write!(f, "no primitive root of unity of order 2^{order}")
            }
        }
    }
}

impl std::error::Error for FieldError {}
