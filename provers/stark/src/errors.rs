use core::fmt::Display;

use crate::traits::TransitionError;
use lodestark_math::fft::errors::FFTError;

/// Invalid proof parameters, rejected before any work is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    UnsupportedTraceLength(usize),
    InvalidExtensionFactor {
        extension_factor: usize,
        max_constraint_degree: usize,
    },
    DomainTooLarge {
        domain_size: usize,
        max: usize,
    },
    InvalidQueryCount {
        name: &'static str,
        got: usize,
        max: usize,
    },
    InvalidFoldingFactor(usize),
    InvalidRemainderThreshold {
        threshold: usize,
        folding_factor: usize,
        extension_factor: usize,
    },
    InvalidTransitionExemptions(usize),
    InvalidConstraintDegrees,
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigurationError::UnsupportedTraceLength(length) => {
                write!(f, "trace length {length} must be a power of two of at least 8")
            }
            ConfigurationError::InvalidExtensionFactor {
                extension_factor,
                max_constraint_degree,
            } => write!(
                f,
                "extension factor {extension_factor} must be a power of two in [max(4, 2 * {max_constraint_degree}), 32]"
            ),
            ConfigurationError::DomainTooLarge { domain_size, max } => {
                write!(f, "evaluation domain of size {domain_size} exceeds maximum {max}")
            }
            ConfigurationError::InvalidQueryCount { name, got, max } => {
                write!(f, "{name} query count {got} must be in [1, {max}]")
            }
            ConfigurationError::InvalidFoldingFactor(factor) => {
                write!(f, "FRI folding factor {factor} must be a power of two in [2, 8]")
            }
            ConfigurationError::InvalidRemainderThreshold {
                threshold,
                folding_factor,
                extension_factor,
            } => write!(
                f,
                "FRI remainder threshold {threshold} must be a power of two in [{folding_factor} * {extension_factor}, 256]"
            ),
            ConfigurationError::InvalidTransitionExemptions(exemptions) => {
                write!(f, "transition exemptions {exemptions} must leave at least one constrained step")
            }
            ConfigurationError::InvalidConstraintDegrees => {
                write!(f, "at least one transition constraint of degree >= 1 is required")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Inputs or assertions referencing registers, steps or shapes outside the
/// declared AIR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputShapeError {
    RegisterOutOfRange {
        register: usize,
        register_count: usize,
    },
    StepOutOfRange {
        step: usize,
        step_count: usize,
    },
    DuplicateAssertion {
        step: usize,
        register: usize,
    },
    NoAssertions,
    WrongStateWidth {
        got: usize,
        expected: usize,
    },
    WrongConstraintCount {
        got: usize,
        expected: usize,
    },
    InvalidStaticColumn {
        column: usize,
        reason: &'static str,
    },
}

impl Display for InputShapeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InputShapeError::RegisterOutOfRange {
                register,
                register_count,
            } => write!(f, "register {register} out of range for {register_count} registers"),
            InputShapeError::StepOutOfRange { step, step_count } => {
                write!(f, "step {step} out of range for {step_count} steps")
            }
            InputShapeError::DuplicateAssertion { step, register } => {
                write!(f, "duplicate assertion for step {step}, register {register}")
            }
            InputShapeError::NoAssertions => write!(f, "at least one assertion is required"),
            InputShapeError::WrongStateWidth { got, expected } => {
                write!(f, "state of width {got} does not match {expected} registers")
            }
            InputShapeError::WrongConstraintCount { got, expected } => {
                write!(f, "{got} constraint evaluations returned, {expected} declared")
            }
            InputShapeError::InvalidStaticColumn { column, reason } => {
                write!(f, "static column {column}: {reason}")
            }
        }
    }
}

impl std::error::Error for InputShapeError {}

/// Failure while generating a proof.
#[derive(Debug, PartialEq, Eq)]
pub enum ProvingError {
    Configuration(ConfigurationError),
    InputShape(InputShapeError),
    TraceExecution {
        step: usize,
        source: TransitionError,
    },
    ConstraintNotSatisfied {
        step: usize,
        constraint: usize,
    },
    UnsatisfiedAssertion {
        step: usize,
        register: usize,
    },
    ChallengeDerivationFailed,
    Fft(FFTError),
    Cancelled,
}

impl Display for ProvingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProvingError::Configuration(error) => write!(f, "{error}"),
            ProvingError::InputShape(error) => write!(f, "{error}"),
            ProvingError::TraceExecution { step, source } => {
                write!(f, "transition function failed at step {step}: {source}")
            }
            ProvingError::ConstraintNotSatisfied { step, constraint } => {
                write!(f, "transition constraint {constraint} does not hold at step {step}")
            }
            ProvingError::UnsatisfiedAssertion { step, register } => {
                write!(f, "trace does not satisfy the assertion at step {step}, register {register}")
            }
            ProvingError::ChallengeDerivationFailed => {
                write!(f, "exceeded the attempt cap while deriving query indices")
            }
            ProvingError::Fft(error) => write!(f, "{error}"),
            ProvingError::Cancelled => write!(f, "proof generation was cancelled"),
        }
    }
}

impl std::error::Error for ProvingError {}

impl From<ConfigurationError> for ProvingError {
    fn from(error: ConfigurationError) -> Self {
        ProvingError::Configuration(error)
    }
}

impl From<InputShapeError> for ProvingError {
    fn from(error: InputShapeError) -> Self {
        ProvingError::InputShape(error)
    }
}

impl From<FFTError> for ProvingError {
    fn from(error: FFTError) -> Self {
        ProvingError::Fft(error)
    }
}

/// Malformed proof bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    UnexpectedEndOfBuffer,
    InvalidFieldElement,
    LeafArrayTooLong(usize),
    NodeColumnTooLong(usize),
    RemainderTooLong(usize),
    TrailingBytes(usize),
}

impl Display for SerializationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SerializationError::UnexpectedEndOfBuffer => write!(f, "proof buffer ended early"),
            SerializationError::InvalidFieldElement => {
                write!(f, "byte string is not a canonical field element")
            }
            SerializationError::LeafArrayTooLong(len) => {
                write!(f, "opened leaf array of length {len} exceeds 256")
            }
            SerializationError::NodeColumnTooLong(len) => {
                write!(f, "merkle node column of length {len} exceeds 127")
            }
            SerializationError::RemainderTooLong(len) => {
                write!(f, "FRI remainder of length {len} exceeds 256")
            }
            SerializationError::TrailingBytes(count) => {
                write!(f, "{count} unread bytes after the proof")
            }
        }
    }
}

impl std::error::Error for SerializationError {}

/// Why a proof was rejected. The first failing check is reported; nothing
/// partial is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    Configuration(ConfigurationError),
    InputShape(InputShapeError),
    Serialization(SerializationError),
    ChallengeDerivationFailed,
    MerkleOpeningFailed {
        commitment: &'static str,
    },
    CompositionMismatch {
        index: usize,
    },
    FriLayerCountMismatch {
        got: usize,
        expected: usize,
    },
    FriLayerRootMismatch,
    FriFoldInconsistent {
        layer: usize,
        index: usize,
    },
    RemainderLengthMismatch {
        got: usize,
        expected: usize,
    },
    RemainderMismatch {
        index: usize,
    },
    RemainderDegreeExceeded,
    ZeroDenominator,
}

impl Display for VerificationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            VerificationError::Configuration(error) => write!(f, "{error}"),
            VerificationError::InputShape(error) => write!(f, "{error}"),
            VerificationError::Serialization(error) => write!(f, "{error}"),
            VerificationError::ChallengeDerivationFailed => {
                write!(f, "exceeded the attempt cap while deriving query indices")
            }
            VerificationError::MerkleOpeningFailed { commitment } => {
                write!(f, "merkle opening failed for the {commitment} commitment")
            }
            VerificationError::CompositionMismatch { index } => write!(
                f,
                "recomputed constraint composition disagrees with the opened value at index {index}"
            ),
            VerificationError::FriLayerCountMismatch { got, expected } => {
                write!(f, "proof carries {got} FRI layers, expected {expected}")
            }
            VerificationError::FriLayerRootMismatch => {
                write!(f, "first FRI layer root differs from the composition root")
            }
            VerificationError::FriFoldInconsistent { layer, index } => {
                write!(f, "FRI fold of layer {layer} is inconsistent at query index {index}")
            }
            VerificationError::RemainderLengthMismatch { got, expected } => {
                write!(f, "FRI remainder of length {got}, expected {expected}")
            }
            VerificationError::RemainderMismatch { index } => {
                write!(f, "FRI remainder disagrees with the composition opening at index {index}")
            }
            VerificationError::RemainderDegreeExceeded => {
                write!(f, "FRI remainder exceeds its degree bound")
            }
            VerificationError::ZeroDenominator => {
                write!(f, "unexpected zero denominator at a queried point")
            }
        }
    }
}

impl std::error::Error for VerificationError {}

impl From<ConfigurationError> for VerificationError {
    fn from(error: ConfigurationError) -> Self {
        VerificationError::Configuration(error)
    }
}

impl From<InputShapeError> for VerificationError {
    fn from(error: InputShapeError) -> Self {
        VerificationError::InputShape(error)
    }
}

impl From<SerializationError> for VerificationError {
    fn from(error: SerializationError) -> Self {
        VerificationError::Serialization(error)
    }
}
