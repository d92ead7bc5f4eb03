use core::fmt::Display;

use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsFFTField;

use crate::context::AirContext;
use crate::frame::Frame;
use crate::registers::StaticColumn;

/// Failure inside an AIR transition function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    DivisionByZero,
    OutOfRangeRead { index: usize, len: usize },
    Failed(&'static str),
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransitionError::DivisionByZero => write!(f, "division by zero"),
            TransitionError::OutOfRangeRead { index, len } => {
                write!(f, "read of index {index} in a table of length {len}")
            }
            TransitionError::Failed(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// An algebraic intermediate representation: a fixed-width state transition
/// program together with its transition constraints and static register
/// tables.
///
/// The prover drives [`AIR::advance`] to build the trace and evaluates
/// [`AIR::evaluate_transition`] over the extended domain; the verifier only
/// ever calls `evaluate_transition`, on opened trace rows. The two must
/// agree: `evaluate_transition` over `(row, advance(row))` is zero in every
/// coordinate.
pub trait AIR {
    type Field: IsFFTField;
    type PublicInputs;

    fn context(&self) -> &AirContext;

    fn pub_inputs(&self) -> &Self::PublicInputs;

    /// The first trace row.
    fn initial_state(&self) -> Vec<FieldElement<Self::Field>>;

    /// Computes the next trace row from the current one. `statics` holds the
    /// value of each static register at `step`.
    fn advance(
        &self,
        state: &[FieldElement<Self::Field>],
        statics: &[FieldElement<Self::Field>],
        step: usize,
    ) -> Result<Vec<FieldElement<Self::Field>>, TransitionError>;

    /// Evaluates the vector of transition constraint polynomials on a frame.
    /// `statics` holds the static register values at the frame's evaluation
    /// point.
    fn evaluate_transition(
        &self,
        frame: &Frame<Self::Field>,
        statics: &[FieldElement<Self::Field>],
    ) -> Vec<FieldElement<Self::Field>>;

    /// Static register tables, sampled by both sides at any domain point.
    fn static_columns(&self) -> Vec<StaticColumn<Self::Field>> {
        vec![]
    }

    fn step_count(&self) -> usize {
        self.context().trace_length
    }

    fn register_count(&self) -> usize {
        self.context().trace_columns
    }

    fn constraint_count(&self) -> usize {
        self.context().num_transition_constraints()
    }

    fn max_constraint_degree(&self) -> usize {
        self.context().max_constraint_degree()
    }

    fn transition_exemptions(&self) -> usize {
        self.context().transition_exemptions
    }
}
