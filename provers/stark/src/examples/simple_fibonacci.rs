use lodestark_math::field::element::FieldElement;
use lodestark_math::field::fields::fft_friendly::two_adic_32_prime_field::TwoAdic32PrimeField;

use crate::context::AirContext;
use crate::frame::Frame;
use crate::traits::{TransitionError, AIR};

type F = TwoAdic32PrimeField;
type FE = FieldElement<F>;

/// Two-register Fibonacci walk: `r0' = r0 + r1`, `r1' = r1 + r0'`, so the
/// pair advances two Fibonacci numbers per step.
#[derive(Clone, Debug)]
pub struct FibonacciAIR {
    context: AirContext,
    pub_inputs: FibonacciPublicInputs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FibonacciPublicInputs {
    pub a0: FE,
    pub a1: FE,
}

impl FibonacciAIR {
    pub fn new(trace_length: usize, pub_inputs: FibonacciPublicInputs) -> Self {
        Self {
            context: AirContext {
                trace_length,
                trace_columns: 2,
                transition_degrees: vec![1, 1],
                transition_exemptions: 1,
            },
            pub_inputs,
        }
    }
}

impl AIR for FibonacciAIR {
    type Field = F;
    type PublicInputs = FibonacciPublicInputs;

    fn context(&self) -> &AirContext {
        &self.context
    }

    fn pub_inputs(&self) -> &Self::PublicInputs {
        &self.pub_inputs
    }

    fn initial_state(&self) -> Vec<FE> {
        vec![self.pub_inputs.a0, self.pub_inputs.a1]
    }

    fn advance(
        &self,
        state: &[FE],
        _statics: &[FE],
        _step: usize,
    ) -> Result<Vec<FE>, TransitionError> {
        let next_0 = state[0] + state[1];
        let next_1 = state[1] + next_0;
        Ok(vec![next_0, next_1])
    }

    fn evaluate_transition(&self, frame: &Frame<F>, _statics: &[FE]) -> Vec<FE> {
        let current = frame.get_row(0);
        let next = frame.get_row(1);
        vec![
            next[0] - current[0] - current[1],
            next[1] - current[1] - next[0],
        ]
    }
}

/// The register values after running the recurrence for `steps` steps.
pub fn fibonacci_reference(pub_inputs: &FibonacciPublicInputs, steps: usize) -> (FE, FE) {
    let mut r0 = pub_inputs.a0;
    let mut r1 = pub_inputs.a1;
    for _ in 0..steps {
        let next_0 = r0 + r1;
        let next_1 = r1 + next_0;
        r0 = next_0;
        r1 = next_1;
    }
    (r0, r1)
}
