use lodestark_math::field::element::FieldElement;

use crate::errors::ProvingError;
use crate::frame::Frame;
use crate::trace::TraceTable;
use crate::traits::AIR;

/// Checks that every transition constraint vanishes on every non-exempt base
/// step. A failure means the AIR's `advance` and `evaluate_transition` are
/// out of sync, or the transition exemptions are declared too tight; either
/// way the proof would be unsound garbage, so the prover refuses to build it.
pub fn validate_trace<A: AIR>(
    air: &A,
    trace: &TraceTable<A::Field>,
    static_columns: &[Vec<FieldElement<A::Field>>],
) -> Result<(), ProvingError> {
    let steps = air.step_count();
    let exemptions = air.transition_exemptions();

    for step in 0..steps - exemptions {
        let frame = Frame::from_rows(trace.get_row(step), trace.get_row(step + 1));
        let statics: Vec<FieldElement<A::Field>> = static_columns
            .iter()
            .map(|column| column[step].clone())
            .collect();
        let evaluations = air.evaluate_transition(&frame, &statics);
        for (constraint, value) in evaluations.iter().enumerate() {
            if !value.is_zero() {
                return Err(ProvingError::ConstraintNotSatisfied { step, constraint });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples::simple_fibonacci::{FibonacciAIR, FibonacciPublicInputs};
    use crate::trace::build_trace;
    use lodestark_math::field::fields::fft_friendly::two_adic_32_prime_field::TwoAdic32FieldElement as FE;

    #[test]
    fn an_honest_trace_validates() {
        let air = FibonacciAIR::new(
            32,
            FibonacciPublicInputs {
                a0: FE::one(),
                a1: FE::one(),
            },
        );
        let trace = build_trace(&air, &[]).unwrap();
        assert!(validate_trace(&air, &trace, &[]).is_ok());
    }

    #[test]
    fn a_corrupted_trace_is_reported_with_its_step() {
        let air = FibonacciAIR::new(
            32,
            FibonacciPublicInputs {
                a0: FE::one(),
                a1: FE::one(),
            },
        );
        let trace = build_trace(&air, &[]).unwrap();
        let mut columns = trace.columns().to_vec();
        let bumped = &columns[0][17] + FE::one();
        columns[0][17] = bumped;
        let corrupted = TraceTable::from_columns(columns);
        // Both the transition into step 17 and out of it break; the first
        // failing step is reported.
        assert_eq!(
            validate_trace(&air, &corrupted, &[]),
            Err(ProvingError::ConstraintNotSatisfied {
                step: 16,
                constraint: 0
            })
        );
    }
}
