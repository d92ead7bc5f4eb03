use sha2::{Digest, Sha256};

use lodestark_crypto::prng::prng;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::fields::fft_friendly::stark128_prime_field::Stark128PrimeField;

use crate::context::AirContext;
use crate::frame::Frame;
use crate::registers::StaticColumn;
use crate::traits::{TransitionError, AIR};

type F = Stark128PrimeField;
type FE = FieldElement<F>;

pub const ROUND_CONSTANT_COUNT: usize = 64;

/// The MiMC permutation trace: one register with `r0' = r0^3 + k_i`, where
/// the round constants cycle with period 64 through a static register.
#[derive(Clone, Debug)]
pub struct MimcAIR {
    context: AirContext,
    pub_inputs: MimcPublicInputs,
    round_constants: Vec<FE>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MimcPublicInputs {
    pub initial_value: FE,
}

impl MimcAIR {
    pub fn new(trace_length: usize, pub_inputs: MimcPublicInputs) -> Self {
        Self {
            context: AirContext {
                trace_length,
                trace_columns: 1,
                transition_degrees: vec![3],
                transition_exemptions: 1,
            },
            pub_inputs,
            round_constants: round_constants(),
        }
    }
}

impl AIR for MimcAIR {
    type Field = F;
    type PublicInputs = MimcPublicInputs;

    fn context(&self) -> &AirContext {
        &self.context
    }

    fn pub_inputs(&self) -> &Self::PublicInputs {
        &self.pub_inputs
    }

    fn initial_state(&self) -> Vec<FE> {
        vec![self.pub_inputs.initial_value.clone()]
    }

    fn advance(
        &self,
        state: &[FE],
        statics: &[FE],
        _step: usize,
    ) -> Result<Vec<FE>, TransitionError> {
        Ok(vec![state[0].pow(3) + &statics[0]])
    }

    fn evaluate_transition(&self, frame: &Frame<F>, statics: &[FE]) -> Vec<FE> {
        let current = frame.get_row(0);
        let next = frame.get_row(1);
        vec![&next[0] - (current[0].pow(3) + &statics[0])]
    }

    fn static_columns(&self) -> Vec<StaticColumn<F>> {
        vec![StaticColumn::Cyclic {
            pattern: self.round_constants.clone(),
        }]
    }
}

/// The 64 round constants, expanded in counter mode from `sha256("MiMC")`.
pub fn round_constants() -> Vec<FE> {
    let seed = Sha256::digest(b"MiMC");
    prng::<F, Sha256>(&seed, ROUND_CONSTANT_COUNT)
}

/// Runs the raw MiMC iteration for `steps` steps.
pub fn mimc_reference(initial_value: &FE, steps: usize) -> FE {
    let constants = round_constants();
    let mut value = initial_value.clone();
    for step in 0..steps {
        value = value.pow(3) + &constants[step % ROUND_CONSTANT_COUNT];
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::build_trace;

    #[test]
    fn round_constants_are_deterministic_and_distinct() {
        let a = round_constants();
        let b = round_constants();
        assert_eq!(a, b);
        assert_eq!(a.len(), ROUND_CONSTANT_COUNT);
        for i in 0..a.len() {
            for j in i + 1..a.len() {
                assert_ne!(a[i], a[j]);
            }
        }
    }

    #[test]
    fn the_trace_matches_the_reference_iteration() {
        let pub_inputs = MimcPublicInputs {
            initial_value: FE::from(3),
        };
        let air = MimcAIR::new(128, pub_inputs.clone());
        let static_base = air.static_columns()[0].base_column(128).unwrap();
        let trace = build_trace(&air, &[static_base]).unwrap();
        assert_eq!(
            trace.get(127, 0),
            &mimc_reference(&pub_inputs.initial_value, 127)
        );
    }
}
