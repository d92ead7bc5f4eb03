use lodestark_crypto::fiat_shamir::default_transcript::DefaultTranscript;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsPrimeField;
use lodestark_math::traits::ByteConversion;
use sha2::Digest;

use crate::constraints::boundary::Assertion;
use crate::constraints::evaluator::DegreeSchedule;
use crate::proof::options::ProofOptions;
use crate::traits::AIR;

const DOMAIN_SEPARATOR: &[u8] = b"lodestark-v1";

pub type StarkTranscript<F, D> = DefaultTranscript<F, D>;

/// Serialized byte size of one field element: the canonical encoding width,
/// rounded up to a multiple of 8 bytes.
pub fn element_byte_size<F: IsPrimeField>() -> usize {
    F::field_bit_size().div_ceil(8).div_ceil(8) * 8
}

/// Builds the transcript seed binding every public parameter of the proof:
/// the protocol tag, the field, the AIR shape, the proof options, the
/// composition degree bound, the static register descriptors and the
/// assertions. Prover and verifier must derive bit-identical seeds.
pub fn transcript_seed<A>(
    air: &A,
    assertions: &[Assertion<A::Field>],
    options: &ProofOptions,
    schedule: &DegreeSchedule,
) -> Vec<u8>
where
    A: AIR,
    FieldElement<A::Field>: ByteConversion,
{
    let context = air.context();
    let mut seed = Vec::new();
    seed.extend_from_slice(DOMAIN_SEPARATOR);
    let scalars = [
        A::Field::field_bit_size() as u64,
        context.trace_length as u64,
        context.trace_columns as u64,
        context.num_transition_constraints() as u64,
        context.transition_exemptions as u64,
        options.extension_factor as u64,
        options.exe_query_count as u64,
        options.fri_query_count as u64,
        options.fri_folding_factor as u64,
        options.fri_remainder_threshold as u64,
        schedule.composition_degree as u64,
    ];
    for scalar in scalars {
        seed.extend_from_slice(&scalar.to_be_bytes());
    }
    for degree in &context.transition_degrees {
        seed.extend_from_slice(&(*degree as u64).to_be_bytes());
    }

    let static_columns = air.static_columns();
    seed.extend_from_slice(&(static_columns.len() as u64).to_be_bytes());
    for column in &static_columns {
        seed.push(column.tag());
        let values = column.declared_values();
        seed.extend_from_slice(&(values.len() as u64).to_be_bytes());
        for value in values {
            seed.extend_from_slice(&value.to_bytes_be());
        }
    }

    seed.extend_from_slice(&(assertions.len() as u64).to_be_bytes());
    for assertion in assertions {
        seed.extend_from_slice(&(assertion.step as u64).to_be_bytes());
        seed.extend_from_slice(&(assertion.register as u64).to_be_bytes());
        seed.extend_from_slice(&assertion.value.to_bytes_be());
    }

    seed
}

pub fn new_transcript<A, D>(
    air: &A,
    assertions: &[Assertion<A::Field>],
    options: &ProofOptions,
    schedule: &DegreeSchedule,
) -> StarkTranscript<A::Field, D>
where
    A: AIR,
    D: Digest,
    FieldElement<A::Field>: ByteConversion,
{
    StarkTranscript::new(&transcript_seed(air, assertions, options, schedule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples::simple_fibonacci::{FibonacciAIR, FibonacciPublicInputs};
    use lodestark_math::field::fields::fft_friendly::stark128_prime_field::Stark128PrimeField;
    use lodestark_math::field::fields::fft_friendly::two_adic_32_prime_field::{
        TwoAdic32FieldElement as FE, TwoAdic32PrimeField,
    };

    #[test]
    fn element_byte_sizes_round_up_to_eight() {
        assert_eq!(element_byte_size::<TwoAdic32PrimeField>(), 8);
        assert_eq!(element_byte_size::<Stark128PrimeField>(), 16);
    }

    #[test]
    fn seed_depends_on_the_assertions() {
        let air = FibonacciAIR::new(
            16,
            FibonacciPublicInputs {
                a0: FE::one(),
                a1: FE::one(),
            },
        );
        let options = ProofOptions::default_for_testing();
        let groups_a = [Assertion::new(0, 0, FE::one())];
        let groups_b = [Assertion::new(0, 0, FE::from(2))];
        let schedule = DegreeSchedule {
            composition_degree: 32,
            transition_lifts: vec![31, 31],
            boundary_lifts: vec![30],
        };
        let seed_a = transcript_seed(&air, &groups_a, &options, &schedule);
        let seed_b = transcript_seed(&air, &groups_b, &options, &schedule);
        assert_ne!(seed_a, seed_b);
    }
}
