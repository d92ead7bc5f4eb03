use lodestark_math::field::element::FieldElement;
use lodestark_math::field::fields::fft_friendly::stark128_prime_field::Stark128PrimeField;
use lodestark_math::field::fields::fft_friendly::two_adic_32_prime_field::TwoAdic32PrimeField;

use lodestark_prover::context::AirContext;
use lodestark_prover::errors::{ConfigurationError, ProvingError, VerificationError};
use lodestark_prover::examples::mimc::{mimc_reference, MimcAIR, MimcPublicInputs};
use lodestark_prover::examples::simple_fibonacci::{
    fibonacci_reference, FibonacciAIR, FibonacciPublicInputs,
};
use lodestark_prover::frame::Frame;
use lodestark_prover::proof::serialization::{deserialize_proof, proof_size, serialize_proof};
use lodestark_prover::registers::StaticColumn;
use lodestark_prover::traits::{TransitionError, AIR};
use lodestark_prover::{
    prove, prove_with_cancellation, verify, Assertion, CancellationToken, HashAlgorithm,
    ProofOptions, StarkProof,
};

type FibFE = FieldElement<TwoAdic32PrimeField>;
type MimcFE = FieldElement<Stark128PrimeField>;

fn fibonacci_setup(
    trace_length: usize,
) -> (FibonacciAIR, Vec<Assertion<TwoAdic32PrimeField>>) {
    let pub_inputs = FibonacciPublicInputs {
        a0: FibFE::one(),
        a1: FibFE::one(),
    };
    let (_, last_r1) = fibonacci_reference(&pub_inputs, trace_length - 1);
    let air = FibonacciAIR::new(trace_length, pub_inputs);
    let assertions = vec![
        Assertion::new(0, 0, FibFE::one()),
        Assertion::new(0, 1, FibFE::one()),
        Assertion::new(trace_length - 1, 1, last_r1),
    ];
    (air, assertions)
}

fn mimc_setup(trace_length: usize) -> (MimcAIR, Vec<Assertion<Stark128PrimeField>>) {
    let pub_inputs = MimcPublicInputs {
        initial_value: MimcFE::from(3),
    };
    let final_value = mimc_reference(&pub_inputs.initial_value, trace_length - 1);
    let air = MimcAIR::new(trace_length, pub_inputs);
    let assertions = vec![
        Assertion::new(0, 0, MimcFE::from(3)),
        Assertion::new(trace_length - 1, 0, final_value),
    ];
    (air, assertions)
}

#[test]
fn fibonacci_8192_steps_proves_and_verifies() {
    let (air, assertions) = fibonacci_setup(8192);
    // The published value of the second register after 8191 steps.
    assert_eq!(assertions[2].value, FibFE::from(203257732));

    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();
    verify(&air, &assertions, &proof, &options).unwrap();
}

#[test]
fn mimc_8192_steps_proves_and_verifies() {
    let (air, assertions) = mimc_setup(8192);
    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();
    verify(&air, &assertions, &proof, &options).unwrap();
}

#[test]
fn serialization_round_trips_and_sizes_match() {
    let (air, assertions) = fibonacci_setup(512);
    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();

    let bytes = serialize_proof(&proof).unwrap();
    assert_eq!(proof_size(&proof), bytes.len());

    let parsed: StarkProof<TwoAdic32PrimeField> =
        deserialize_proof(&bytes, air.register_count()).unwrap();
    assert_eq!(parsed, proof);
    assert_eq!(serialize_proof(&parsed).unwrap(), bytes);

    verify(&air, &assertions, &parsed, &options).unwrap();
}

#[test]
fn proving_is_deterministic() {
    let (air, assertions) = fibonacci_setup(256);
    let options = ProofOptions::default_for_testing();
    let first = serialize_proof(&prove(&air, &assertions, &options).unwrap()).unwrap();
    let second = serialize_proof(&prove(&air, &assertions, &options).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn blake2s_proofs_verify_and_differ_from_sha256_proofs() {
    let (air, assertions) = fibonacci_setup(256);
    let sha_options = ProofOptions::default_for_testing();
    let blake_options = ProofOptions {
        hash_algorithm: HashAlgorithm::Blake2s256,
        ..ProofOptions::default_for_testing()
    };

    let sha_proof = prove(&air, &assertions, &sha_options).unwrap();
    let blake_proof = prove(&air, &assertions, &blake_options).unwrap();
    verify(&air, &assertions, &blake_proof, &blake_options).unwrap();

    assert_ne!(sha_proof.trace_root, blake_proof.trace_root);
    // A proof made under one hash never verifies under the other.
    assert!(verify(&air, &assertions, &blake_proof, &sha_options).is_err());
}

#[test]
fn small_domains_skip_folding_entirely() {
    // 32 steps at extension 4 is a 128-point domain, below the remainder
    // threshold: the composition ships verbatim and there are no layers.
    let (air, assertions) = fibonacci_setup(32);
    let options = ProofOptions {
        extension_factor: 4,
        ..ProofOptions::default_for_testing()
    };
    let proof = prove(&air, &assertions, &options).unwrap();
    assert!(proof.fri_layers.is_empty());
    assert_eq!(proof.remainder.len(), 128);
    verify(&air, &assertions, &proof, &options).unwrap();

    // Tampering with the verbatim remainder must be caught.
    let mut tampered = proof.clone();
    let bumped = &tampered.remainder[1] + FibFE::one();
    tampered.remainder[1] = bumped;
    assert!(verify(&air, &assertions, &tampered, &options).is_err());
}

#[test]
fn wrong_assertions_are_rejected() {
    let (air, assertions) = fibonacci_setup(512);
    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();

    let mut wrong = assertions.clone();
    let bumped = &wrong[2].value + FibFE::one();
    wrong[2].value = bumped;
    assert!(verify(&air, &wrong, &proof, &options).is_err());
}

#[test]
fn tampered_trace_opening_is_rejected_as_merkle_failure() {
    let (air, assertions) = mimc_setup(512);
    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();

    let mut tampered = proof.clone();
    let bumped = &tampered.trace_opening.values[0][0] + MimcFE::one();
    tampered.trace_opening.values[0][0] = bumped;
    assert_eq!(
        verify(&air, &assertions, &tampered, &options),
        Err(VerificationError::MerkleOpeningFailed { commitment: "trace" })
    );
}

#[test]
fn tampered_composition_opening_is_rejected_as_merkle_failure() {
    let (air, assertions) = fibonacci_setup(512);
    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();

    let mut tampered = proof.clone();
    let value = &tampered.composition_opening.values[0][0] + FibFE::one();
    tampered.composition_opening.values[0][0] = value;
    assert_eq!(
        verify(&air, &assertions, &tampered, &options),
        Err(VerificationError::MerkleOpeningFailed {
            commitment: "composition"
        })
    );
}

#[test]
fn tampered_remainder_breaks_the_last_fold() {
    let (air, assertions) = fibonacci_setup(512);
    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();
    // 4096 points fold twice: 4096 -> 1024 -> 256.
    assert_eq!(proof.fri_layers.len(), 2);

    let mut tampered = proof.clone();
    for (position, value) in tampered.remainder.iter_mut().enumerate() {
        if position % options.extension_factor != 0 {
            *value = &*value + FibFE::one();
        }
    }
    assert!(matches!(
        verify(&air, &assertions, &tampered, &options),
        Err(VerificationError::FriFoldInconsistent { layer: 1, .. })
    ));
}

#[test]
fn swapped_roots_are_rejected() {
    let (air, assertions) = fibonacci_setup(512);
    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();

    let mut swapped = proof.clone();
    core::mem::swap(&mut swapped.trace_root, &mut swapped.composition_root);
    assert!(verify(&air, &assertions, &swapped, &options).is_err());
}

#[test]
fn any_single_byte_flip_invalidates_the_proof() {
    let (air, assertions) = fibonacci_setup(256);
    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();
    let bytes = serialize_proof(&proof).unwrap();

    for position in (0..bytes.len()).step_by(89) {
        let mut flipped = bytes.clone();
        flipped[position] ^= 0x01;
        let rejected = match deserialize_proof::<TwoAdic32PrimeField>(
            &flipped,
            air.register_count(),
        ) {
            Err(_) => true,
            Ok(parsed) => verify(&air, &assertions, &parsed, &options).is_err(),
        };
        assert!(rejected, "flip at byte {position} was not rejected");
    }
}

#[test]
fn configuration_errors_surface_before_any_work() {
    let (air, assertions) = fibonacci_setup(512);

    let options = ProofOptions {
        extension_factor: 6,
        ..ProofOptions::default_for_testing()
    };
    assert!(matches!(
        prove(&air, &assertions, &options),
        Err(ProvingError::Configuration(
            ConfigurationError::InvalidExtensionFactor { .. }
        ))
    ));

    let options = ProofOptions {
        exe_query_count: 0,
        ..ProofOptions::default_for_testing()
    };
    assert!(matches!(
        prove(&air, &assertions, &options),
        Err(ProvingError::Configuration(
            ConfigurationError::InvalidQueryCount { .. }
        ))
    ));

    let short_air = FibonacciAIR::new(
        4,
        FibonacciPublicInputs {
            a0: FibFE::one(),
            a1: FibFE::one(),
        },
    );
    assert!(matches!(
        prove(&short_air, &assertions, &ProofOptions::default_for_testing()),
        Err(ProvingError::Configuration(
            ConfigurationError::UnsupportedTraceLength(4)
        ))
    ));
}

#[test]
fn out_of_range_assertions_are_rejected_on_both_sides() {
    let (air, mut assertions) = fibonacci_setup(512);
    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();

    assertions.push(Assertion::new(0, 9, FibFE::one()));
    assert!(matches!(
        prove(&air, &assertions, &options),
        Err(ProvingError::InputShape(_))
    ));
    assert!(matches!(
        verify(&air, &assertions, &proof, &options),
        Err(VerificationError::InputShape(_))
    ));
}

#[test]
fn the_prover_refuses_assertions_the_trace_does_not_satisfy() {
    let (air, mut assertions) = fibonacci_setup(512);
    let bumped = &assertions[2].value + FibFE::one();
    assertions[2].value = bumped;
    assert_eq!(
        prove(&air, &assertions, &ProofOptions::default_for_testing()),
        Err(ProvingError::UnsatisfiedAssertion {
            step: 511,
            register: 1
        })
    );
}

#[test]
fn cancellation_interrupts_the_prover() {
    let (air, assertions) = fibonacci_setup(512);
    let token = CancellationToken::new();
    token.cancel();
    assert_eq!(
        prove_with_cancellation(&air, &assertions, &ProofOptions::default_for_testing(), &token),
        Err(ProvingError::Cancelled)
    );
}

// An AIR exercising the stretched and input static register variants: one
// accumulator with `r0' = r0^2 + input(x) + stretched(x)`.
#[derive(Clone, Debug)]
struct MixedStaticAIR {
    context: AirContext,
    inputs: Vec<MimcFE>,
    stretched: Vec<MimcFE>,
}

impl MixedStaticAIR {
    fn new(trace_length: usize, inputs: Vec<MimcFE>, stretched: Vec<MimcFE>) -> Self {
        Self {
            context: AirContext {
                trace_length,
                trace_columns: 1,
                transition_degrees: vec![2],
                transition_exemptions: 1,
            },
            inputs,
            stretched,
        }
    }
}

impl AIR for MixedStaticAIR {
    type Field = Stark128PrimeField;
    type PublicInputs = ();

    fn context(&self) -> &AirContext {
        &self.context
    }

    fn pub_inputs(&self) -> &Self::PublicInputs {
        &()
    }

    fn initial_state(&self) -> Vec<MimcFE> {
        vec![MimcFE::from(7)]
    }

    fn advance(
        &self,
        state: &[MimcFE],
        statics: &[MimcFE],
        _step: usize,
    ) -> Result<Vec<MimcFE>, TransitionError> {
        Ok(vec![state[0].square() + &statics[0] + &statics[1]])
    }

    fn evaluate_transition(
        &self,
        frame: &Frame<Stark128PrimeField>,
        statics: &[MimcFE],
    ) -> Vec<MimcFE> {
        let current = frame.get_row(0);
        let next = frame.get_row(1);
        vec![&next[0] - (current[0].square() + &statics[0] + &statics[1])]
    }

    fn static_columns(&self) -> Vec<StaticColumn<Stark128PrimeField>> {
        vec![
            StaticColumn::Input {
                values: self.inputs.clone(),
            },
            StaticColumn::Stretched {
                values: self.stretched.clone(),
            },
        ]
    }
}

#[test]
fn stretched_and_input_static_registers_prove_and_verify() {
    let trace_length = 128;
    let inputs: Vec<MimcFE> = (1..=8u64).map(MimcFE::from).collect();
    let stretched: Vec<MimcFE> = (11..=18u64).map(MimcFE::from).collect();
    let air = MixedStaticAIR::new(trace_length, inputs, stretched);

    // Recompute the final accumulator from the static base columns.
    let static_base: Vec<Vec<MimcFE>> = air
        .static_columns()
        .iter()
        .map(|column| column.base_column(trace_length).unwrap())
        .collect();
    let mut value = MimcFE::from(7);
    let initial_value = value.clone();
    for step in 0..trace_length - 1 {
        value = value.square() + &static_base[0][step] + &static_base[1][step];
    }

    let assertions = vec![
        Assertion::new(0, 0, initial_value),
        Assertion::new(trace_length - 1, 0, value),
    ];
    let options = ProofOptions::default_for_testing();
    let proof = prove(&air, &assertions, &options).unwrap();
    verify(&air, &assertions, &proof, &options).unwrap();

    // A perturbed input table invalidates the proof.
    let mut perturbed_inputs: Vec<MimcFE> = (1..=8u64).map(MimcFE::from).collect();
    let bumped = &perturbed_inputs[3] + MimcFE::one();
    perturbed_inputs[3] = bumped;
    let perturbed_air = MixedStaticAIR::new(
        trace_length,
        perturbed_inputs,
        (11..=18u64).map(MimcFE::from).collect(),
    );
    assert!(verify(&perturbed_air, &assertions, &proof, &options).is_err());
}
