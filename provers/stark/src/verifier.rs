use blake2::Blake2s256;
use itertools::Itertools;
use log::error;
use sha2::{Digest, Sha256};

use lodestark_crypto::fiat_shamir::is_transcript::IsTranscript;
use lodestark_crypto::merkle_tree::backends::field_row::FieldRowBackend;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsFFTField;
use lodestark_math::polynomial::Polynomial;
use lodestark_math::traits::ByteConversion;

use crate::config::Commitment;
use crate::constraints::boundary::{group_assertions, Assertion, BoundaryGroup};
use crate::constraints::evaluator::{
    linear_combination, sample_composition_coefficients, transition_zerofier_inverse_at,
    CompositionCoefficients, DegreeSchedule,
};
use crate::domain::Domain;
use crate::errors::VerificationError;
use crate::frame::Frame;
use crate::fri::{expected_fold_count, source_layer_positions};
use crate::proof::options::{HashAlgorithm, ProofOptions};
use crate::proof::stark::{BatchOpening, StarkProof};
use crate::queries::sample_query_indexes;
use crate::registers::StaticColumn;
use crate::traits::AIR;
use crate::transcript::{new_transcript, StarkTranscript};

/// Checks a proof against the AIR and the public assertions. Returns at the
/// first failing check; nothing partial is ever accepted.
pub fn verify<A>(
    air: &A,
    assertions: &[Assertion<A::Field>],
    proof: &StarkProof<A::Field>,
    proof_options: &ProofOptions,
) -> Result<(), VerificationError>
where
    A: AIR,
    FieldElement<A::Field>: ByteConversion,
{
    let result = match proof_options.hash_algorithm {
        HashAlgorithm::Sha256 => {
            verify_with_hasher::<A, Sha256>(air, assertions, proof, proof_options)
        }
        HashAlgorithm::Blake2s256 => {
            verify_with_hasher::<A, Blake2s256>(air, assertions, proof, proof_options)
        }
    };
    if let Err(cause) = &result {
        error!("Proof rejected: {cause}");
    }
    result
}

struct Challenges<F: IsFFTField> {
    coefficients: CompositionCoefficients<F>,
    zetas: Vec<FieldElement<F>>,
    exe_query_indexes: Vec<usize>,
    fri_query_indexes: Vec<usize>,
}

fn verify_with_hasher<A, D>(
    air: &A,
    assertions: &[Assertion<A::Field>],
    proof: &StarkProof<A::Field>,
    proof_options: &ProofOptions,
) -> Result<(), VerificationError>
where
    A: AIR,
    D: Digest + Send + Sync,
    FieldElement<A::Field>: ByteConversion,
{
    proof_options.validate(air)?;
    let static_columns = air.static_columns();
    for (index, column) in static_columns.iter().enumerate() {
        column.validate(index, air.step_count())?;
    }
    let boundary_groups = group_assertions(assertions, air.context())?;
    let schedule = DegreeSchedule::new(air.context(), &boundary_groups)?;
    let domain = Domain::new(air, proof_options)?;

    let fold_count = expected_fold_count(
        domain.lde_domain_size,
        proof_options.fri_folding_factor,
        proof_options.fri_remainder_threshold,
    );
    if proof.fri_layers.len() != fold_count {
        return Err(VerificationError::FriLayerCountMismatch {
            got: proof.fri_layers.len(),
            expected: fold_count,
        });
    }
    if fold_count > 0 && proof.fri_layers[0].root != proof.composition_root {
        return Err(VerificationError::FriLayerRootMismatch);
    }
    let expected_remainder_len =
        domain.lde_domain_size / proof_options.fri_folding_factor.pow(fold_count as u32);
    if proof.remainder.len() != expected_remainder_len {
        return Err(VerificationError::RemainderLengthMismatch {
            got: proof.remainder.len(),
            expected: expected_remainder_len,
        });
    }

    let challenges = replay_transcript::<A, D>(
        air,
        assertions,
        proof,
        proof_options,
        &schedule,
        &boundary_groups,
        fold_count,
    )?;

    verify_trace_and_composition_openings::<A::Field, D>(proof, &domain, &challenges)?;
    verify_constraint_composition(
        air,
        proof,
        &domain,
        &static_columns,
        &boundary_groups,
        &schedule,
        &challenges,
    )?;
    verify_fri::<A::Field, D>(proof, &domain, proof_options, &challenges, fold_count)?;
    verify_remainder::<A::Field>(proof, &domain, &schedule, &challenges, fold_count)?;

    Ok(())
}

/// Replays the prover's transcript schedule and recovers every challenge.
fn replay_transcript<A, D>(
    air: &A,
    assertions: &[Assertion<A::Field>],
    proof: &StarkProof<A::Field>,
    proof_options: &ProofOptions,
    schedule: &DegreeSchedule,
    boundary_groups: &[BoundaryGroup<A::Field>],
    fold_count: usize,
) -> Result<Challenges<A::Field>, VerificationError>
where
    A: AIR,
    D: Digest,
    FieldElement<A::Field>: ByteConversion,
{
    let mut transcript: StarkTranscript<A::Field, D> =
        new_transcript::<A, D>(air, assertions, proof_options, schedule);

    // <<<< Receive commitment: trace root
    transcript.append_bytes(&proof.trace_root);
    // >>>> Send challenges: composition weights
    let coefficients = sample_composition_coefficients(
        air.constraint_count(),
        boundary_groups.len(),
        &mut transcript,
    );
    // <<<< Receive commitment: composition root
    transcript.append_bytes(&proof.composition_root);

    // >>>> Send folding challenges, interleaved with the layer commitments
    // exactly the way the commit phase absorbs them.
    let mut zetas = Vec::with_capacity(fold_count);
    for fold in 0..fold_count {
        zetas.push(transcript.sample_field_element());
        if fold + 1 < fold_count {
            transcript.append_bytes(&proof.fri_layers[fold + 1].root);
        }
    }

    let lde_domain_size = air.step_count() * proof_options.extension_factor;
    let exe_query_indexes = sample_query_indexes(
        proof_options.exe_query_count,
        lde_domain_size,
        proof_options.extension_factor,
        &mut transcript,
    )
    .ok_or(VerificationError::ChallengeDerivationFailed)?;
    let fri_query_indexes = sample_query_indexes(
        proof_options.fri_query_count,
        lde_domain_size,
        proof_options.extension_factor,
        &mut transcript,
    )
    .ok_or(VerificationError::ChallengeDerivationFailed)?;

    Ok(Challenges {
        coefficients,
        zetas,
        exe_query_indexes,
        fri_query_indexes,
    })
}

/// The sorted positions the trace commitment must open: every execution
/// query index and its next-in-base-domain neighbour.
fn trace_opening_positions<F: IsFFTField>(domain: &Domain<F>, exe_indexes: &[usize]) -> Vec<usize> {
    exe_indexes
        .iter()
        .flat_map(|index| {
            [
                *index,
                (index + domain.blowup_factor) % domain.lde_domain_size,
            ]
        })
        .sorted_unstable()
        .dedup()
        .collect()
}

fn verify_opening<F, D>(
    opening: &BatchOpening<F>,
    root: &Commitment,
    positions: &[usize],
    commitment: &'static str,
) -> Result<(), VerificationError>
where
    F: IsFFTField,
    D: Digest + Send + Sync,
    FieldElement<F>: ByteConversion,
{
    let valid = opening
        .proof
        .verify::<FieldRowBackend<F, D>>(root, positions, &opening.values);
    if valid {
        Ok(())
    } else {
        Err(VerificationError::MerkleOpeningFailed { commitment })
    }
}

fn verify_trace_and_composition_openings<F, D>(
    proof: &StarkProof<F>,
    domain: &Domain<F>,
    challenges: &Challenges<F>,
) -> Result<(), VerificationError>
where
    F: IsFFTField,
    D: Digest + Send + Sync,
    FieldElement<F>: ByteConversion,
{
    let trace_positions = trace_opening_positions(domain, &challenges.exe_query_indexes);
    verify_opening::<F, D>(
        &proof.trace_opening,
        &proof.trace_root,
        &trace_positions,
        "trace",
    )?;
    verify_opening::<F, D>(
        &proof.composition_opening,
        &proof.composition_root,
        &challenges.exe_query_indexes,
        "composition",
    )
}

/// Recomputes the constraint composition at every execution query from the
/// opened trace rows and compares it with the opened composition value.
fn verify_constraint_composition<A>(
    air: &A,
    proof: &StarkProof<A::Field>,
    domain: &Domain<A::Field>,
    static_columns: &[StaticColumn<A::Field>],
    boundary_groups: &[BoundaryGroup<A::Field>],
    schedule: &DegreeSchedule,
    challenges: &Challenges<A::Field>,
) -> Result<(), VerificationError>
where
    A: AIR,
    FieldElement<A::Field>: ByteConversion,
{
    let context = air.context();
    let trace_positions = trace_opening_positions(domain, &challenges.exe_query_indexes);
    let row_at = |position: usize| -> Result<&Vec<FieldElement<A::Field>>, VerificationError> {
        let slot = trace_positions
            .binary_search(&position)
            .map_err(|_| VerificationError::MerkleOpeningFailed { commitment: "trace" })?;
        proof
            .trace_opening
            .values
            .get(slot)
            .ok_or(VerificationError::MerkleOpeningFailed { commitment: "trace" })
    };

    let static_interpolants = static_columns
        .iter()
        .map(|column| column.interpolant())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| VerificationError::ZeroDenominator)?;
    let boundary_interpolants: Vec<Polynomial<FieldElement<A::Field>>> = boundary_groups
        .iter()
        .map(|group| group.interpolant(&domain.trace_roots_of_unity))
        .collect();

    for (query, index) in challenges.exe_query_indexes.iter().enumerate() {
        let x = &domain.lde_roots_of_unity[*index];
        let next_index = (index + domain.blowup_factor) % domain.lde_domain_size;
        let frame = Frame::from_rows(row_at(*index)?.clone(), row_at(next_index)?.clone());

        let statics = static_columns
            .iter()
            .zip(&static_interpolants)
            .map(|(column, interpolant)| {
                column
                    .evaluate_with(interpolant, x, context.trace_length)
                    .ok_or(VerificationError::ZeroDenominator)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let constraint_evaluations = air.evaluate_transition(&frame, &statics);
        if constraint_evaluations.len() != context.num_transition_constraints() {
            return Err(VerificationError::InputShape(
                crate::errors::InputShapeError::WrongConstraintCount {
                    got: constraint_evaluations.len(),
                    expected: context.num_transition_constraints(),
                },
            ));
        }

        let zerofier_inverse =
            transition_zerofier_inverse_at(x, context, &domain.trace_roots_of_unity)
                .ok_or(VerificationError::ZeroDenominator)?;
        let transition_quotients: Vec<FieldElement<A::Field>> = constraint_evaluations
            .iter()
            .map(|evaluation| evaluation * &zerofier_inverse)
            .collect();

        let boundary_quotients = boundary_groups
            .iter()
            .zip(&boundary_interpolants)
            .map(|(group, interpolant)| {
                let trace_value = &frame.get_row(0)[group.register];
                let numerator = trace_value - interpolant.evaluate(x);
                let zerofier_inverse = group
                    .zerofier_at(x, &domain.trace_roots_of_unity)
                    .inv()
                    .map_err(|_| VerificationError::ZeroDenominator)?;
                Ok(numerator * zerofier_inverse)
            })
            .collect::<Result<Vec<_>, VerificationError>>()?;

        let recomputed = linear_combination(
            x,
            &transition_quotients,
            &boundary_quotients,
            schedule,
            &challenges.coefficients,
        );
        let opened = &proof.composition_opening.values[query][0];
        if &recomputed != opened {
            return Err(VerificationError::CompositionMismatch { index: *index });
        }
    }

    Ok(())
}

/// Checks every FRI fold: the coset opened in each source layer must
/// interpolate to a polynomial whose value at that layer's challenge equals
/// the opened value at the folded position in the next layer (or in the
/// remainder for the last fold).
fn verify_fri<F, D>(
    proof: &StarkProof<F>,
    domain: &Domain<F>,
    proof_options: &ProofOptions,
    challenges: &Challenges<F>,
    fold_count: usize,
) -> Result<(), VerificationError>
where
    F: IsFFTField,
    D: Digest + Send + Sync,
    FieldElement<F>: ByteConversion,
{
    let folding_factor = proof_options.fri_folding_factor;

    // Opened positions per source layer, and their Merkle checks.
    let mut layer_positions = Vec::with_capacity(fold_count);
    let mut source_size = domain.lde_domain_size;
    for layer_proof in &proof.fri_layers {
        let positions =
            source_layer_positions(&challenges.fri_query_indexes, source_size, folding_factor);
        verify_opening::<F, D>(&layer_proof.opening, &layer_proof.root, &positions, "FRI layer")?;
        layer_positions.push(positions);
        source_size /= folding_factor;
    }

    let value_at = |layer: usize, position: usize| -> Result<&FieldElement<F>, VerificationError> {
        let positions = &layer_positions[layer];
        let slot = positions
            .binary_search(&position)
            .map_err(|_| VerificationError::MerkleOpeningFailed { commitment: "FRI layer" })?;
        proof.fri_layers[layer]
            .opening
            .values
            .get(slot)
            .and_then(|row| row.first())
            .ok_or(VerificationError::MerkleOpeningFailed { commitment: "FRI layer" })
    };

    for index in &challenges.fri_query_indexes {
        let mut source_size = domain.lde_domain_size;
        for layer in 0..fold_count {
            let folded_size = source_size / folding_factor;
            let column = index % folded_size;
            // ω_{L}^p = ω_N^{p · (N / L)}.
            let stride = domain.lde_domain_size / source_size;
            let mut xs = Vec::with_capacity(folding_factor);
            let mut values = Vec::with_capacity(folding_factor);
            for member in 0..folding_factor {
                let position = column + member * folded_size;
                xs.push(domain.lde_roots_of_unity[(position * stride) % domain.lde_domain_size].clone());
                values.push(value_at(layer, position)?.clone());
            }

            let interpolant = Polynomial::interpolate(&xs, &values)
                .map_err(|_| VerificationError::ZeroDenominator)?;
            let folded_value = interpolant.evaluate(&challenges.zetas[layer]);

            let expected = if layer + 1 < fold_count {
                value_at(layer + 1, column)?.clone()
            } else {
                proof.remainder[column].clone()
            };
            if folded_value != expected {
                return Err(VerificationError::FriFoldInconsistent {
                    layer,
                    index: *index,
                });
            }
            source_size = folded_size;
        }
    }

    Ok(())
}

/// Checks the remainder is a polynomial of degree below the tracked bound
/// `D / f^folds`: interpolate the first `bound` positions that are not
/// aligned with the base domain, then test every remaining position, aligned
/// or not, against the interpolant (the prover normalizes the aligned
/// values, so all of them are constrained). With no folds at all the
/// remainder must also equal the opened composition values directly.
fn verify_remainder<F>(
    proof: &StarkProof<F>,
    domain: &Domain<F>,
    schedule: &DegreeSchedule,
    challenges: &Challenges<F>,
    fold_count: usize,
) -> Result<(), VerificationError>
where
    F: IsFFTField,
    FieldElement<F>: ByteConversion,
{
    if fold_count == 0 {
        for (query, index) in challenges.exe_query_indexes.iter().enumerate() {
            if proof.remainder[*index] != proof.composition_opening.values[query][0] {
                return Err(VerificationError::RemainderMismatch { index: *index });
            }
        }
    }

    let remainder_size = proof.remainder.len();
    let bound = schedule.remainder_degree_bound(domain.lde_domain_size, remainder_size);
    let stride = domain.lde_domain_size / remainder_size;

    let sample: Vec<usize> = (0..remainder_size)
        .filter(|position| position % domain.blowup_factor != 0)
        .take(bound)
        .collect();
    if bound == 0 || sample.len() < bound {
        return Err(VerificationError::RemainderDegreeExceeded);
    }

    let point_at = |position: usize| -> FieldElement<F> {
        domain.lde_roots_of_unity[(position * stride) % domain.lde_domain_size].clone()
    };

    let xs: Vec<FieldElement<F>> = sample.iter().map(|position| point_at(*position)).collect();
    let ys: Vec<FieldElement<F>> = sample
        .iter()
        .map(|position| proof.remainder[*position].clone())
        .collect();
    let interpolant =
        Polynomial::interpolate(&xs, &ys).map_err(|_| VerificationError::ZeroDenominator)?;

    let mut sampled = vec![false; remainder_size];
    for position in &sample {
        sampled[*position] = true;
    }
    for position in 0..remainder_size {
        if sampled[position] {
            continue;
        }
        if interpolant.evaluate(&point_at(position)) != proof.remainder[position] {
            return Err(VerificationError::RemainderDegreeExceeded);
        }
    }

    Ok(())
}
