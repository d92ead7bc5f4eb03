use blake2::Blake2s256;
use itertools::Itertools;
use log::info;
use sha2::{Digest, Sha256};

use lodestark_crypto::fiat_shamir::is_transcript::IsTranscript;
use lodestark_math::fft::polynomial::FFTPoly;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsFFTField;
use lodestark_math::polynomial::Polynomial;
use lodestark_math::traits::ByteConversion;

#[cfg(feature = "parallel")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::cancellation::CancellationToken;
use crate::config::{BatchedMerkleTree, Commitment};
use crate::constraints::boundary::{group_assertions, Assertion, BoundaryGroup};
use crate::constraints::evaluator::{
    sample_composition_coefficients, ConstraintEvaluator, DegreeSchedule,
};
use crate::domain::Domain;
use crate::errors::ProvingError;
use crate::fri::{
    expected_fold_count, fri_commit_phase, normalize_remainder, source_layer_positions, FriLayer,
};
use crate::proof::options::{HashAlgorithm, ProofOptions};
use crate::proof::stark::{BatchOpening, FriLayerProof, StarkProof};
use crate::queries::sample_query_indexes;
use crate::trace::{build_trace, TraceTable};
use crate::traits::AIR;
use crate::transcript::new_transcript;

/// Generates a proof that some execution of `air` satisfies `assertions`.
pub fn prove<A>(
    air: &A,
    assertions: &[Assertion<A::Field>],
    proof_options: &ProofOptions,
) -> Result<StarkProof<A::Field>, ProvingError>
where
    A: AIR + Send + Sync,
    FieldElement<A::Field>: ByteConversion + Send + Sync,
{
    prove_with_cancellation(air, assertions, proof_options, &CancellationToken::new())
}

/// Like [`prove`], polling `token` between phases.
pub fn prove_with_cancellation<A>(
    air: &A,
    assertions: &[Assertion<A::Field>],
    proof_options: &ProofOptions,
    token: &CancellationToken,
) -> Result<StarkProof<A::Field>, ProvingError>
where
    A: AIR + Send + Sync,
    FieldElement<A::Field>: ByteConversion + Send + Sync,
{
    match proof_options.hash_algorithm {
        HashAlgorithm::Sha256 => {
            prove_with_hasher::<A, Sha256>(air, assertions, proof_options, token)
        }
        HashAlgorithm::Blake2s256 => {
            prove_with_hasher::<A, Blake2s256>(air, assertions, proof_options, token)
        }
    }
}

fn prove_with_hasher<A, D>(
    air: &A,
    assertions: &[Assertion<A::Field>],
    proof_options: &ProofOptions,
    token: &CancellationToken,
) -> Result<StarkProof<A::Field>, ProvingError>
where
    A: AIR + Send + Sync,
    D: Digest + Send + Sync,
    FieldElement<A::Field>: ByteConversion + Send + Sync,
{
    info!("Started proof generation");
    proof_options.validate(air)?;
    let static_columns = air.static_columns();
    for (index, column) in static_columns.iter().enumerate() {
        column.validate(index, air.step_count())?;
    }
    let boundary_groups = group_assertions(assertions, air.context())?;
    let schedule = DegreeSchedule::new(air.context(), &boundary_groups)?;
    let domain = Domain::new(air, proof_options)?;
    check_cancelled(token)?;

    // Trace.
    info!("Building the execution trace");
    let static_base: Vec<Vec<FieldElement<A::Field>>> = static_columns
        .iter()
        .map(|column| column.base_column(air.step_count()))
        .collect::<Result<_, _>>()?;
    let trace = build_trace(air, &static_base)?;
    check_assertions_against_trace(&trace, &boundary_groups)?;
    #[cfg(debug_assertions)]
    crate::debug::validate_trace(air, &trace, &static_base)?;
    check_cancelled(token)?;

    // Low-degree extension and trace commitment.
    info!("Extending the trace and committing to it");
    let trace_polys = trace.compute_trace_polys()?;
    let lde_columns = evaluate_polys_on_lde_domain(&trace_polys, &domain)?;
    let lde_trace = TraceTable::from_columns(lde_columns);
    let lde_trace_rows = lde_trace.rows();
    let (trace_tree, trace_root) = batch_commit::<A::Field, D>(&lde_trace_rows);

    // >>>> Send commitment: trace root
    let mut transcript = new_transcript::<A, D>(air, assertions, proof_options, &schedule);
    transcript.append_bytes(&trace_root);
    // <<<< Receive challenges: composition weights
    let coefficients = sample_composition_coefficients(
        air.constraint_count(),
        boundary_groups.len(),
        &mut transcript,
    );
    check_cancelled(token)?;

    // Constraint composition and its commitment.
    info!("Evaluating the constraint composition");
    let static_lde: Vec<Vec<FieldElement<A::Field>>> = static_base
        .iter()
        .map(|column| {
            let poly = Polynomial::interpolate_fft(column)?;
            evaluate_poly_on_lde_domain(&poly, &domain)
        })
        .collect::<Result<_, _>>()?;
    let evaluator = ConstraintEvaluator::new(air, &boundary_groups, &schedule, &coefficients);
    let composition_evaluations = evaluator.evaluate(&domain, &lde_trace, &static_lde)?;
    let composition_rows: Vec<Vec<FieldElement<A::Field>>> = composition_evaluations
        .iter()
        .map(|value| vec![value.clone()])
        .collect();
    let (composition_tree, composition_root) = batch_commit::<A::Field, D>(&composition_rows);
    // >>>> Send commitment: composition root
    transcript.append_bytes(&composition_root);
    check_cancelled(token)?;

    // FRI.
    info!("Running the FRI commit phase");
    let (fri_folded_layers, mut remainder) = fri_commit_phase(
        &composition_evaluations,
        proof_options.fri_folding_factor,
        proof_options.fri_remainder_threshold,
        &mut transcript,
    )?;
    let remainder_degree_bound =
        schedule.remainder_degree_bound(domain.lde_domain_size, remainder.len());
    normalize_remainder::<A::Field>(
        &mut remainder,
        domain.blowup_factor,
        remainder_degree_bound,
    )?;
    check_cancelled(token)?;

    // Queries and openings.
    info!("Opening the queried positions");
    let exe_query_indexes = sample_query_indexes(
        proof_options.exe_query_count,
        domain.lde_domain_size,
        domain.blowup_factor,
        &mut transcript,
    )
    .ok_or(ProvingError::ChallengeDerivationFailed)?;
    let fri_query_indexes = sample_query_indexes(
        proof_options.fri_query_count,
        domain.lde_domain_size,
        domain.blowup_factor,
        &mut transcript,
    )
    .ok_or(ProvingError::ChallengeDerivationFailed)?;

    let trace_positions: Vec<usize> = exe_query_indexes
        .iter()
        .flat_map(|index| {
            [
                *index,
                (index + domain.blowup_factor) % domain.lde_domain_size,
            ]
        })
        .sorted_unstable()
        .dedup()
        .collect();
    let trace_opening = open_positions(&trace_tree, &lde_trace_rows, &trace_positions);
    let composition_opening =
        open_positions(&composition_tree, &composition_rows, &exe_query_indexes);

    let fold_count = expected_fold_count(
        domain.lde_domain_size,
        proof_options.fri_folding_factor,
        proof_options.fri_remainder_threshold,
    );
    let mut fri_layer_proofs = Vec::with_capacity(fold_count);
    let mut source_size = domain.lde_domain_size;
    for fold in 0..fold_count {
        let positions = source_layer_positions(
            &fri_query_indexes,
            source_size,
            proof_options.fri_folding_factor,
        );
        let layer_proof = if fold == 0 {
            FriLayerProof {
                root: composition_root,
                opening: open_positions(&composition_tree, &composition_rows, &positions),
            }
        } else {
            let layer: &FriLayer<A::Field, D> = &fri_folded_layers[fold - 1];
            let rows: Vec<Vec<FieldElement<A::Field>>> = layer
                .evaluations
                .iter()
                .map(|value| vec![value.clone()])
                .collect();
            FriLayerProof {
                root: layer.root,
                opening: open_positions(&layer.merkle_tree, &rows, &positions),
            }
        };
        fri_layer_proofs.push(layer_proof);
        source_size /= proof_options.fri_folding_factor;
    }

    info!("End proof generation");
    Ok(StarkProof {
        trace_root,
        composition_root,
        trace_opening,
        composition_opening,
        fri_layers: fri_layer_proofs,
        remainder,
    })
}

fn batch_commit<F, D>(rows: &[Vec<FieldElement<F>>]) -> (BatchedMerkleTree<F, D>, Commitment)
where
    F: IsFFTField,
    D: Digest + Send + Sync,
    FieldElement<F>: ByteConversion,
{
    let tree = BatchedMerkleTree::<F, D>::build(rows);
    let commitment = tree.root;
    (tree, commitment)
}

fn open_positions<F, D>(
    tree: &BatchedMerkleTree<F, D>,
    rows: &[Vec<FieldElement<F>>],
    positions: &[usize],
) -> BatchOpening<F>
where
    F: IsFFTField,
    D: Digest + Send + Sync,
    FieldElement<F>: ByteConversion,
{
    let proof = tree
        .get_batch_proof(positions)
        .expect("query positions are sorted, distinct and in range");
    let values = positions
        .iter()
        .map(|position| rows[*position].clone())
        .collect();
    BatchOpening { values, proof }
}

fn evaluate_polys_on_lde_domain<F>(
    polys: &[Polynomial<FieldElement<F>>],
    domain: &Domain<F>,
) -> Result<Vec<Vec<FieldElement<F>>>, ProvingError>
where
    F: IsFFTField,
    FieldElement<F>: Send + Sync,
{
    #[cfg(feature = "parallel")]
    let iter = polys.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = polys.iter();

    iter.map(|poly| evaluate_poly_on_lde_domain(poly, domain))
        .collect()
}

fn evaluate_poly_on_lde_domain<F>(
    poly: &Polynomial<FieldElement<F>>,
    domain: &Domain<F>,
) -> Result<Vec<FieldElement<F>>, ProvingError>
where
    F: IsFFTField,
{
    poly.evaluate_fft(
        domain.blowup_factor,
        Some(domain.interpolation_domain_size),
    )
    .map_err(ProvingError::Fft)
}

fn check_assertions_against_trace<F: IsFFTField>(
    trace: &TraceTable<F>,
    boundary_groups: &[BoundaryGroup<F>],
) -> Result<(), ProvingError> {
    for group in boundary_groups {
        for (step, value) in group.steps.iter().zip(&group.values) {
            if trace.get(*step, group.register) != value {
                return Err(ProvingError::UnsatisfiedAssertion {
                    step: *step,
                    register: group.register,
                });
            }
        }
    }
    Ok(())
}

fn check_cancelled(token: &CancellationToken) -> Result<(), ProvingError> {
    if token.is_cancelled() {
        info!("Proof generation cancelled");
        return Err(ProvingError::Cancelled);
    }
    Ok(())
}
