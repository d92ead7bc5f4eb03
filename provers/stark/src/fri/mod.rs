pub mod fri_functions;

use std::collections::BTreeSet;

use lodestark_math::fft::cpu::roots_of_unity::get_power_cycle;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsFFTField;
use lodestark_math::polynomial::Polynomial;
use lodestark_math::traits::ByteConversion;
use sha2::Digest;

use lodestark_crypto::fiat_shamir::is_transcript::IsTranscript;

use self::fri_functions::fold_evaluations;
use crate::config::{BatchedMerkleTree, Commitment};
use crate::errors::ProvingError;
use crate::transcript::StarkTranscript;

/// One committed FRI layer: the folded evaluations and their Merkle tree.
pub struct FriLayer<F, D>
where
    F: IsFFTField,
    D: Digest + Send + Sync,
    FieldElement<F>: ByteConversion,
{
    pub evaluations: Vec<FieldElement<F>>,
    pub merkle_tree: BatchedMerkleTree<F, D>,
    pub root: Commitment,
}

/// Folds the composition evaluations down to the remainder, committing every
/// intermediate layer and interleaving challenges with commitments on the
/// transcript: draw `ζ`, fold, absorb the new root; the final layer (at most
/// `remainder_threshold` values) is the remainder and is not committed.
pub fn fri_commit_phase<F, D>(
    composition_evaluations: &[FieldElement<F>],
    folding_factor: usize,
    remainder_threshold: usize,
    transcript: &mut StarkTranscript<F, D>,
) -> Result<(Vec<FriLayer<F, D>>, Vec<FieldElement<F>>), ProvingError>
where
    F: IsFFTField,
    D: Digest + Send + Sync,
    FieldElement<F>: ByteConversion,
{
    let mut folded_layers = Vec::new();
    let mut current = composition_evaluations.to_vec();

    while current.len() > remainder_threshold {
        // <<<< Receive challenge ζ
        let zeta = transcript.sample_field_element();
        current = fold_evaluations(current, &zeta, folding_factor)?;

        if current.len() > remainder_threshold {
            let rows: Vec<Vec<FieldElement<F>>> =
                current.iter().map(|value| vec![value.clone()]).collect();
            let merkle_tree = BatchedMerkleTree::<F, D>::build(&rows);
            let root = merkle_tree.root;
            // >>>> Send commitment: the folded layer's root
            transcript.append_bytes(&root);
            folded_layers.push(FriLayer {
                evaluations: current.clone(),
                merkle_tree,
                root,
            });
        }
    }

    Ok((folded_layers, current))
}

/// Rewrites the remainder values at positions aligned with the base domain.
///
/// The pointwise vanishing division leaves meaningless values at every
/// index that is a multiple of the extension factor, and folding keeps that
/// set aligned through the layers. The true fold polynomial is determined by
/// the other positions, so the prover interpolates it from the first
/// `degree_bound` of them and replaces the meaningless values with its
/// actual evaluations. The shipped remainder is then low-degree everywhere,
/// which lets the verifier's degree check constrain every byte of it.
pub fn normalize_remainder<F: IsFFTField>(
    remainder: &mut [FieldElement<F>],
    exclude_stride: usize,
    degree_bound: usize,
) -> Result<(), ProvingError> {
    let size = remainder.len();
    let root = F::get_primitive_root_of_unity(size.trailing_zeros() as u64)
        .map_err(|error| ProvingError::Fft(error.into()))?;
    let points = get_power_cycle(&root, size);

    let sample: Vec<usize> = (0..size)
        .filter(|position| position % exclude_stride != 0)
        .take(degree_bound)
        .collect();
    debug_assert_eq!(sample.len(), degree_bound);
    let xs: Vec<FieldElement<F>> = sample.iter().map(|position| points[*position].clone()).collect();
    let ys: Vec<FieldElement<F>> = sample
        .iter()
        .map(|position| remainder[*position].clone())
        .collect();
    let interpolant =
        Polynomial::interpolate(&xs, &ys).expect("domain points are distinct");

    for position in (0..size).step_by(exclude_stride) {
        remainder[position] = interpolant.evaluate(&points[position]);
    }
    Ok(())
}

/// Number of folds needed to bring `domain_size` at or below the remainder
/// threshold.
pub fn expected_fold_count(
    domain_size: usize,
    folding_factor: usize,
    remainder_threshold: usize,
) -> usize {
    let mut size = domain_size;
    let mut folds = 0;
    while size > remainder_threshold {
        size /= folding_factor;
        folds += 1;
    }
    folds
}

/// The sorted set of positions a source layer must open so that every query
/// can check its fold: the full coset of `f` positions around
/// `query mod (source_size / f)`, for every query.
pub fn source_layer_positions(
    fri_query_indexes: &[usize],
    source_size: usize,
    folding_factor: usize,
) -> Vec<usize> {
    let folded_size = source_size / folding_factor;
    let mut positions = BTreeSet::new();
    for index in fri_query_indexes {
        let column = index % folded_size;
        for member in 0..folding_factor {
            positions.insert(column + member * folded_size);
        }
    }
    positions.into_iter().collect()
}
