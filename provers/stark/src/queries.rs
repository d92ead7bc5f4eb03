use std::collections::BTreeSet;

use lodestark_crypto::fiat_shamir::is_transcript::IsTranscript;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsFFTField;
use lodestark_math::traits::ByteConversion;
use sha2::Digest;

use crate::transcript::StarkTranscript;

/// Attempts per requested index before giving up.
const ATTEMPT_FACTOR: usize = 1000;

/// Draws `count` distinct pseudorandom indices in `[0, domain_size)`,
/// rejecting multiples of `exclude_stride` (the base-domain positions, where
/// vanishing-polynomial quotients are undefined) and repeats. Returns the
/// indices in ascending order.
pub fn sample_query_indexes<F, D>(
    count: usize,
    domain_size: usize,
    exclude_stride: usize,
    transcript: &mut StarkTranscript<F, D>,
) -> Option<Vec<usize>>
where
    F: IsFFTField,
    D: Digest,
    FieldElement<F>: ByteConversion,
{
    let mut indexes = BTreeSet::new();
    let mut attempts = 0;
    while indexes.len() < count {
        if attempts >= ATTEMPT_FACTOR * count {
            return None;
        }
        attempts += 1;
        let index = transcript.sample_u64(domain_size as u64) as usize;
        if index % exclude_stride == 0 {
            continue;
        }
        indexes.insert(index);
    }
    Some(indexes.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestark_math::field::fields::fft_friendly::stark128_prime_field::Stark128PrimeField;
    use sha2::Sha256;

    type F = Stark128PrimeField;

    #[test]
    fn indexes_are_distinct_sorted_and_never_on_the_base_domain() {
        let mut transcript = StarkTranscript::<F, Sha256>::new(b"queries");
        let indexes = sample_query_indexes(40, 1 << 12, 8, &mut transcript).unwrap();
        assert_eq!(indexes.len(), 40);
        assert!(indexes.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(indexes.iter().all(|index| index % 8 != 0));
        assert!(indexes.iter().all(|index| *index < (1 << 12)));
    }

    #[test]
    fn both_sides_derive_the_same_indexes() {
        let mut prover_side = StarkTranscript::<F, Sha256>::new(b"queries");
        let mut verifier_side = StarkTranscript::<F, Sha256>::new(b"queries");
        let a = sample_query_indexes(16, 1 << 10, 4, &mut prover_side).unwrap();
        let b = sample_query_indexes(16, 1 << 10, 4, &mut verifier_side).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn impossible_requests_hit_the_attempt_cap() {
        // Excluding stride 1 rejects every index.
        let mut transcript = StarkTranscript::<F, Sha256>::new(b"queries");
        assert!(sample_query_indexes(1, 64, 1, &mut transcript).is_none());
    }
}
