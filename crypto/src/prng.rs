use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsField;
use sha2::Digest;

/// Deterministically expands a byte-string seed into `count` field elements:
/// element `i` is `H(seed ‖ i_be)` folded big-endian into the field.
pub fn prng<F, D>(seed: &[u8], count: usize) -> Vec<FieldElement<F>>
where
    F: IsField,
    D: Digest,
{
    (0..count as u64)
        .map(|counter| {
            let digest = D::new()
                .chain_update(seed)
                .chain_update(counter.to_be_bytes())
                .finalize();
            let radix = FieldElement::<F>::from(256);
            digest.iter().fold(FieldElement::zero(), |acc, byte| {
                acc * &radix + FieldElement::from(*byte as u64)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blake2::Blake2s256;
    use lodestark_math::field::fields::fft_friendly::stark128_prime_field::Stark128PrimeField;
    use sha2::Sha256;

    type F = Stark128PrimeField;

    #[test]
    fn expansion_is_deterministic() {
        let a = prng::<F, Sha256>(b"seed", 8);
        let b = prng::<F, Sha256>(b"seed", 8);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn different_seeds_and_hashes_diverge() {
        let a = prng::<F, Sha256>(b"seed-a", 4);
        let b = prng::<F, Sha256>(b"seed-b", 4);
        let c = prng::<F, Blake2s256>(b"seed-a", 4);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn longer_expansions_extend_shorter_ones() {
        let short = prng::<F, Sha256>(b"seed", 4);
        let long = prng::<F, Sha256>(b"seed", 8);
        assert_eq!(short[..], long[..4]);
    }
}
