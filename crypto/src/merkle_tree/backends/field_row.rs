use core::marker::PhantomData;

use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsField;
use lodestark_math::traits::ByteConversion;
use sha2::Digest;

use crate::merkle_tree::traits::IsMerkleTreeBackend;

/// Merkle backend whose leaves are rows of field elements, hashed by
/// concatenating their canonical big-endian encodings. A row of length one
/// covers single-column commitments.
#[derive(Debug, Clone)]
pub struct FieldRowBackend<F, D: Digest> {
    phantom1: PhantomData<F>,
    phantom2: PhantomData<D>,
}

impl<F, D: Digest> Default for FieldRowBackend<F, D> {
    fn default() -> Self {
        Self {
            phantom1: PhantomData,
            phantom2: PhantomData,
        }
    }
}

impl<F, D> IsMerkleTreeBackend for FieldRowBackend<F, D>
where
    F: IsField,
    D: Digest + Send + Sync,
    FieldElement<F>: ByteConversion,
{
    type Node = [u8; 32];
    type Data = Vec<FieldElement<F>>;

    fn hash_data(row: &Vec<FieldElement<F>>) -> [u8; 32] {
        let mut hasher = D::new();
        for element in row.iter() {
            hasher.update(element.to_bytes_be());
        }
        let mut result_hash = [0_u8; 32];
        result_hash.copy_from_slice(&hasher.finalize());
        result_hash
    }

    fn hash_new_parent(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut hasher = D::new();
        hasher.update(left);
        hasher.update(right);
        let mut result_hash = [0_u8; 32];
        result_hash.copy_from_slice(&hasher.finalize());
        result_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle_tree::merkle::MerkleTree;
    use blake2::Blake2s256;
    use lodestark_math::field::fields::fft_friendly::stark128_prime_field::Stark128PrimeField;
    use sha2::Sha256;

    type F = Stark128PrimeField;
    type FE = FieldElement<F>;

    fn sample_rows() -> Vec<Vec<FE>> {
        (0..8u64)
            .map(|i| vec![FE::from(2 * i), FE::from(11 * i + 3)])
            .collect()
    }

    #[test]
    fn row_backend_works_with_sha256() {
        let rows = sample_rows();
        let tree = MerkleTree::<FieldRowBackend<F, Sha256>>::build(&rows);
        let proof = tree.get_proof_by_pos(0).unwrap();
        assert!(proof.verify::<FieldRowBackend<F, Sha256>>(&tree.root, 0, &rows[0]));
    }

    #[test]
    fn row_backend_works_with_blake2s256() {
        let rows = sample_rows();
        let tree = MerkleTree::<FieldRowBackend<F, Blake2s256>>::build(&rows);
        let proof = tree.get_proof_by_pos(5).unwrap();
        assert!(proof.verify::<FieldRowBackend<F, Blake2s256>>(&tree.root, 5, &rows[5]));
    }

    #[test]
    fn the_two_algorithms_disagree_on_the_root() {
        let rows = sample_rows();
        let sha_tree = MerkleTree::<FieldRowBackend<F, Sha256>>::build(&rows);
        let blake_tree = MerkleTree::<FieldRowBackend<F, Blake2s256>>::build(&rows);
        assert_ne!(sha_tree.root, blake_tree.root);
    }
}
