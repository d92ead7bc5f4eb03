use lodestark_crypto::merkle_tree::backends::field_row::FieldRowBackend;
use lodestark_crypto::merkle_tree::merkle::MerkleTree;

/// A 256-bit Merkle root.
pub type Commitment = [u8; 32];

/// Merkle tree whose leaves are rows of field elements: a full trace row for
/// the trace commitment, a single element for composition and FRI layers.
pub type BatchedMerkleTree<F, D> = MerkleTree<FieldRowBackend<F, D>>;
