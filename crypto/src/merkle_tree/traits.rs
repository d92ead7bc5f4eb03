#[cfg(feature = "parallel")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

/// Hashing backend of a Merkle tree: how raw leaf data becomes a node, and
/// how two sibling nodes combine into their parent.
pub trait IsMerkleTreeBackend {
    type Node: Clone + PartialEq + Eq + Send + Sync;
    type Data: Send + Sync;

    /// Hashes one piece of leaf data into a node.
    fn hash_data(leaf: &Self::Data) -> Self::Node;

    /// Hashes two children into their parent node.
    fn hash_new_parent(left: &Self::Node, right: &Self::Node) -> Self::Node;

    /// Hashes a whole layer of leaves.
    fn hash_leaves(unhashed_leaves: &[Self::Data]) -> Vec<Self::Node> {
        #[cfg(feature = "parallel")]
        let iter = unhashed_leaves.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = unhashed_leaves.iter();

        iter.map(|leaf| Self::hash_data(leaf)).collect()
    }
}
