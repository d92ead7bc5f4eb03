use super::batch::BatchProof;
use super::proof::Proof;
use super::traits::IsMerkleTreeBackend;
use super::utils::*;

const ROOT: NodePos = 0;

/// A Merkle tree stored as a flat 0-indexed heap: the root at position 0,
/// children of `i` at `2i + 1` and `2i + 2`, and the hashed leaves occupying
/// the last level. Leaves are padded to a power of two by repeating the last
/// one.
#[derive(Clone)]
pub struct MerkleTree<B: IsMerkleTreeBackend> {
    pub root: B::Node,
    nodes: Vec<B::Node>,
}

impl<B> MerkleTree<B>
where
    B: IsMerkleTreeBackend,
{
    pub fn build(unhashed_leaves: &[B::Data]) -> Self {
        let mut hashed_leaves = B::hash_leaves(unhashed_leaves);
        complete_until_power_of_two(&mut hashed_leaves);
        let leaves_len = hashed_leaves.len();

        // Inner nodes first; their initial contents are overwritten below.
        let mut nodes = vec![hashed_leaves[0].clone(); leaves_len - 1];
        nodes.extend(hashed_leaves);

        for pos in (0..leaves_len - 1).rev() {
            nodes[pos] = B::hash_new_parent(&nodes[2 * pos + 1], &nodes[2 * pos + 2]);
        }

        MerkleTree {
            root: nodes[ROOT].clone(),
            nodes,
        }
    }

    pub fn leaves_count(&self) -> usize {
        self.nodes.len() / 2 + 1
    }

    pub fn depth(&self) -> usize {
        self.leaves_count().trailing_zeros() as usize
    }

    /// Returns the hashed leaf at the given index (0 for the first leaf).
    pub fn get_leaf(&self, leaf_index: usize) -> &B::Node {
        let first_leaf_pos = self.nodes.len() / 2;
        &self.nodes[leaf_index + first_leaf_pos]
    }

    /// Builds an inclusion proof for a single leaf.
    pub fn get_proof_by_pos(&self, leaf_index: usize) -> Option<Proof<B::Node>> {
        if leaf_index >= self.leaves_count() {
            return None;
        }
        let mut pos = leaf_index + self.nodes.len() / 2;
        let mut merkle_path = Vec::with_capacity(self.depth());
        while pos != ROOT {
            merkle_path.push(self.nodes[get_sibling_pos(pos)].clone());
            pos = get_parent_pos(pos);
        }
        Some(Proof { merkle_path })
    }

    /// Builds a batch inclusion proof for the given strictly increasing list
    /// of leaf indices.
    ///
    /// The proof stores one sibling column per queried leaf; siblings that
    /// can be recomputed from other queried leaves are elided. When two
    /// queried nodes are siblings, their parent is attributed to the left
    /// one's column, so build and verification walk the levels identically.
    pub fn get_batch_proof(&self, leaf_indices: &[usize]) -> Option<BatchProof<B::Node>> {
        if leaf_indices.is_empty()
            || leaf_indices.windows(2).any(|pair| pair[0] >= pair[1])
            || *leaf_indices.last()? >= self.leaves_count()
        {
            return None;
        }

        let first_leaf_pos = self.nodes.len() / 2;
        let mut columns: Vec<Vec<B::Node>> = vec![Vec::new(); leaf_indices.len()];
        let mut level: Vec<(NodePos, usize)> = leaf_indices
            .iter()
            .enumerate()
            .map(|(column, index)| (index + first_leaf_pos, column))
            .collect();

        while level[0].0 != ROOT {
            let mut next_level = Vec::with_capacity(level.len());
            let mut i = 0;
            while i < level.len() {
                let (pos, column) = level[i];
                if is_left_child(pos) && i + 1 < level.len() && level[i + 1].0 == pos + 1 {
                    // Both children are known; nothing to record.
                    i += 2;
                } else {
                    columns[column].push(self.nodes[get_sibling_pos(pos)].clone());
                    i += 1;
                }
                next_level.push((get_parent_pos(pos), column));
            }
            level = next_level;
        }

        Some(BatchProof {
            nodes: columns,
            depth: self.depth() as u8,
        })
    }
}
