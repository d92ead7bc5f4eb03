use super::traits::IsMerkleTreeBackend;
use super::utils::{get_parent_pos, get_sibling_pos, is_left_child, NodePos};

/// Batch inclusion proof for a set of leaves.
///
/// `nodes[i]` is the column of sibling hashes consumed, bottom-up, by the
/// authentication path of the i-th queried leaf; siblings recomputable from
/// other queried leaves are elided. `depth` is the height of the tree
/// (`leaves = 2^depth`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProof<T: PartialEq + Eq> {
    pub nodes: Vec<Vec<T>>,
    pub depth: u8,
}

impl<T: Clone + PartialEq + Eq> BatchProof<T> {
    /// Verifies the opened `values` at the strictly increasing `leaf_indices`
    /// against `root`.
    ///
    /// Mirrors the level walk of `MerkleTree::get_batch_proof`: at each level,
    /// adjacent sibling entries merge (the parent inherits the left entry's
    /// column), every other entry pulls its sibling from its own column.
    /// Exhausted or leftover columns make the proof invalid.
    pub fn verify<B>(&self, root: &B::Node, leaf_indices: &[usize], values: &[B::Data]) -> bool
    where
        B: IsMerkleTreeBackend<Node = T>,
    {
        if leaf_indices.is_empty()
            || leaf_indices.len() != values.len()
            || leaf_indices.len() != self.nodes.len()
            || leaf_indices.windows(2).any(|pair| pair[0] >= pair[1])
            || u32::from(self.depth) >= usize::BITS
        {
            return false;
        }
        let leaves_count = 1usize << self.depth;
        if *leaf_indices.last().expect("nonempty") >= leaves_count {
            return false;
        }

        let first_leaf_pos = leaves_count - 1;
        let mut cursors = vec![0usize; self.nodes.len()];
        let mut level: Vec<(NodePos, B::Node, usize)> = leaf_indices
            .iter()
            .zip(values.iter())
            .enumerate()
            .map(|(column, (index, value))| (index + first_leaf_pos, B::hash_data(value), column))
            .collect();

        for _ in 0..self.depth {
            let mut next_level = Vec::with_capacity(level.len());
            let mut i = 0;
            while i < level.len() {
                let (pos, ref hash, column) = level[i];
                let parent_hash = if is_left_child(pos)
                    && i + 1 < level.len()
                    && level[i + 1].0 == pos + 1
                {
                    let right = &level[i + 1].1;
                    let parent = B::hash_new_parent(hash, right);
                    i += 2;
                    parent
                } else {
                    let Some(sibling) = self.nodes[column].get(cursors[column]) else {
                        return false;
                    };
                    cursors[column] += 1;
                    let parent = if is_left_child(pos) {
                        B::hash_new_parent(hash, sibling)
                    } else {
                        B::hash_new_parent(sibling, hash)
                    };
                    i += 1;
                    parent
                };
                next_level.push((get_parent_pos(pos), parent_hash, column));
            }
            level = next_level;
        }

        let all_columns_consumed = cursors
            .iter()
            .zip(self.nodes.iter())
            .all(|(cursor, column)| *cursor == column.len());

        level.len() == 1 && level[0].0 == 0 && &level[0].1 == root && all_columns_consumed
    }

    /// Total number of sibling hashes carried by the proof.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(Vec::len).sum()
    }
}
